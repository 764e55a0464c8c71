//! Persistence for runtime locale text
//!
//! Text sources are read-only at runtime. The merged collection of each
//! language, and every edit made to it, lives in a [`TextCacheStore`].

pub mod cache_store;

pub use cache_store::{
    create_memory_store, create_sqlite_store, MemoryTextCacheStore, SharedTextCacheStore,
    SqliteTextCacheStore, TextCacheStore,
};

use anyhow::Result;

use crate::config::{CacheBackend, CacheConfig};

/// Open the cache store a configuration names
pub fn open_cache_store(config: &CacheConfig) -> Result<SharedTextCacheStore> {
    match config.backend {
        CacheBackend::Sqlite => create_sqlite_store(&config.sqlite_path),
        CacheBackend::Memory => Ok(create_memory_store()),
    }
}
