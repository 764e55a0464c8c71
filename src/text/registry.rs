//! Process-wide text store sharing
//!
//! Loading a language is comparatively expensive, so every locale using the
//! same language shares one [`TextStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::storage::SharedTextCacheStore;
use crate::text::store::TextStore;

/// One shared [`TextStore`] per language
pub struct TextStoreRegistry {
    config: Arc<Config>,
    cache_store: SharedTextCacheStore,
    stores: Mutex<HashMap<String, Arc<TextStore>>>,
}

impl TextStoreRegistry {
    pub fn new(config: Arc<Config>, cache_store: SharedTextCacheStore) -> Self {
        Self {
            config,
            cache_store,
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// The store for `language`, created on first request
    pub fn get(&self, language: &str) -> Arc<TextStore> {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(stores.entry(language.to_string()).or_insert_with(|| {
            tracing::debug!(language, "Creating text store");
            Arc::new(TextStore::from_config(
                language,
                &self.config,
                Arc::clone(&self.cache_store),
            ))
        }))
    }

    /// Languages with a store
    pub fn languages(&self) -> Vec<String> {
        let stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        let mut languages: Vec<String> = stores.keys().cloned().collect();
        languages.sort();
        languages
    }

    pub fn cache_store(&self) -> &SharedTextCacheStore {
        &self.cache_store
    }
}
