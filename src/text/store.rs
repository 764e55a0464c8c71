//! Layered text store for one language
//!
//! A [`TextStore`] owns the merged section/key collection of one language.
//! The collection is built lazily on first read: from the cache store when
//! the language has been populated before, otherwise by merging every text
//! source in load order and persisting the result.
//!
//! Runtime edits (`set`, `delete`) go to the cache store first and to the
//! in-memory collection only once persisted, so both always agree.
//! [`TextStore::refresh`] rebuilds the language from its sources and
//! **discards every runtime edit**.

use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::SharedTextCacheStore;
use crate::text::identifier::is_valid_key;
use crate::text::paths::{load_order, SourcePath};
use crate::text::source::{FileTextSource, TextSource};
use crate::text::value::{TextCollection, TextValue};
use crate::utils::{escape_json_non_ascii, escape_json_slashes};

/// Export rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Read straight from sources instead of the runtime collection
    pub from_sources: bool,
    /// Indent the JSON output
    pub pretty: bool,
    /// Write non-ASCII characters as `\uXXXX`
    pub escape_unicode: bool,
    /// Write `/` as `\/`
    pub escape_slashes: bool,
}

/// Merged, cached and editable text of one language
pub struct TextStore {
    language: String,
    sources: Vec<SourcePath>,
    source: Arc<dyn TextSource>,
    cache_store: SharedTextCacheStore,
    cache: RwLock<Option<TextCollection>>,
}

impl TextStore {
    /// Create a store; nothing is loaded until the first read
    pub fn new(
        language: impl Into<String>,
        sources: Vec<SourcePath>,
        source: Arc<dyn TextSource>,
        cache_store: SharedTextCacheStore,
    ) -> Self {
        Self {
            language: language.into(),
            sources,
            source,
            cache_store,
            cache: RwLock::new(None),
        }
    }

    /// Create a store reading the configured source directories
    pub fn from_config(
        language: impl Into<String>,
        config: &Config,
        cache_store: SharedTextCacheStore,
    ) -> Self {
        Self::new(
            language,
            load_order(config.locale.text_paths.clone()),
            Arc::new(FileTextSource::new(config.text.file_suffix.clone())),
            cache_store,
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Source locations, lowest precedence first
    pub fn sources(&self) -> &[SourcePath] {
        &self.sources
    }

    /// Whether this instance has built its collection yet
    pub fn is_loaded(&self) -> bool {
        self.read_cache().is_some()
    }

    /// Get one item
    pub fn get(&self, section: &str, key: &str) -> Result<Option<TextValue>> {
        self.with_collection(|collection| collection.get(section, key).cloned())
    }

    /// Check whether an item exists
    pub fn has(&self, section: &str, key: &str) -> Result<bool> {
        self.with_collection(|collection| collection.contains(section, key))
    }

    /// Copy of the full collection
    pub fn snapshot(&self) -> Result<TextCollection> {
        self.with_collection(Clone::clone)
    }

    /// Insert or overwrite one item
    ///
    /// The item is persisted before the in-memory collection changes; a
    /// persistence failure leaves both untouched. Source files are never
    /// written.
    pub fn set(&self, section: &str, key: &str, value: TextValue) -> Result<()> {
        validate_item(section, key, &value)?;

        let mut guard = self.write_cache();
        let collection = self.loaded(&mut guard)?;

        self.cache_store
            .set(&self.language, section, key, &value)
            .map_err(|e| Error::persistence("set", format!("{e:#}")))?;
        collection.insert(section, key, value);

        tracing::debug!(language = %self.language, section, key, "Set locale text");
        Ok(())
    }

    /// Delete one item, returning whether it existed
    pub fn delete(&self, section: &str, key: &str) -> Result<bool> {
        let mut guard = self.write_cache();
        let collection = self.loaded(&mut guard)?;

        self.cache_store
            .delete(&self.language, section, key)
            .map_err(|e| Error::persistence("delete", format!("{e:#}")))?;
        let existed = collection.remove(section, key).is_some();

        tracing::debug!(language = %self.language, section, key, existed, "Deleted locale text");
        Ok(existed)
    }

    /// Rebuild the collection from sources
    ///
    /// **Destructive:** every runtime `set` and `delete` since the last
    /// population is lost, in memory and in the cache store. On failure the
    /// previous collection stays in place.
    pub fn refresh(&self) -> Result<()> {
        let mut guard = self.write_cache();

        let collection = self.source.load(&self.language, &self.sources)?;
        self.cache_store
            .replace(&self.language, &collection)
            .map_err(|e| Error::persistence("refresh", format!("{e:#}")))?;

        tracing::info!(
            language = %self.language,
            items = collection.len(),
            "Refreshed locale text from sources"
        );
        *guard = Some(collection);
        Ok(())
    }

    /// When the cache store was last populated from sources
    pub fn populated_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.cache_store
            .populated_at(&self.language)
            .map_err(|e| Error::persistence("read state", format!("{e:#}")))
    }

    /// Render the collection as JSON
    pub fn export_string(&self, options: &ExportOptions) -> Result<String> {
        let collection = if options.from_sources {
            self.source.load(&self.language, &self.sources)?
        } else {
            self.snapshot()?
        };

        let mut json = if options.pretty {
            serde_json::to_string_pretty(&collection)?
        } else {
            serde_json::to_string(&collection)?
        };

        if options.escape_unicode {
            json = escape_json_non_ascii(&json);
        }
        if options.escape_slashes {
            json = escape_json_slashes(&json);
        }

        Ok(json)
    }

    /// Write the collection as JSON to `target`
    pub fn export(&self, target: &Path, options: &ExportOptions) -> Result<()> {
        let json = self.export_string(options)?;

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::persistence("export", e))?;
            }
        }
        fs::write(target, json).map_err(|e| Error::persistence("export", e))?;

        tracing::info!(
            language = %self.language,
            target = %target.display(),
            from_sources = options.from_sources,
            "Exported locale text"
        );
        Ok(())
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Option<TextCollection>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, Option<TextCollection>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the collection, loading it first if needed
    fn with_collection<R>(&self, f: impl FnOnce(&TextCollection) -> R) -> Result<R> {
        {
            let guard = self.read_cache();
            if let Some(collection) = guard.as_ref() {
                return Ok(f(collection));
            }
        }

        // Another thread may have loaded between the two locks
        let mut guard = self.write_cache();
        let collection = self.loaded(&mut guard)?;
        Ok(f(collection))
    }

    /// The collection in `slot`, populating it first if empty
    fn loaded<'a>(&self, slot: &'a mut Option<TextCollection>) -> Result<&'a mut TextCollection> {
        let collection = match slot.take() {
            Some(collection) => collection,
            None => self.populate()?,
        };
        Ok(slot.insert(collection))
    }

    fn populate(&self) -> Result<TextCollection> {
        let populated = self
            .cache_store
            .is_populated(&self.language)
            .map_err(|e| Error::persistence("load", format!("{e:#}")))?;

        if populated {
            let collection = self
                .cache_store
                .load(&self.language)
                .map_err(|e| Error::persistence("load", format!("{e:#}")))?;
            tracing::debug!(
                language = %self.language,
                items = collection.len(),
                "Loaded locale text from cache store"
            );
            return Ok(collection);
        }

        let collection = self.source.load(&self.language, &self.sources)?;
        self.cache_store
            .replace(&self.language, &collection)
            .map_err(|e| Error::persistence("populate", format!("{e:#}")))?;
        Ok(collection)
    }
}

fn validate_item(section: &str, key: &str, value: &TextValue) -> Result<()> {
    for token in [section, key] {
        if !is_valid_key(token) {
            return Err(Error::invalid_identifier(
                format!("{section}:{key}"),
                format!("'{token}' contains illegal characters"),
            ));
        }
    }

    if let Some(map) = value.as_map() {
        if let Some(sub) = map.keys().find(|sub| !is_valid_key(sub)) {
            return Err(Error::invalid_identifier(
                format!("{section}:{key}:{sub}"),
                format!("'{sub}' contains illegal characters"),
            ));
        }
    }

    Ok(())
}
