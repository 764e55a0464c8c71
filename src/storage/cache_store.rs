//! Persistent cache store for merged locale text
//!
//! The cache store holds each language's merged text collection once it has
//! been loaded from sources, plus every runtime edit made since. It is the
//! authoritative runtime copy: runtime edits survive restarts until a
//! refresh rebuilds the language from its sources.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         TextStore                           │
//! │            (lazy load, set, delete, refresh)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TextCacheStore                          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                        │
//!                    ▼                        ▼
//!          ┌─────────────────┐      ┌─────────────────┐
//!          │     SQLite      │      │     Memory      │
//!          │  Implementation │      │ Implementation  │
//!          └─────────────────┘      └─────────────────┘
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::text::value::{TextCollection, TextValue};

// ============================================================================
// Store Trait
// ============================================================================

/// Per-language key-value store behind a [`TextStore`](crate::text::TextStore)
///
/// Every method is scoped to one language. Implementations must apply
/// `replace` atomically: either the whole new collection is stored, or the
/// previous one stays.
pub trait TextCacheStore: Send + Sync {
    /// When the language was last populated from sources, if ever
    fn populated_at(&self, language: &str) -> Result<Option<DateTime<Utc>>>;

    /// Whether the language has been populated
    fn is_populated(&self, language: &str) -> Result<bool> {
        Ok(self.populated_at(language)?.is_some())
    }

    /// Load the language's full collection
    fn load(&self, language: &str) -> Result<TextCollection>;

    /// Get one item
    fn get(&self, language: &str, section: &str, key: &str) -> Result<Option<TextValue>>;

    /// Check whether an item exists
    fn has(&self, language: &str, section: &str, key: &str) -> Result<bool> {
        Ok(self.get(language, section, key)?.is_some())
    }

    /// Insert or overwrite one item
    fn set(&self, language: &str, section: &str, key: &str, value: &TextValue) -> Result<()>;

    /// Delete one item, returning whether it existed
    fn delete(&self, language: &str, section: &str, key: &str) -> Result<bool>;

    /// Replace the language's whole collection and mark it populated
    fn replace(&self, language: &str, collection: &TextCollection) -> Result<()>;

    /// Forget the language entirely
    fn clear(&self, language: &str) -> Result<()>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of TextCacheStore
///
/// Values are stored as JSON so scalars and mappings share one column.
pub struct SqliteTextCacheStore {
    conn: Mutex<Connection>,
}

impl SqliteTextCacheStore {
    /// Open (or create) a store file
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create cache directory: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite text cache store initialized");
        Ok(store)
    }

    /// Create in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory SQLite")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create database schema
    fn create_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS locale_text (
                    language TEXT NOT NULL,
                    section TEXT NOT NULL,
                    key TEXT NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    PRIMARY KEY (language, section, key)
                );

                CREATE TABLE IF NOT EXISTS locale_text_state (
                    language TEXT PRIMARY KEY,
                    populated_at TEXT NOT NULL
                );
                "#,
        )
        .context("Failed to create SQLite schema")?;

        Ok(())
    }
}

fn decode_value(raw: &str) -> Result<TextValue> {
    serde_json::from_str(raw).context("Failed to decode stored text value")
}

impl TextCacheStore for SqliteTextCacheStore {
    fn populated_at(&self, language: &str) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn();
        let raw: Option<String> = conn
            .query_row(
                "SELECT populated_at FROM locale_text_state WHERE language = ?1",
                params![language],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read population state")?;

        raw.map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .context("Failed to parse population timestamp")
        })
        .transpose()
    }

    fn load(&self, language: &str) -> Result<TextCollection> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT section, key, value FROM locale_text WHERE language = ?1")
            .context("Failed to prepare load query")?;

        let rows = stmt.query_map(params![language], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut collection = TextCollection::new();
        for row in rows {
            let (section, key, raw) = row.context("Failed to read text row")?;
            collection.insert(section, key, decode_value(&raw)?);
        }

        Ok(collection)
    }

    fn get(&self, language: &str, section: &str, key: &str) -> Result<Option<TextValue>> {
        let conn = self.conn();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM locale_text WHERE language = ?1 AND section = ?2 AND key = ?3",
                params![language, section, key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to get text item")?;

        raw.as_deref().map(decode_value).transpose()
    }

    fn set(&self, language: &str, section: &str, key: &str, value: &TextValue) -> Result<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let encoded = serde_json::to_string(value).context("Failed to encode text value")?;

        conn.execute(
            r#"
                INSERT INTO locale_text (language, section, key, value, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(language, section, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            params![language, section, key, encoded, now],
        )
        .context("Failed to set text item")?;

        Ok(())
    }

    fn delete(&self, language: &str, section: &str, key: &str) -> Result<bool> {
        let conn = self.conn();
        let affected = conn
            .execute(
                "DELETE FROM locale_text WHERE language = ?1 AND section = ?2 AND key = ?3",
                params![language, section, key],
            )
            .context("Failed to delete text item")?;

        Ok(affected > 0)
    }

    fn replace(&self, language: &str, collection: &TextCollection) -> Result<()> {
        let mut conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let tx = conn.transaction().context("Failed to begin transaction")?;

        tx.execute(
            "DELETE FROM locale_text WHERE language = ?1",
            params![language],
        )
        .context("Failed to clear language")?;

        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO locale_text (language, section, key, value, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .context("Failed to prepare insert")?;

            for (section, key, value) in collection.iter() {
                let encoded =
                    serde_json::to_string(value).context("Failed to encode text value")?;
                insert
                    .execute(params![language, section, key, encoded, now])
                    .context("Failed to insert text item")?;
            }
        }

        tx.execute(
            r#"
                INSERT INTO locale_text_state (language, populated_at)
                VALUES (?1, ?2)
                ON CONFLICT(language) DO UPDATE SET populated_at = excluded.populated_at
                "#,
            params![language, now],
        )
        .context("Failed to mark language populated")?;

        tx.commit().context("Failed to commit language replacement")?;

        Ok(())
    }

    fn clear(&self, language: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("Failed to begin transaction")?;
        tx.execute(
            "DELETE FROM locale_text WHERE language = ?1",
            params![language],
        )?;
        tx.execute(
            "DELETE FROM locale_text_state WHERE language = ?1",
            params![language],
        )?;
        tx.commit().context("Failed to clear language")?;
        Ok(())
    }
}

// ============================================================================
// Memory Implementation
// ============================================================================

#[derive(Debug, Clone, Default)]
struct LanguageEntry {
    collection: TextCollection,
    populated_at: Option<DateTime<Utc>>,
}

/// In-memory implementation of TextCacheStore
///
/// Lives as long as the process. Write failures can be switched on to
/// exercise error paths.
#[derive(Default)]
pub struct MemoryTextCacheStore {
    languages: RwLock<HashMap<String, LanguageEntry>>,
    fail_writes: AtomicBool,
}

impl MemoryTextCacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("memory cache store is failing writes");
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, LanguageEntry>> {
        self.languages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, LanguageEntry>> {
        self.languages.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TextCacheStore for MemoryTextCacheStore {
    fn populated_at(&self, language: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read().get(language).and_then(|entry| entry.populated_at))
    }

    fn load(&self, language: &str) -> Result<TextCollection> {
        Ok(self
            .read()
            .get(language)
            .map(|entry| entry.collection.clone())
            .unwrap_or_default())
    }

    fn get(&self, language: &str, section: &str, key: &str) -> Result<Option<TextValue>> {
        Ok(self
            .read()
            .get(language)
            .and_then(|entry| entry.collection.get(section, key).cloned()))
    }

    fn set(&self, language: &str, section: &str, key: &str, value: &TextValue) -> Result<()> {
        self.check_writable()?;
        self.write()
            .entry(language.to_string())
            .or_default()
            .collection
            .insert(section, key, value.clone());
        Ok(())
    }

    fn delete(&self, language: &str, section: &str, key: &str) -> Result<bool> {
        self.check_writable()?;
        Ok(self
            .write()
            .get_mut(language)
            .and_then(|entry| entry.collection.remove(section, key))
            .is_some())
    }

    fn replace(&self, language: &str, collection: &TextCollection) -> Result<()> {
        self.check_writable()?;
        self.write().insert(
            language.to_string(),
            LanguageEntry {
                collection: collection.clone(),
                populated_at: Some(Utc::now()),
            },
        );
        Ok(())
    }

    fn clear(&self, language: &str) -> Result<()> {
        self.check_writable()?;
        self.write().remove(language);
        Ok(())
    }
}

// ============================================================================
// Shared Store Types
// ============================================================================

/// Thread-safe shared store
pub type SharedTextCacheStore = Arc<dyn TextCacheStore>;

/// Create a shared SQLite store
pub fn create_sqlite_store(path: impl AsRef<Path>) -> Result<SharedTextCacheStore> {
    let store = SqliteTextCacheStore::new(path)?;
    Ok(Arc::new(store))
}

/// Create a shared in-memory store
pub fn create_memory_store() -> SharedTextCacheStore {
    Arc::new(MemoryTextCacheStore::new())
}

// ============================================================================
// Tests
// ============================================================================
