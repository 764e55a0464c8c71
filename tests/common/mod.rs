//! Common test utilities

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use locale_text::config::{CacheBackend, Config};
use locale_text::text::TextLogger;
use tempfile::TempDir;

/// Temporary text source directories, one per source identifier
pub struct TextDirs {
    root: TempDir,
    ids: Vec<String>,
}

impl TextDirs {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            ids: Vec::new(),
        }
    }

    /// Directory of a source, created on demand
    pub fn dir(&mut self, id: &str) -> PathBuf {
        let dir = self.root.path().join("text").join(id);
        fs::create_dir_all(&dir).unwrap();
        if !self.ids.iter().any(|known| known == id) {
            self.ids.push(id.to_string());
        }
        dir
    }

    /// Write one source file
    pub fn write(&mut self, id: &str, file_name: &str, content: &str) -> &mut Self {
        let dir = self.dir(id);
        fs::write(dir.join(file_name), content).unwrap();
        self
    }

    /// Path inside the temp root that nothing created
    #[allow(dead_code)]
    pub fn missing(&self, id: &str) -> PathBuf {
        self.root.path().join("missing").join(id)
    }

    /// Scratch path for cache databases and export targets
    #[allow(dead_code)]
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Default config reading these sources, with a memory cache store
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.locale.text_paths = self
            .ids
            .iter()
            .map(|id| (id.clone(), self.root.path().join("text").join(id)))
            .collect::<HashMap<_, _>>();
        config.cache.backend = CacheBackend::Memory;
        config
    }

    /// Like [`TextDirs::config`], with a SQLite cache store in the temp root
    #[allow(dead_code)]
    pub fn sqlite_config(&self) -> Config {
        let mut config = self.config();
        config.cache.backend = CacheBackend::Sqlite;
        config.cache.sqlite_path = self.scratch("cache.db");
        config
    }
}

/// Logger keeping every warning for inspection
#[derive(Default)]
pub struct RecordingLogger {
    warnings: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingLogger {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.warnings.lock().unwrap().len()
    }
}

impl TextLogger for RecordingLogger {
    fn warning(&self, message: &str, context: &[(&str, &str)]) {
        let context: Vec<String> = context.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.warnings
            .lock()
            .unwrap()
            .push(format!("{message} {}", context.join(" ")));
    }
}

/// English base text used across tests
pub const EN_US_BASE: &str = r#"
[greeting]
hello = "Hello %name"
goodbye = "Goodbye"

[app]
title = "Base title"
footer = "Base footer"

[weekday]
name = ["Sunday", "Monday"]
"#;

/// Site overrides for [`EN_US_BASE`]
#[allow(dead_code)]
pub const EN_US_SITE: &str = r#"
[app]
title = "Site title"

[weekday]
name = "not a list any more"
"#;
