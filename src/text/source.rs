//! Text source loading
//!
//! A language's text lives in TOML files named
//! `[prefix.]locale-text.<language>.toml`, spread over the configured source
//! directories. Each top-level table is a section; its items are strings, or
//! one level of sub-keyed strings:
//!
//! ```toml
//! [greeting]
//! hello = "Hello %name"
//!
//! [weekday]
//! name = ["Sunday", "Monday", "Tuesday"]
//! short = { sun = "Sun", mon = "Mon" }
//! ```

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::text::paths::SourcePath;
use crate::text::value::{TextCollection, TextValue};

/// Loads and merges a language's text from source locations
pub trait TextSource: Send + Sync {
    /// Load every source in `paths` order, later sources overriding earlier
    fn load(&self, language: &str, paths: &[SourcePath]) -> Result<TextCollection>;
}

/// TOML files in source directories
#[derive(Debug, Clone)]
pub struct FileTextSource {
    file_suffix: String,
}

impl Default for FileTextSource {
    fn default() -> Self {
        Self::new("locale-text")
    }
}

impl FileTextSource {
    /// Create a loader for files named `[prefix.]<file_suffix>.<language>.toml`
    pub fn new(file_suffix: impl Into<String>) -> Self {
        Self {
            file_suffix: file_suffix.into(),
        }
    }

    /// The bare file name for a language, like `locale-text.da-dk.toml`
    pub fn file_name(&self, language: &str) -> String {
        format!("{}.{language}.toml", self.file_suffix)
    }

    /// Whether a file name belongs to a language
    pub fn matches(&self, file_name: &str, language: &str) -> bool {
        let bare = self.file_name(language);
        file_name == bare || file_name.ends_with(&format!(".{bare}"))
    }

    /// Matching files of one directory, in file name order
    fn directory_files(&self, dir: &Path, language: &str) -> Result<Vec<std::path::PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let matched = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| self.matches(name, language))
                .unwrap_or(false);
            if matched && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse one source file
    pub fn parse_file(path: &Path) -> Result<TextCollection> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content, &path.display().to_string())
    }

    /// Parse source text; `origin` names it in errors
    pub fn parse_str(content: &str, origin: &str) -> Result<TextCollection> {
        let table: toml::Table = toml::from_str(content).map_err(|source| Error::SourceParse {
            path: origin.to_string(),
            source,
        })?;

        let mut collection = TextCollection::new();
        for (section, items) in table {
            let toml::Value::Table(items) = items else {
                return Err(Error::InvalidSource {
                    path: origin.to_string(),
                    reason: format!("top-level item '{section}' is not a [section]"),
                });
            };
            for (key, item) in items {
                let value = TextValue::from_toml(item).map_err(|reason| Error::InvalidSource {
                    path: origin.to_string(),
                    reason: format!("{section}.{key}: {reason}"),
                })?;
                collection.insert(section.clone(), key, value);
            }
        }

        Ok(collection)
    }
}

impl TextSource for FileTextSource {
    fn load(&self, language: &str, paths: &[SourcePath]) -> Result<TextCollection> {
        let mut merged = TextCollection::new();

        for source in paths {
            if !source.path.is_dir() {
                tracing::warn!(
                    id = %source.id,
                    path = %source.path.display(),
                    "Text source directory does not exist, skipping"
                );
                continue;
            }

            for file in self.directory_files(&source.path, language)? {
                let collection = Self::parse_file(&file)?;
                tracing::debug!(
                    id = %source.id,
                    file = %file.display(),
                    items = collection.len(),
                    "Loaded text source file"
                );
                merged.overlay(collection);
            }
        }

        tracing::info!(
            language = %language,
            sources = paths.len(),
            items = merged.len(),
            "Loaded locale text from sources"
        );

        Ok(merged)
    }
}
