//! Configuration management for locale-text
//!
//! This module handles loading and validating configuration from a TOML file
//! and environment variables. The `[locale]` section carries the mapping
//! tables locale negotiation runs on, plus the text source paths.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::locale::code::{is_valid_code, LocaleCode};
use crate::locale::profile::LocaleVariant;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "LOCALE_TEXT_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locale negotiation tables and text source paths
    pub locale: LocaleConfig,

    /// Text resolution behavior
    pub text: TextConfig,

    /// Persistent cache store
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Locale negotiation tables
///
/// All codes are in the internal `xx-yy` form, except the keys of
/// `code_short_to_long` which are two-letter ISO 639-1 codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Supported locales, and the profile variant each is built from
    pub locale_to_class: BTreeMap<String, LocaleVariant>,

    /// Two-letter code to full code, shared by locale and language
    pub code_short_to_long: BTreeMap<String, String>,

    /// Supported languages
    pub languages: BTreeSet<String>,

    /// Default language of a locale
    pub locale_to_language: BTreeMap<String, String>,

    /// Default locale of a language
    pub language_to_locale: BTreeMap<String, String>,

    /// Locale used when nothing else resolves
    pub locale_default: String,

    /// Language used when nothing else resolves
    pub language_default: String,

    /// Text source directories, by identifier
    ///
    /// Load order is ascending identifier order; a later source overrides
    /// an earlier one.
    pub text_paths: HashMap<String, PathBuf>,
}

/// Text resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Fail on missing text instead of returning the not-found template
    pub error_on_not_found: bool,

    /// Returned for missing text; `%identifier` is replaced
    pub not_found_template: String,

    /// Source files are named `[prefix.]<file_suffix>.<language>.toml`
    pub file_suffix: String,
}

/// Cache store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// SQLite file, survives restarts
    Sqlite,
    /// Process memory only
    Memory,
}

/// Cache store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        let supported = ["da-dk", "en-gb", "en-us"];

        Self {
            locale_to_class: BTreeMap::from([
                (String::from("da-dk"), LocaleVariant::DaDk),
                (String::from("en-gb"), LocaleVariant::EnGb),
                (String::from("en-us"), LocaleVariant::EnUs),
            ]),
            code_short_to_long: BTreeMap::from([
                (String::from("da"), String::from("da-dk")),
                (String::from("en"), String::from("en-us")),
            ]),
            languages: supported.iter().map(|s| s.to_string()).collect(),
            locale_to_language: supported
                .iter()
                .map(|s| (s.to_string(), s.to_string()))
                .collect(),
            language_to_locale: supported
                .iter()
                .map(|s| (s.to_string(), s.to_string()))
                .collect(),
            locale_default: String::from("en-us"),
            language_default: String::from("en-us"),
            text_paths: HashMap::from([(String::from("base"), PathBuf::from("locale-text"))]),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            error_on_not_found: false,
            not_found_template: String::from("Locale text not found: %identifier"),
            file_suffix: String::from("locale-text"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Sqlite,
            sqlite_path: PathBuf::from("data/locale-text.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the effective configuration
    ///
    /// Reads `path`, else the file named by `LOCALE_TEXT_CONFIG`, else starts
    /// from defaults. Environment overrides are applied last, then the result
    /// is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);

        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply `LOCALE_TEXT_*` environment overrides
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(locale) = std::env::var("LOCALE_TEXT_LOCALE_DEFAULT") {
            self.locale.locale_default = LocaleCode::parse(&locale)
                .context("LOCALE_TEXT_LOCALE_DEFAULT")?
                .to_string();
        }

        if let Ok(language) = std::env::var("LOCALE_TEXT_LANGUAGE_DEFAULT") {
            self.locale.language_default = LocaleCode::parse(&language)
                .context("LOCALE_TEXT_LANGUAGE_DEFAULT")?
                .to_string();
        }

        if let Ok(paths) = std::env::var("LOCALE_TEXT_PATHS") {
            self.locale.text_paths = parse_text_paths(&paths)?;
        }

        if let Ok(flag) = std::env::var("LOCALE_TEXT_ERROR_ON_NOT_FOUND") {
            self.text.error_on_not_found = parse_bool(&flag)
                .with_context(|| format!("LOCALE_TEXT_ERROR_ON_NOT_FOUND: '{flag}'"))?;
        }

        if let Ok(template) = std::env::var("LOCALE_TEXT_NOT_FOUND_TEMPLATE") {
            self.text.not_found_template = template;
        }

        if let Ok(path) = std::env::var("LOCALE_TEXT_CACHE_PATH") {
            self.cache.sqlite_path = PathBuf::from(path);
        }

        if let Ok(backend) = std::env::var("LOCALE_TEXT_CACHE_BACKEND") {
            self.cache.backend = match backend.to_lowercase().as_str() {
                "sqlite" => CacheBackend::Sqlite,
                "memory" => CacheBackend::Memory,
                other => anyhow::bail!("LOCALE_TEXT_CACHE_BACKEND: unknown backend '{other}'"),
            };
        }

        if let Ok(level) = std::env::var("LOCALE_TEXT_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = std::env::var("LOCALE_TEXT_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    ///
    /// Catches tables that would make locale negotiation pick a code it can't
    /// construct a profile for.
    pub fn validate(&self) -> Result<()> {
        let locale = &self.locale;

        if locale.locale_to_class.is_empty() {
            anyhow::bail!("locale_to_class must not be empty");
        }

        if locale.languages.is_empty() {
            anyhow::bail!("languages must not be empty");
        }

        for code in locale
            .locale_to_class
            .keys()
            .chain(locale.languages.iter())
            .chain(locale.code_short_to_long.values())
            .chain(locale.locale_to_language.iter().flat_map(|(k, v)| [k, v]))
            .chain(locale.language_to_locale.iter().flat_map(|(k, v)| [k, v]))
        {
            if !is_valid_code(code) {
                anyhow::bail!("'{code}' is not a locale code of the form xx-yy");
            }
        }

        for short in locale.code_short_to_long.keys() {
            if short.len() != 2 || !short.chars().all(|c| c.is_ascii_lowercase()) {
                anyhow::bail!("code_short_to_long key '{short}' is not a two-letter code");
            }
        }

        if !locale.locale_to_class.contains_key(&locale.locale_default) {
            anyhow::bail!(
                "locale_default '{}' is missing from locale_to_class",
                locale.locale_default
            );
        }

        if !locale.languages.contains(&locale.language_default) {
            anyhow::bail!(
                "language_default '{}' is missing from languages",
                locale.language_default
            );
        }

        for (language, target) in &locale.language_to_locale {
            if !locale.locale_to_class.contains_key(target) {
                anyhow::bail!(
                    "language_to_locale[{language}] = '{target}' is missing from locale_to_class"
                );
            }
        }

        if self.text.file_suffix.is_empty() {
            anyhow::bail!("text.file_suffix must not be empty");
        }

        for id in locale.text_paths.keys() {
            if id.is_empty() {
                anyhow::bail!("text_paths identifiers must not be empty");
            }
        }

        Ok(())
    }
}

/// Parse `id=path,id=path` as used by `LOCALE_TEXT_PATHS`
fn parse_text_paths(raw: &str) -> Result<HashMap<String, PathBuf>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, path) = entry
                .split_once('=')
                .with_context(|| format!("text path entry '{entry}' is not id=path"))?;
            Ok((id.trim().to_string(), PathBuf::from(path.trim())))
        })
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean"),
    }
}
