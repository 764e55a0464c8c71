//! Locale negotiation and locale objects
//!
//! - [`code`] - Locale code normalization and validation
//! - [`profile`] - Static temporal, numeric and currency tables
//! - [`resolve`] - Requested codes to a supported locale and language
//!
//! A [`Locale`] ties a negotiated pair to its profile and a text resolver for
//! its language. Build one through [`LocaleFactory`].

pub mod code;
pub mod profile;
pub mod resolve;

pub use code::{is_valid_code, normalize_code, LocaleCode};
pub use profile::{Currency, LocaleProfile, LocaleVariant, Numeric, Temporal};
pub use resolve::{resolve, ResolvedLocale};

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::{open_cache_store, SharedTextCacheStore};
use crate::text::{TextLogger, TextResolver, TextStoreRegistry, TracingLogger};

/// A negotiated locale with its formatting tables and text
pub struct Locale {
    resolved: ResolvedLocale,
    text: TextResolver,
}

impl Locale {
    /// Locale code, like `da-dk`
    pub fn locale(&self) -> &str {
        &self.resolved.locale
    }

    /// Language code of the text, like `en-us`
    pub fn language(&self) -> &str {
        &self.resolved.language
    }

    pub fn variant(&self) -> LocaleVariant {
        self.resolved.variant
    }

    pub fn temporal(&self) -> Temporal {
        self.resolved.variant.temporal()
    }

    /// One temporal setting by camelCase name, like `dateShort`
    pub fn temporal_value(&self, key: &str) -> Option<&'static str> {
        self.temporal().get(key)
    }

    pub fn numeric(&self) -> Numeric {
        self.resolved.variant.numeric()
    }

    /// One numeric setting by camelCase name, like `decimalMark`
    pub fn numeric_value(&self, key: &str) -> Option<&'static str> {
        self.numeric().get(key)
    }

    /// All currencies, default first
    pub fn currency(&self) -> Vec<Currency> {
        self.resolved.variant.currency()
    }

    pub fn currency_default(&self) -> Currency {
        self.resolved.variant.currency_default()
    }

    pub fn profile(&self) -> LocaleProfile {
        self.resolved.variant.profile()
    }

    /// Resolve a text identifier in this locale's language
    ///
    /// See [`TextResolver::text`].
    pub fn text(
        &self,
        identifier: &str,
        replacers: &[(&str, &str)],
        default: Option<&str>,
    ) -> Result<String> {
        self.text.text(identifier, replacers, default)
    }

    pub fn resolver(&self) -> &TextResolver {
        &self.text
    }
}

/// Builds [`Locale`]s sharing configuration and text stores
pub struct LocaleFactory {
    config: Arc<Config>,
    registry: Arc<TextStoreRegistry>,
    logger: Arc<dyn TextLogger>,
}

impl LocaleFactory {
    pub fn new(config: Config, cache_store: SharedTextCacheStore) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(TextStoreRegistry::new(Arc::clone(&config), cache_store));

        Self {
            config,
            registry,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Create a factory with the cache store the configuration names
    pub fn from_config(config: Config) -> Result<Self> {
        let cache_store = open_cache_store(&config.cache)
            .map_err(|e| Error::persistence("open cache store", format!("{e:#}")))?;
        Ok(Self::new(config, cache_store))
    }

    /// Warning sink for every locale created from now on
    pub fn with_logger(mut self, logger: Arc<dyn TextLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TextStoreRegistry> {
        &self.registry
    }

    /// Negotiate a supported locale and language
    pub fn resolve(&self, locale: &str, language: &str) -> Result<ResolvedLocale> {
        resolve(&self.config.locale, locale, language)
    }

    /// Negotiate, then build the locale
    ///
    /// Empty arguments fall back to the configured defaults.
    pub fn create(&self, locale: &str, language: &str) -> Result<Locale> {
        let resolved = self.resolve(locale, language)?;
        let store = self.registry.get(&resolved.language);
        let text = TextResolver::new(store, &self.config.text).with_logger(Arc::clone(&self.logger));

        tracing::debug!(
            locale = %resolved.locale,
            language = %resolved.language,
            variant = %resolved.variant,
            "Created locale"
        );

        Ok(Locale { resolved, text })
    }
}
