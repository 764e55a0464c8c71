//! Locale negotiation
//!
//! Maps a requested locale and/or language, in any of the accepted code
//! notations, to one supported `(locale, language)` pair.
//!
//! Locale and language are decoupled on purpose: the locale picks formatting
//! conventions, the language picks which text collection to load. A
//! deployment may well want British formatting with American text.
//!
//! Resolution order:
//! 1. A requested locale is accepted if supported, else a two-letter code is
//!    expanded through `code_short_to_long`.
//! 2. A requested language likewise, checked against `languages`.
//! 3. Nothing resolved: the configured defaults.
//!    Only the language resolved: the locale follows it through
//!    `language_to_locale`. Only the locale resolved: the language follows
//!    it through `locale_to_language`. Both resolved: used as they are.

use serde::Serialize;

use crate::config::LocaleConfig;
use crate::error::{Error, Result};
use crate::locale::code::normalize_code;
use crate::locale::profile::LocaleVariant;

/// Outcome of locale negotiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocale {
    /// Supported locale code
    pub locale: String,

    /// Supported language code
    pub language: String,

    /// Profile variant the locale is built from
    pub variant: LocaleVariant,
}

/// Resolve a requested locale and language to a supported pair
///
/// Never falls back to an error for unknown or malformed input; unknown
/// codes resolve to the configured defaults. The only failure is a
/// [`Error::ConfigurationIntegrity`] fault, meaning the tables point at a
/// locale that `locale_to_class` doesn't know.
///
/// # Example
///
/// ```
/// use locale_text::config::LocaleConfig;
/// use locale_text::locale::resolve;
///
/// let tables = LocaleConfig::default();
///
/// let resolved = resolve(&tables, "da_DK", "").unwrap();
/// assert_eq!(resolved.locale, "da-dk");
/// assert_eq!(resolved.language, "da-dk");
///
/// let resolved = resolve(&tables, "", "").unwrap();
/// assert_eq!(resolved.locale, tables.locale_default);
/// ```
pub fn resolve(
    tables: &LocaleConfig,
    requested_locale: &str,
    requested_language: &str,
) -> Result<ResolvedLocale> {
    let locale_in = normalize_code(requested_locale);
    let language_in = normalize_code(requested_language);

    let locale_found = if locale_in.is_empty() {
        None
    } else if tables.locale_to_class.contains_key(&locale_in) {
        Some(locale_in.clone())
    } else {
        expand_short(tables, &locale_in)
    };

    let language_found = if language_in.is_empty() {
        None
    } else if tables.languages.contains(&language_in) {
        Some(language_in.clone())
    } else {
        expand_short(tables, &language_in)
    };

    let (locale, language) = match (locale_found, language_found) {
        (None, None) => (
            tables.locale_default.clone(),
            tables.language_default.clone(),
        ),
        (None, Some(language)) => {
            // The requested language may be known as a locale even though
            // it isn't a supported language.
            let locale = tables
                .language_to_locale
                .get(&language_in)
                .or_else(|| tables.language_to_locale.get(&language))
                .unwrap_or(&tables.locale_default)
                .clone();
            (locale, language)
        }
        (Some(locale), None) => {
            let language = tables
                .locale_to_language
                .get(&locale_in)
                .or_else(|| tables.locale_to_language.get(&locale))
                .unwrap_or(&tables.language_default)
                .clone();
            (locale, language)
        }
        (Some(locale), Some(language)) => (locale, language),
    };

    let variant = tables.locale_to_class.get(&locale).copied().ok_or_else(|| {
        Error::ConfigurationIntegrity(format!(
            "locale_to_class has no entry for resolved locale '{locale}'"
        ))
    })?;

    tracing::debug!(
        requested_locale = %requested_locale,
        requested_language = %requested_language,
        locale = %locale,
        language = %language,
        variant = %variant,
        "Resolved locale"
    );

    Ok(ResolvedLocale {
        locale,
        language,
        variant,
    })
}

fn expand_short(tables: &LocaleConfig, code: &str) -> Option<String> {
    if code.len() != 2 {
        return None;
    }
    tables.code_short_to_long.get(code).cloned()
}
