//! Identifier to final text
//!
//! [`TextResolver::text`] parses an identifier, looks it up in a
//! [`TextStore`], applies the missing-text policy and substitutes
//! placeholders.
//!
//! Missing text is resolved in this order:
//!
//! 1. a caller-supplied default, used as found text
//! 2. [`Error::TextNotFound`] when `error_on_not_found` is set
//! 3. one logged warning and the not-found template, with `%identifier`
//!    replaced and no other substitution
//!
//! A value whose shape disagrees with the identifier is never "missing": it
//! always fails with [`Error::TextIdentifier`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::TextConfig;
use crate::error::{Error, Result, ShapeMismatch};
use crate::text::identifier::TextIdentifier;
use crate::text::logger::{TextLogger, TracingLogger};
use crate::text::store::TextStore;
use crate::text::value::TextValue;

/// Placeholder marker
const PLACEHOLDER_PREFIX: char = '%';

/// Resolves identifiers against one language's store
pub struct TextResolver {
    store: Arc<TextStore>,
    error_on_not_found: bool,
    not_found_template: String,
    logger: Arc<dyn TextLogger>,
}

impl TextResolver {
    /// Create a resolver logging through `tracing`
    pub fn new(store: Arc<TextStore>, config: &TextConfig) -> Self {
        Self {
            store,
            error_on_not_found: config.error_on_not_found,
            not_found_template: config.not_found_template.clone(),
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the warning sink
    pub fn with_logger(mut self, logger: Arc<dyn TextLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn store(&self) -> &Arc<TextStore> {
        &self.store
    }

    /// Resolve `identifier` to text
    ///
    /// `replacers` are `(name, value)` pairs substituted for `%name`.
    /// `default` stands in for missing text; `Some("")` is a default, `None`
    /// is not.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] for a malformed identifier
    /// - [`Error::TextIdentifier`] when the stored value's shape doesn't fit
    /// - [`Error::TextNotFound`] for missing text, only with
    ///   `error_on_not_found` and no default
    /// - [`Error::Persistence`] when the store can't load
    pub fn text(
        &self,
        identifier: &str,
        replacers: &[(&str, &str)],
        default: Option<&str>,
    ) -> Result<String> {
        let id = TextIdentifier::parse(identifier)?;

        let found = match (self.store.get(id.section(), id.key())?, id.sub()) {
            (Some(TextValue::Scalar(text)), None) => Some(text),
            (Some(_), None) => {
                return Err(Error::TextIdentifier {
                    identifier: id.to_string(),
                    mismatch: ShapeMismatch::MissingSubKey,
                })
            }
            (Some(TextValue::Scalar(_)), Some(_)) => {
                return Err(Error::TextIdentifier {
                    identifier: id.to_string(),
                    mismatch: ShapeMismatch::SurplusSubKey,
                })
            }
            (Some(value), Some(sub)) => match value.sub(sub) {
                Some(text) => Some(text.to_string()),
                None => {
                    if default.is_none() && self.error_on_not_found {
                        return Err(Error::TextIdentifier {
                            identifier: id.to_string(),
                            mismatch: ShapeMismatch::UnknownSubKey,
                        });
                    }
                    None
                }
            },
            (None, _) => None,
        };

        let text = match (found, default) {
            (Some(text), _) => text,
            (None, Some(default)) => default.to_string(),
            (None, None) => return self.not_found(&id),
        };

        Ok(substitute(&text, replacers))
    }

    fn not_found(&self, id: &TextIdentifier) -> Result<String> {
        let identifier = id.to_string();

        if self.error_on_not_found {
            return Err(Error::TextNotFound { identifier });
        }

        self.logger.warning(
            "Locale text not found",
            &[
                ("language", self.store.language()),
                ("identifier", identifier.as_str()),
            ],
        );

        Ok(self.not_found_template.replace("%identifier", &identifier))
    }
}

/// Replace `%name` placeholders in one pass
///
/// Names may be given with or without the leading `%`; empty names and a
/// bare `%` are ignored, and a later duplicate name wins. At each `%` the
/// longest matching name is used, so `%ab` beats `%a`. Replacement values
/// are never rescanned, which makes the result independent of replacer order.
///
/// # Example
///
/// ```
/// use locale_text::text::substitute;
///
/// assert_eq!(substitute("%a-%b", &[("b", "2"), ("%a", "1")]), "1-2");
/// ```
pub fn substitute(text: &str, replacers: &[(&str, &str)]) -> String {
    let lookup: HashMap<&str, &str> = replacers
        .iter()
        .map(|&(name, value)| (name.strip_prefix(PLACEHOLDER_PREFIX).unwrap_or(name), value))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    if lookup.is_empty() || !text.contains(PLACEHOLDER_PREFIX) {
        return text.to_string();
    }

    let mut names: Vec<&str> = lookup.keys().copied().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(position) = rest.find(PLACEHOLDER_PREFIX) {
        output.push_str(&rest[..position]);
        let after = &rest[position + PLACEHOLDER_PREFIX.len_utf8()..];

        match names.iter().find(|name| after.starts_with(*name)) {
            Some(name) => {
                output.push_str(lookup[name]);
                rest = &after[name.len()..];
            }
            None => {
                output.push(PLACEHOLDER_PREFIX);
                rest = after;
            }
        }
    }
    output.push_str(rest);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::create_memory_store;
    use crate::text::paths::SourcePath;
    use crate::text::source::TextSource;
    use crate::text::logger::NoopLogger;
    use crate::text::value::{TextCollection, TextMap};
    use proptest::prelude::*;
    use std::sync::Mutex;

    struct InlineSource(TextCollection);

    impl TextSource for InlineSource {
        fn load(&self, _language: &str, _paths: &[SourcePath]) -> Result<TextCollection> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        warnings: Mutex<Vec<String>>,
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

    fn fixture() -> TextCollection {
        let mut collection = TextCollection::new();
        collection.insert("greeting", "hello", TextValue::from("Hello %name"));
        collection.insert("greeting", "plain", TextValue::from("Hi"));
        collection.insert(
            "weekday",
            "name",
            TextValue::from(vec![String::from("Sunday"), String::from("Monday")]),
        );
        collection.insert(
            "app",
            "menu",
            TextValue::Map(TextMap::from([(String::from("home"), String::from("Home %user"))])),
        );
        collection
    }

    fn resolver(error_on_not_found: bool) -> (TextResolver, Arc<RecordingLogger>) {
        let store = Arc::new(TextStore::new(
            "en-us",
            Vec::new(),
            Arc::new(InlineSource(fixture())),
            create_memory_store(),
        ));
        let config = TextConfig {
            error_on_not_found,
            ..TextConfig::default()
        };
        let logger = Arc::new(RecordingLogger::default());
        let resolver = TextResolver::new(store, &config).with_logger(logger.clone());
        (resolver, logger)
    }

    #[test]
    fn test_scalar_with_replacer() {
        let (resolver, _) = resolver(false);
        assert_eq!(
            resolver
                .text("greeting:hello", &[("name", "World")], None)
                .unwrap(),
            "Hello World"
        );
    }

    #[test]
    fn test_list_and_mapping_sub_keys() {
        let (resolver, _) = resolver(false);
        assert_eq!(resolver.text("weekday:name:1", &[], None).unwrap(), "Monday");
        assert_eq!(
            resolver.text("app:menu:home", &[("user", "Ada")], None).unwrap(),
            "Home Ada"
        );
        assert!(matches!(
            resolver.text("app:menu", &[], None),
            Err(Error::TextIdentifier {
                mismatch: ShapeMismatch::MissingSubKey,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_identifier_always_fails() {
        let (resolver, _) = resolver(false);
        for raw in ["", "greeting", "a:b:c:d", "greeting:"] {
            assert!(matches!(
                resolver.text(raw, &[], Some("fallback")),
                Err(Error::InvalidIdentifier { .. })
            ));
        }
    }

    #[test]
    fn test_shape_mismatch_always_fails() {
        let (resolver, _) = resolver(false);

        let err = resolver.text("weekday:name", &[], Some("x")).unwrap_err();
        assert!(matches!(
            err,
            Error::TextIdentifier {
                mismatch: ShapeMismatch::MissingSubKey,
                ..
            }
        ));

        let err = resolver.text("greeting:plain:0", &[], Some("x")).unwrap_err();
        assert!(matches!(
            err,
            Error::TextIdentifier {
                mismatch: ShapeMismatch::SurplusSubKey,
                ..
            }
        ));
    }

    #[test]
    fn test_soft_not_found_logs_once() {
        let (resolver, logger) = resolver(false);
        let text = resolver.text("greeting:missing", &[("x", "y")], None).unwrap();

        assert_eq!(text, "Locale text not found: greeting:missing");
        let warnings = logger.warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("identifier=greeting:missing"));
    }

    #[test]
    fn test_noop_logger_keeps_soft_not_found() {
        let (resolver, _) = resolver(false);
        let resolver = resolver.with_logger(Arc::new(NoopLogger));

        assert_eq!(
            resolver.text("greeting:missing", &[], None).unwrap(),
            "Locale text not found: greeting:missing"
        );
    }

    #[test]
    fn test_hard_not_found() {
        let (resolver, logger) = resolver(true);
        assert!(matches!(
            resolver.text("greeting:missing", &[], None),
            Err(Error::TextNotFound { .. })
        ));
        assert!(logger.warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn test_default_bypasses_not_found() {
        let (resolver, logger) = resolver(true);
        assert_eq!(
            resolver
                .text("greeting:missing", &[("n", "1")], Some("Default %n"))
                .unwrap(),
            "Default 1"
        );
        assert_eq!(resolver.text("greeting:missing", &[], Some("")).unwrap(), "");
        assert!(logger.warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_sub_key_follows_not_found_policy() {
        let (soft, logger) = resolver(false);
        assert_eq!(
            soft.text("weekday:name:9", &[], None).unwrap(),
            "Locale text not found: weekday:name:9"
        );
        assert_eq!(logger.warnings.lock().unwrap().len(), 1);
        assert_eq!(soft.text("weekday:name:9", &[], Some("?")).unwrap(), "?");

        let (hard, _) = resolver(true);
        assert!(matches!(
            hard.text("weekday:name:9", &[], None),
            Err(Error::TextIdentifier {
                mismatch: ShapeMismatch::UnknownSubKey,
                ..
            })
        ));
        assert_eq!(hard.text("weekday:name:9", &[], Some("?")).unwrap(), "?");
    }

    #[test]
    fn test_substitute_basics() {
        assert_eq!(substitute("%a-%b", &[("a", "1"), ("b", "2")]), "1-2");
        assert_eq!(substitute("%a-%b", &[("%a", "1"), ("%b", "2")]), "1-2");
        assert_eq!(substitute("%a", &[("", "x"), ("%", "y")]), "%a");
        assert_eq!(substitute("100% sure", &[("a", "1")]), "100% sure");
        assert_eq!(substitute("%ab %a", &[("a", "1"), ("ab", "2")]), "2 1");
        assert_eq!(substitute("%a", &[("a", "1"), ("a", "2")]), "2");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        assert_eq!(substitute("%a %b", &[("a", "%b"), ("b", "x")]), "%b x");
    }

    proptest! {
        #[test]
        fn prop_substitute_order_independent(a in "[a-z ]{0,8}", b in "[a-z ]{0,8}") {
            let forward = substitute("%first-%second", &[("first", a.as_str()), ("second", b.as_str())]);
            let backward = substitute("%first-%second", &[("second", b.as_str()), ("first", a.as_str())]);
            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(forward, format!("{a}-{b}"));
        }

        #[test]
        fn prop_substitute_idempotent(prefix in "[a-z ]{0,8}", suffix in "[a-z ]{0,8}", value in "[a-z]{0,6}") {
            let text = format!("{prefix}%key{suffix}");
            let once = substitute(&text, &[("key", value.as_str())]);
            let twice = substitute(&once, &[("key", value.as_str())]);
            prop_assert_eq!(once, twice);
        }
    }
}
