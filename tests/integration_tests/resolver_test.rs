//! Text resolution through the locale facade

use std::sync::Arc;

use locale_text::error::{Error, ShapeMismatch};
use locale_text::locale::LocaleFactory;
use locale_text::storage::create_memory_store;

use crate::common::{RecordingLogger, TextDirs, EN_US_BASE};

struct Fixture {
    factory: LocaleFactory,
    logger: Arc<RecordingLogger>,
    // Sources are read lazily; keep the directories alive
    _dirs: TextDirs,
}

fn setup(error_on_not_found: bool) -> Fixture {
    let mut dirs = TextDirs::new();
    dirs.write("base", "locale-text.en-us.toml", EN_US_BASE).write(
        "base",
        "locale-text.da-dk.toml",
        "[greeting]\nhello = \"Hej %name\"\n",
    );

    let mut config = dirs.config();
    config.text.error_on_not_found = error_on_not_found;

    let logger = Arc::new(RecordingLogger::default());
    let factory = LocaleFactory::new(config, create_memory_store()).with_logger(logger.clone());
    Fixture {
        factory,
        logger,
        _dirs: dirs,
    }
}

#[test]
fn test_text_with_replacers() {
    let Fixture { factory, _dirs, .. } = setup(false);
    let locale = factory.create("", "").unwrap();

    assert_eq!(
        locale
            .text("greeting:hello", &[("name", "World")], None)
            .unwrap(),
        "Hello World"
    );
    assert_eq!(locale.text("weekday:name:0", &[], None).unwrap(), "Sunday");
}

#[test]
fn test_language_selects_text() {
    let Fixture { factory, _dirs, .. } = setup(false);
    let locale = factory.create("en-gb", "da").unwrap();

    assert_eq!(locale.locale(), "en-gb");
    assert_eq!(
        locale
            .text("greeting:hello", &[("%name", "Verden")], None)
            .unwrap(),
        "Hej Verden"
    );
}

#[test]
fn test_soft_not_found_logs_exactly_once() {
    let Fixture { factory, logger, _dirs } = setup(false);
    let locale = factory.create("", "").unwrap();

    let text = locale.text("greeting:unknown", &[("name", "x")], None).unwrap();

    assert_eq!(text, "Locale text not found: greeting:unknown");
    assert_eq!(logger.count(), 1);
    assert!(logger.warnings()[0].contains("greeting:unknown"));
}

#[test]
fn test_hard_not_found() {
    let Fixture { factory, logger, _dirs } = setup(true);
    let locale = factory.create("", "").unwrap();

    assert!(matches!(
        locale.text("greeting:unknown", &[], None),
        Err(Error::TextNotFound { .. })
    ));
    assert_eq!(logger.count(), 0);
}

#[test]
fn test_default_never_raises_not_found() {
    let Fixture { factory, logger, _dirs } = setup(true);
    let locale = factory.create("", "").unwrap();

    assert_eq!(
        locale
            .text("greeting:unknown", &[], Some("Fallback"))
            .unwrap(),
        "Fallback"
    );
    assert_eq!(locale.text("greeting:unknown", &[], Some("")).unwrap(), "");
    assert_eq!(logger.count(), 0);
}

#[test]
fn test_shape_mismatch_is_not_missing_text() {
    let Fixture { factory, _dirs, .. } = setup(false);
    let locale = factory.create("", "").unwrap();

    assert!(matches!(
        locale.text("greeting:hello:sub", &[], Some("fallback")),
        Err(Error::TextIdentifier {
            mismatch: ShapeMismatch::SurplusSubKey,
            ..
        })
    ));
    assert!(matches!(
        locale.text("weekday:name", &[], None),
        Err(Error::TextIdentifier {
            mismatch: ShapeMismatch::MissingSubKey,
            ..
        })
    ));
}

#[test]
fn test_malformed_identifiers() {
    let Fixture { factory, _dirs, .. } = setup(false);
    let locale = factory.create("", "").unwrap();

    for raw in ["", "greeting", "greeting:hello:a:b", "greeting::x", "gree ting:hello"] {
        assert!(
            matches!(
                locale.text(raw, &[], Some("x")),
                Err(Error::InvalidIdentifier { .. })
            ),
            "{raw}"
        );
    }
}

#[test]
fn test_runtime_edit_visible_to_every_locale_of_the_language() {
    let Fixture { factory, _dirs, .. } = setup(false);
    let us = factory.create("en-us", "").unwrap();
    let gb = factory.create("en-gb", "en-us").unwrap();

    us.resolver()
        .store()
        .set("greeting", "hello", "Howdy %name".into())
        .unwrap();

    assert_eq!(
        gb.text("greeting:hello", &[("name", "partner")], None)
            .unwrap(),
        "Howdy partner"
    );
}
