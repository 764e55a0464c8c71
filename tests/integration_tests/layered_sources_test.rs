//! Override precedence across text source directories

use std::sync::Arc;

use locale_text::storage::create_memory_store;
use locale_text::text::{TextStore, TextValue};

use crate::common::{TextDirs, EN_US_BASE, EN_US_SITE};

#[test]
fn test_later_identifier_overrides_earlier() {
    let mut dirs = TextDirs::new();
    dirs.write("base", "locale-text.en-us.toml", EN_US_BASE)
        .write("zz-site", "site.locale-text.en-us.toml", EN_US_SITE);

    let store = TextStore::from_config("en-us", &dirs.config(), create_memory_store());

    assert_eq!(
        store.get("app", "title").unwrap(),
        Some(TextValue::from("Site title"))
    );
    assert_eq!(
        store.get("app", "footer").unwrap(),
        Some(TextValue::from("Base footer"))
    );
    // A scalar may replace a mapping
    assert_eq!(
        store.get("weekday", "name").unwrap(),
        Some(TextValue::from("not a list any more"))
    );
}

#[test]
fn test_precedence_follows_identifiers_not_creation_order() {
    // "aa-override" sorts before "base", so base wins despite being created last.
    let mut dirs = TextDirs::new();
    dirs.write("aa-override", "locale-text.en-us.toml", EN_US_SITE)
        .write("base", "locale-text.en-us.toml", EN_US_BASE);

    let store = TextStore::from_config("en-us", &dirs.config(), create_memory_store());
    assert_eq!(
        store.get("app", "title").unwrap(),
        Some(TextValue::from("Base title"))
    );
    assert_eq!(
        store.sources().iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        ["aa-override", "base"]
    );
}

#[test]
fn test_languages_load_only_their_files() {
    let mut dirs = TextDirs::new();
    dirs.write("base", "locale-text.en-us.toml", EN_US_BASE).write(
        "base",
        "locale-text.da-dk.toml",
        "[greeting]\nhello = \"Hej %name\"\n",
    );
    let config = dirs.config();
    let cache = create_memory_store();

    let danish = TextStore::from_config("da-dk", &config, Arc::clone(&cache));
    let english = TextStore::from_config("en-us", &config, cache);

    assert_eq!(
        danish.get("greeting", "hello").unwrap(),
        Some(TextValue::from("Hej %name"))
    );
    assert!(!danish.has("app", "title").unwrap());
    assert!(english.has("app", "title").unwrap());
}

#[test]
fn test_missing_directory_does_not_block_others() {
    let mut dirs = TextDirs::new();
    dirs.write("base", "locale-text.en-us.toml", EN_US_BASE);

    let mut config = dirs.config();
    config
        .locale
        .text_paths
        .insert(String::from("zz-gone"), dirs.missing("zz-gone"));

    let store = TextStore::from_config("en-us", &config, create_memory_store());
    assert!(store.has("greeting", "hello").unwrap());
}

#[test]
fn test_broken_source_file_fails_the_load() {
    let mut dirs = TextDirs::new();
    dirs.write("base", "locale-text.en-us.toml", "[greeting\nhello = 1");

    let store = TextStore::from_config("en-us", &dirs.config(), create_memory_store());
    assert!(store.get("greeting", "hello").is_err());
    assert!(!store.is_loaded());
}
