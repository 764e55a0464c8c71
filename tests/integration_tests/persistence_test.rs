//! Runtime edits and the persistent cache store

use std::sync::Arc;

use locale_text::error::Error;
use locale_text::storage::{open_cache_store, MemoryTextCacheStore, TextCacheStore};
use locale_text::text::{ExportOptions, TextMap, TextStore, TextValue};

use crate::common::{TextDirs, EN_US_BASE};

fn dirs() -> TextDirs {
    let mut dirs = TextDirs::new();
    dirs.write("base", "locale-text.en-us.toml", EN_US_BASE);
    dirs
}

#[test]
fn test_edits_survive_restart() {
    let dirs = dirs();
    let config = dirs.sqlite_config();

    {
        let store =
            TextStore::from_config("en-us", &config, open_cache_store(&config.cache).unwrap());
        store
            .set("app", "title", TextValue::from("Edited title"))
            .unwrap();
        store
            .set(
                "app",
                "menu",
                TextValue::Map(TextMap::from([(
                    String::from("home"),
                    String::from("Home"),
                )])),
            )
            .unwrap();
        assert!(store.delete("greeting", "goodbye").unwrap());
    }

    // New process: fresh cache store handle, fresh text store
    let store = TextStore::from_config("en-us", &config, open_cache_store(&config.cache).unwrap());
    assert!(store.populated_at().unwrap().is_some());
    assert_eq!(
        store.get("app", "title").unwrap(),
        Some(TextValue::from("Edited title"))
    );
    assert!(store.get("app", "menu").unwrap().unwrap().as_map().is_some());
    assert!(!store.has("greeting", "goodbye").unwrap());
}

#[test]
fn test_refresh_restores_source_state_across_restart() {
    let dirs = dirs();
    let config = dirs.sqlite_config();

    {
        let store =
            TextStore::from_config("en-us", &config, open_cache_store(&config.cache).unwrap());
        store.set("app", "title", TextValue::from("Edited")).unwrap();
        store.refresh().unwrap();
    }

    let store = TextStore::from_config("en-us", &config, open_cache_store(&config.cache).unwrap());
    assert_eq!(
        store.get("app", "title").unwrap(),
        Some(TextValue::from("Base title"))
    );
}

#[test]
fn test_source_changes_need_refresh() {
    let mut dirs = dirs();
    let config = dirs.sqlite_config();
    let cache = open_cache_store(&config.cache).unwrap();

    let store = TextStore::from_config("en-us", &config, Arc::clone(&cache));
    assert!(store.has("app", "title").unwrap());

    dirs.write(
        "base",
        "locale-text.en-us.toml",
        "[app]\ntitle = \"Rewritten\"\n",
    );

    // The cache store is authoritative until refreshed
    let reopened = TextStore::from_config("en-us", &config, Arc::clone(&cache));
    assert_eq!(
        reopened.get("app", "title").unwrap(),
        Some(TextValue::from("Base title"))
    );

    reopened.refresh().unwrap();
    assert_eq!(
        reopened.get("app", "title").unwrap(),
        Some(TextValue::from("Rewritten"))
    );
    assert!(!reopened.has("greeting", "hello").unwrap());
}

#[test]
fn test_failed_writes_never_diverge() {
    let dirs = dirs();
    let cache = Arc::new(MemoryTextCacheStore::new());
    let store = TextStore::from_config("en-us", &dirs.config(), cache.clone());
    let before = store.snapshot().unwrap();

    cache.set_fail_writes(true);

    assert!(matches!(
        store.set("app", "title", TextValue::from("Lost")),
        Err(Error::Persistence { .. })
    ));
    assert!(matches!(
        store.delete("app", "title"),
        Err(Error::Persistence { .. })
    ));
    assert!(matches!(store.refresh(), Err(Error::Persistence { .. })));

    assert_eq!(store.snapshot().unwrap(), before);
    assert_eq!(cache.load("en-us").unwrap(), before);
}

#[test]
fn test_first_load_failure_is_reported() {
    let dirs = dirs();
    let cache = Arc::new(MemoryTextCacheStore::new());
    cache.set_fail_writes(true);

    let store = TextStore::from_config("en-us", &dirs.config(), cache);
    assert!(matches!(
        store.get("app", "title"),
        Err(Error::Persistence { .. })
    ));
}

#[test]
fn test_export_round_trip_through_file() {
    let dirs = dirs();
    let store = TextStore::from_config("en-us", &dirs.config(), Arc::new(MemoryTextCacheStore::new()));
    let target = dirs.scratch("export/en-us.json");

    store
        .export(
            &target,
            &ExportOptions {
                pretty: true,
                ..ExportOptions::default()
            },
        )
        .unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(exported["greeting"]["hello"], "Hello %name");
    assert_eq!(exported["weekday"]["name"][1], "Monday");
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[test]
fn test_item_order_survives_cache_and_export() {
    let quoted: Vec<String> = MONTHS.iter().map(|m| format!("\"{m}\"")).collect();
    let mut dirs = TextDirs::new();
    dirs.write(
        "base",
        "locale-text.en-us.toml",
        &format!(
            "[month]\nname = [{}]\n\n[app]\nmenu = {{ zulu = \"Z\", alpha = \"A\" }}\n",
            quoted.join(", ")
        ),
    );
    let config = dirs.sqlite_config();

    {
        let store =
            TextStore::from_config("en-us", &config, open_cache_store(&config.cache).unwrap());
        let json = store.export_string(&ExportOptions::default()).unwrap();
        assert!(json.contains(&format!("\"name\":[{}]", quoted.join(","))));
        assert!(json.contains(r#""menu":{"zulu":"Z","alpha":"A"}"#));
    }

    // Served from the SQLite cache this time
    let store = TextStore::from_config("en-us", &config, open_cache_store(&config.cache).unwrap());
    assert!(store.populated_at().unwrap().is_some());

    let months = store.get("month", "name").unwrap().unwrap();
    assert_eq!(months.as_list().unwrap(), MONTHS);
    assert_eq!(months.sub("2"), Some("mar"));
    assert_eq!(
        store.get("app", "menu").unwrap().unwrap().sub_keys(),
        ["zulu", "alpha"]
    );
}
