use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use locale_text::config::Config;
use locale_text::locale::LocaleFactory;
use locale_text::storage::open_cache_store;
use locale_text::text::{ExportOptions, TextStore, TextValue};
use locale_text::utils::escape_control_chars;

use super::{confirm, describe_item, failure, notice, print_header, success};

fn open_store(config: &Config, language: &str) -> Result<TextStore> {
    let cache_store = open_cache_store(&config.cache).context("Failed to open cache store")?;
    Ok(TextStore::from_config(language, config, cache_store))
}

fn render_value(value: &TextValue, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Print one item
///
/// Without `print` only the value is written: scalars raw, mappings as JSON.
pub fn get(config: &Config, language: &str, section: &str, key: &str, print: bool) -> Result<ExitCode> {
    let store = open_store(config, language)?;

    if print {
        print_header(
            "get",
            &[("language", language), ("section", section), ("key", key)],
        );
        println!();
    }

    let value = match store.get(section, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            return Ok(notice(&format!(
                "Locale-text {} doesn't exist.",
                describe_item(language, section, key)
            )))
        }
        Err(err) => return Ok(failure("Get", &err)),
    };

    match (&value, print) {
        (TextValue::Scalar(text), false) => println!("{text}"),
        (_, pretty) => println!("{}", render_value(&value, pretty)?),
    }

    Ok(ExitCode::SUCCESS)
}

/// Insert or overwrite one item
pub fn set(
    config: &Config,
    language: &str,
    section: &str,
    key: &str,
    value: TextValue,
    yes: bool,
) -> Result<ExitCode> {
    let shown = match &value {
        TextValue::Scalar(text) => text.clone(),
        _ => render_value(&value, false)?,
    };

    if !yes {
        print_header(
            "set",
            &[
                ("language", language),
                ("section", section),
                ("key", key),
                ("value", shown.as_str()),
            ],
        );
        if !confirm(
            "Set that locale-text item? Type 'yes' or 'y' to continue:",
            &["yes", "y"],
        )? {
            return Ok(notice("Aborted setting locale-text item."));
        }
    }

    let store = open_store(config, language)?;
    match store.set(section, key, value) {
        Ok(()) => Ok(success(&format!(
            "Set locale-text item {} value[{}].",
            describe_item(language, section, key),
            escape_control_chars(&shown)
        ))),
        Err(err) => Ok(failure("Set", &err)),
    }
}

/// Delete one item
pub fn delete(config: &Config, language: &str, section: &str, key: &str, yes: bool) -> Result<ExitCode> {
    if !yes {
        print_header(
            "delete",
            &[("language", language), ("section", section), ("key", key)],
        );
        if !confirm(
            "Delete that locale-text item? Type 'yes' or 'y' to continue:",
            &["yes", "y"],
        )? {
            return Ok(notice("Aborted deleting locale-text item."));
        }
    }

    let store = open_store(config, language)?;
    match store.delete(section, key) {
        Ok(true) => Ok(success(&format!(
            "Deleted locale-text item {}.",
            describe_item(language, section, key)
        ))),
        Ok(false) => Ok(notice(&format!(
            "Locale-text {} doesn't exist.",
            describe_item(language, section, key)
        ))),
        Err(err) => Ok(failure("Delete", &err)),
    }
}

/// Rebuild a language from its sources, dropping runtime edits
pub fn refresh(config: &Config, language: &str, yes: bool) -> Result<ExitCode> {
    if !yes {
        print_header("refresh", &[("language", language)]);
        println!(
            "NB: every item set, overwritten or deleted since the last refresh will be gone,\n\
             or restored to its source file state."
        );
        // Full word only, this can't be undone
        if !confirm(
            "Refresh that locale-text language? Type 'yes' to continue:",
            &["yes"],
        )? {
            return Ok(notice("Aborted refreshing locale-text language."));
        }
    }

    let store = open_store(config, language)?;
    match store.refresh() {
        Ok(()) => Ok(success(&format!(
            "Refreshed locale-text language[{}].",
            escape_control_chars(language)
        ))),
        Err(err) => Ok(failure("Refresh", &err)),
    }
}

/// Parameters of the export command
#[derive(Debug, Clone)]
pub struct ExportParams {
    pub language: String,
    pub target: PathBuf,
    pub options: ExportOptions,
    pub yes: bool,
}

/// Write a language's collection to a JSON file
pub fn export(config: &Config, params: ExportParams) -> Result<ExitCode> {
    export_confirmed_by(config, params, confirm)
}

/// Export, asking `confirm` first unless the command was pre-confirmed
fn export_confirmed_by<F>(config: &Config, params: ExportParams, mut confirm: F) -> Result<ExitCode>
where
    F: FnMut(&str, &[&str]) -> io::Result<bool>,
{
    let ExportParams {
        language,
        target,
        options,
        yes,
    } = params;

    if !yes {
        print_header(
            "export",
            &[
                ("language", language.as_str()),
                ("target", target.display().to_string().as_str()),
            ],
        );
        let prompt = if target.exists() {
            "Target exists, overwrite it? Type 'yes' or 'y' to continue:"
        } else {
            "Export that locale-text language? Type 'yes' or 'y' to continue:"
        };
        if !confirm(prompt, &["yes", "y"])? {
            return Ok(notice("Aborted exporting locale-text language."));
        }
    }

    let store = open_store(config, &language)?;
    match store.export(&target, &options) {
        Ok(()) => Ok(success(&format!(
            "Exported locale-text language[{}] to {}.",
            escape_control_chars(&language),
            target.display()
        ))),
        Err(err) => Ok(failure("Export", &err)),
    }
}

/// Parameters of the text command
#[derive(Debug, Clone, Default)]
pub struct TextParams {
    pub identifier: String,
    pub locale: String,
    pub language: String,
    pub replacers: Vec<(String, String)>,
    pub default: Option<String>,
}

/// Resolve an identifier the way an application would
pub fn text(config: &Config, params: TextParams) -> Result<ExitCode> {
    let factory = LocaleFactory::from_config(config.clone())?;
    let locale = factory.create(&params.locale, &params.language)?;

    let replacers: Vec<(&str, &str)> = params
        .replacers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    match locale.text(&params.identifier, &replacers, params.default.as_deref()) {
        Ok(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(failure("Text resolution", &err)),
    }
}

/// Show sources and cache state of a language
pub fn status(config: &Config, language: &str) -> Result<ExitCode> {
    let store = open_store(config, language)?;

    println!("Locale Text Status");
    println!("==================");
    println!("Language: {language}");
    println!("File suffix: {}", config.text.file_suffix);
    println!("Cache backend: {:?}", config.cache.backend);
    println!();

    println!("Sources (lowest precedence first)");
    println!("---------------------------------");
    if store.sources().is_empty() {
        println!("  (none configured)");
    }
    for source in store.sources() {
        let state = if source.path().is_dir() { "ok" } else { "missing" };
        println!("  {:<16} {} [{state}]", source.id, source.path().display());
    }
    println!();

    match store.populated_at() {
        Ok(Some(at)) => println!("Populated: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        Ok(None) => println!("Populated: never (loads from sources on first read)"),
        Err(err) => return Ok(failure("Status", &err)),
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use locale_text::config::CacheBackend;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(base.join("locale-text.en-us.toml"), "[app]\ntitle = \"Title\"\n").unwrap();

        let mut config = Config::default();
        config.locale.text_paths = [(String::from("base"), base)].into_iter().collect();
        config.cache.backend = CacheBackend::Memory;
        (dir, config)
    }

    fn params(dir: &TempDir, yes: bool) -> ExportParams {
        ExportParams {
            language: String::from("en-us"),
            target: dir.path().join("out/en-us.json"),
            options: ExportOptions::default(),
            yes,
        }
    }

    #[test]
    fn test_export_to_new_target_asks_first() {
        let (dir, config) = setup();
        let prompts = RefCell::new(Vec::new());

        export_confirmed_by(&config, params(&dir, false), |prompt, _| {
            prompts.borrow_mut().push(prompt.to_string());
            Ok(false)
        })
        .unwrap();

        assert_eq!(prompts.borrow().len(), 1);
        assert!(prompts.borrow()[0].starts_with("Export that"));
        assert!(!dir.path().join("out/en-us.json").exists());
    }

    #[test]
    fn test_export_existing_target_asks_to_overwrite() {
        let (dir, config) = setup();
        let target = dir.path().join("out/en-us.json");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "{}").unwrap();
        let prompts = RefCell::new(Vec::new());

        export_confirmed_by(&config, params(&dir, false), |prompt, _| {
            prompts.borrow_mut().push(prompt.to_string());
            Ok(true)
        })
        .unwrap();

        assert!(prompts.borrow()[0].starts_with("Target exists"));
        assert!(std::fs::read_to_string(&target).unwrap().contains("Title"));
    }

    #[test]
    fn test_export_pre_confirmed_skips_prompt() {
        let (dir, config) = setup();

        export_confirmed_by(&config, params(&dir, true), |_, _| {
            panic!("pre-confirmed export must not prompt")
        })
        .unwrap();

        assert!(dir.path().join("out/en-us.json").exists());
    }
}
