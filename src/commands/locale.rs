use anyhow::Result;
use std::process::ExitCode;

use locale_text::config::Config;
use locale_text::locale;

use super::failure;

/// Negotiate a supported locale and language
pub fn resolve(config: &Config, requested_locale: &str, requested_language: &str, json: bool) -> Result<ExitCode> {
    let resolved = match locale::resolve(&config.locale, requested_locale, requested_language) {
        Ok(resolved) => resolved,
        Err(err) => return Ok(failure("Locale resolution", &err)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("Locale: {}", resolved.locale);
        println!("Language: {}", resolved.language);
        println!("Profile: {}", resolved.variant);
    }

    Ok(ExitCode::SUCCESS)
}

/// Print the formatting profile a locale request resolves to
pub fn profile(config: &Config, requested_locale: &str) -> Result<ExitCode> {
    let resolved = match locale::resolve(&config.locale, requested_locale, "") {
        Ok(resolved) => resolved,
        Err(err) => return Ok(failure("Locale resolution", &err)),
    };

    let profile = resolved.variant.profile();

    println!("Locale Profile: {}", resolved.locale);
    println!("{}", "=".repeat(16 + resolved.locale.len()));
    println!("{}", serde_json::to_string_pretty(&profile)?);

    Ok(ExitCode::SUCCESS)
}
