use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locale_text::config::Config;
use locale_text::text::{ExportOptions, TextValue};

mod commands;

use commands::{ExportParams, InputErrors, TextParams};

#[derive(Parser)]
#[command(
    name = "locale-text",
    version,
    about = "Locale negotiation and layered, identifier-addressed localized text",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $LOCALE_TEXT_CONFIG, else built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a locale-text item
    Get {
        /// Language, like da-dk
        language: String,

        /// Text section
        section: String,

        /// Text item key
        key: String,

        /// Print with a header, JSON-encoded
        #[arg(short, long)]
        print: bool,
    },

    /// Set a locale-text item
    ///
    /// Persists in the cache store until the next refresh; source files are
    /// never written.
    Set {
        /// Language, like da-dk
        language: String,

        /// Text section
        section: String,

        /// Text item key
        key: String,

        /// Value to set, please enclose in single quotes
        value: String,

        /// Parse the value as JSON, a string or an object of sub-keyed strings
        #[arg(long)]
        json: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a locale-text item
    Delete {
        /// Language, like da-dk
        language: String,

        /// Text section
        section: String,

        /// Text item key
        key: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Reload a language from its source files
    ///
    /// NB: every item set, overwritten or deleted since the last refresh will
    /// be gone, or restored to its source file state.
    Refresh {
        /// Language, like da-dk
        language: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Export a language's text as JSON
    Export {
        /// Language, like da-dk
        language: String,

        /// Target file
        target: PathBuf,

        /// Read the source files, ignoring runtime edits
        #[arg(long)]
        from_sources: bool,

        /// Indent the output
        #[arg(long)]
        pretty: bool,

        /// Escape non-ASCII characters as \uXXXX
        #[arg(long)]
        escape_unicode: bool,

        /// Escape slashes as \/
        #[arg(long)]
        escape_slashes: bool,

        /// Overwrite an existing target without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Resolve a text identifier, like greeting:hello or weekday:name:0
    Text {
        /// Text identifier
        identifier: String,

        /// Requested locale
        #[arg(long, default_value = "")]
        locale: String,

        /// Requested language
        #[arg(long, default_value = "")]
        language: String,

        /// Placeholder replacement, name=value (repeatable)
        #[arg(short, long = "replace")]
        replace: Vec<String>,

        /// Text to use when the identifier doesn't exist
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Negotiate a supported locale and language
    Resolve {
        /// Requested locale, like da_DK or da
        #[arg(long, default_value = "")]
        locale: String,

        /// Requested language
        #[arg(long, default_value = "")]
        language: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the formatting profile of a locale
    Profile {
        /// Requested locale, like da_DK or da
        locale: String,
    },

    /// Show text sources and cache state of a language
    Status {
        /// Language, like da-dk
        language: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing/logging
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::debug!(config_file = ?cli.config, "locale-text starting");

    match cli.command {
        Commands::Get {
            language,
            section,
            key,
            print,
        } => {
            let mut errors = InputErrors::new();
            errors
                .language(&language)
                .token("section", &section)
                .token("key", &key);
            if !errors.is_empty() {
                return Ok(input_error("get", &errors));
            }
            commands::get(&config, &language, &section, &key, print)
        }

        Commands::Set {
            language,
            section,
            key,
            value,
            json,
            yes,
        } => {
            let mut errors = InputErrors::new();
            errors
                .language(&language)
                .token("section", &section)
                .token("key", &key);
            let value = if json {
                match serde_json::from_str::<TextValue>(&value) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        errors.push(format!("Invalid 'value' argument, not a JSON text value: {err}."));
                        None
                    }
                }
            } else {
                Some(TextValue::Scalar(value))
            };
            match value {
                Some(value) if errors.is_empty() => {
                    commands::set(&config, &language, &section, &key, value, yes)
                }
                _ => Ok(input_error("set", &errors)),
            }
        }

        Commands::Delete {
            language,
            section,
            key,
            yes,
        } => {
            let mut errors = InputErrors::new();
            errors
                .language(&language)
                .token("section", &section)
                .token("key", &key);
            if !errors.is_empty() {
                return Ok(input_error("delete", &errors));
            }
            commands::delete(&config, &language, &section, &key, yes)
        }

        Commands::Refresh { language, yes } => {
            let mut errors = InputErrors::new();
            errors.language(&language);
            if !errors.is_empty() {
                return Ok(input_error("refresh", &errors));
            }
            commands::refresh(&config, &language, yes)
        }

        Commands::Export {
            language,
            target,
            from_sources,
            pretty,
            escape_unicode,
            escape_slashes,
            yes,
        } => {
            let mut errors = InputErrors::new();
            errors.language(&language);
            if target.as_os_str().is_empty() || target.is_dir() {
                errors.push("Invalid 'target' argument, must be a file path.");
            }
            if !errors.is_empty() {
                return Ok(input_error("export", &errors));
            }
            commands::export(
                &config,
                ExportParams {
                    language,
                    target,
                    options: ExportOptions {
                        from_sources,
                        pretty,
                        escape_unicode,
                        escape_slashes,
                    },
                    yes,
                },
            )
        }

        Commands::Text {
            identifier,
            locale,
            language,
            replace,
            default,
        } => {
            let mut errors = InputErrors::new();
            let mut replacers = Vec::with_capacity(replace.len());
            for pair in &replace {
                match pair.split_once('=') {
                    Some((name, value)) => replacers.push((name.to_string(), value.to_string())),
                    None => {
                        errors.push(format!("Invalid 'replace' argument '{pair}', must be name=value."));
                    }
                }
            }
            if !errors.is_empty() {
                return Ok(input_error("text", &errors));
            }
            commands::text(
                &config,
                TextParams {
                    identifier,
                    locale,
                    language,
                    replacers,
                    default,
                },
            )
        }

        Commands::Resolve {
            locale,
            language,
            json,
        } => commands::resolve(&config, &locale, &language, json),

        Commands::Profile { locale } => commands::profile(&config, &locale),

        Commands::Status { language } => {
            let mut errors = InputErrors::new();
            errors.language(&language);
            if !errors.is_empty() {
                return Ok(input_error("status", &errors));
            }
            commands::status(&config, &language)
        }
    }
}

/// Print validation errors and the subcommand's help
fn input_error(subcommand: &str, errors: &InputErrors) -> ExitCode {
    for message in errors.messages() {
        eprintln!("notice: {message}");
    }
    eprintln!();

    let mut command = Cli::command();
    match command.find_subcommand_mut(subcommand) {
        Some(sub) => eprintln!("{}", sub.render_help()),
        None => eprintln!("{}", command.render_help()),
    }

    ExitCode::from(2)
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("locale_text=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("locale_text={level},warn")))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
