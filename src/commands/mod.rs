pub mod locale;
pub mod text;

// Re-export command functions for convenience
pub use locale::{profile, resolve};
pub use text::{delete, export, get, refresh, set, status, text, ExportParams, TextParams};

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use locale_text::error::{Error, LocaleErrorTrait};
use locale_text::locale::is_valid_code;
use locale_text::text::is_valid_key;
use locale_text::utils::escape_control_chars;

/// Argument validation problems of one command invocation
#[derive(Debug, Default)]
pub struct InputErrors(Vec<String>);

impl InputErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a language code already in `xx-yy` form
    pub fn language(&mut self, language: &str) -> &mut Self {
        if language.is_empty() {
            self.0.push(String::from("Empty 'language' argument."));
        } else if !is_valid_code(language) {
            self.0.push(String::from("Invalid 'language' argument."));
        }
        self
    }

    /// Require a legal section, key or sub-key token
    pub fn token(&mut self, name: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.0.push(format!("Empty '{name}' argument."));
        } else if !is_valid_key(value) {
            self.0.push(format!("Invalid '{name}' argument."));
        }
        self
    }

    pub fn push(&mut self, message: impl Into<String>) -> &mut Self {
        self.0.push(message.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Ask on stdin; true only for one of the `accepted` answers
pub fn confirm(prompt: &str, accepted: &[&str]) -> io::Result<bool> {
    print!("{prompt} ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();

    Ok(accepted.iter().any(|accept| *accept == answer))
}

/// `language[..] section[..] key[..]`, escaped for the terminal
pub fn describe_item(language: &str, section: &str, key: &str) -> String {
    format!(
        "language[{}] section[{}] key[{}]",
        escape_control_chars(language),
        escape_control_chars(section),
        escape_control_chars(key)
    )
}

/// Print a command header with its argument values
pub fn print_header(command: &str, fields: &[(&str, &str)]) {
    println!("{command}");
    println!("{}", "=".repeat(command.len()));
    for (name, value) in fields {
        println!("  {name}: {}", escape_control_chars(value));
    }
}

pub fn success(message: &str) -> ExitCode {
    println!("{message}");
    ExitCode::SUCCESS
}

pub fn notice(message: &str) -> ExitCode {
    eprintln!("notice: {message}");
    ExitCode::FAILURE
}

/// Report a library failure and fail the command
pub fn failure(action: &str, err: &Error) -> ExitCode {
    tracing::error!(error = %err, category = err.category().description(), "{action} failed");
    eprintln!("error: {action} failed. {}", err.user_message());
    ExitCode::FAILURE
}
