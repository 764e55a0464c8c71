//! Unified error handling for the locale-text crate
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! [`Error`] separates caller bugs (malformed identifiers), text-source drift
//! (identifier arity not matching the stored value), missing text, broken
//! configuration and persistence failures.
//!
//! # Architecture
//!
//! - [`LocaleErrorTrait`] - Common interface for classifying errors
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum
//!
//! # Usage
//!
//! ```rust,ignore
//! use locale_text::error::{Error, ErrorCategory, LocaleErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.category() == ErrorCategory::Missing {
//!         eprintln!("Untranslated: {}", err.user_message());
//!     } else {
//!         eprintln!("Fatal error: {err}");
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Common trait for locale-text error types
pub trait LocaleErrorTrait: std::error::Error {
    /// Check if this error is recoverable (the same call may succeed later)
    fn is_recoverable(&self) -> bool;

    /// Get a message suitable for showing to an operator
    fn user_message(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Programming error at the call site (malformed identifier)
    Caller,
    /// Text is absent from the merged collection
    Missing,
    /// Stored value does not match the identifier's shape
    Drift,
    /// Configuration is malformed or internally inconsistent
    Config,
    /// Source files, cache store or export target failed
    Storage,
}

impl ErrorCategory {
    /// Short description of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::Caller => "caller error",
            Self::Missing => "missing text",
            Self::Drift => "text source drift",
            Self::Config => "configuration error",
            Self::Storage => "storage error",
        }
    }
}

/// Why a found value does not fit the identifier that addressed it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// Two-part identifier, but the stored value is a mapping
    MissingSubKey,
    /// Three-part identifier, but the stored value is a scalar
    SurplusSubKey,
    /// Three-part identifier whose mapping has no such sub-key
    UnknownSubKey,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSubKey => write!(f, "missing trailing sub-key, value is a mapping"),
            Self::SurplusSubKey => write!(f, "surplus sub-key, value is not a mapping"),
            Self::UnknownSubKey => write!(f, "mapping has no such sub-key"),
        }
    }
}

/// Unified error type for the locale-text crate
#[derive(Error, Debug)]
pub enum Error {
    /// Identifier isn't `section:key` or `section:key:sub`
    #[error("Invalid text identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// Text doesn't exist in the merged collection
    #[error("Locale text not found: {identifier}")]
    TextNotFound { identifier: String },

    /// Identifier arity and stored value shape disagree
    #[error("Locale text identifier '{identifier}' mismatch: {mismatch}")]
    TextIdentifier {
        identifier: String,
        mismatch: ShapeMismatch,
    },

    /// Mapping tables lack an entry the resolver relies on
    #[error("Configuration integrity fault: {0}")]
    ConfigurationIntegrity(String),

    /// Cache store or export target could not complete an operation
    #[error("Persistence failure during '{operation}': {reason}")]
    Persistence { operation: String, reason: String },

    /// Source file could not be parsed
    #[error("Failed to parse text source {path}: {source}")]
    SourceParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Source file parsed, but its layout isn't sections of text items
    #[error("Invalid text source {path}: {reason}")]
    InvalidSource { path: String, reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

}

impl LocaleErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::TextNotFound { .. } => true,
            Self::Io(_) | Self::Persistence { .. } => true,
            Self::InvalidIdentifier { .. }
            | Self::TextIdentifier { .. }
            | Self::ConfigurationIntegrity(_)
            | Self::SourceParse { .. }
            | Self::InvalidSource { .. }
            | Self::Json(_)
            | Self::Config(_) => false,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::InvalidIdentifier { identifier, reason } => {
                format!("Text identifier[{identifier}] is not valid: {reason}.")
            }
            Self::TextNotFound { identifier } => {
                format!("Locale text[{identifier}] doesn't exist.")
            }
            Self::TextIdentifier {
                identifier,
                mismatch,
            } => format!("Locale text[{identifier}] doesn't fit its identifier: {mismatch}."),
            Self::ConfigurationIntegrity(msg) => {
                format!("{}: {msg}", self.category().description())
            }
            Self::Persistence { operation, reason } => {
                format!("Failed to {operation} locale text: {reason}.")
            }
            other => format!("{}: {other}", other.category().description()),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentifier { .. } => ErrorCategory::Caller,
            Self::TextNotFound { .. } => ErrorCategory::Missing,
            Self::TextIdentifier { .. } => ErrorCategory::Drift,
            Self::ConfigurationIntegrity(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Persistence { .. } | Self::Io(_) => ErrorCategory::Storage,
            Self::SourceParse { .. } | Self::InvalidSource { .. } | Self::Json(_) => {
                ErrorCategory::Storage
            }
        }
    }
}

impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(operation: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Persistence {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
