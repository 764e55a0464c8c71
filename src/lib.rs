//! locale-text - Locale negotiation and layered localized text
//!
//! Resolves a requested locale/language into a supported pair, and resolves
//! `section:key[:sub]` text identifiers into localized strings merged from
//! layered source directories.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and mapping tables
//! - [`locale`] - Locale negotiation, formatting profiles, the [`Locale`] facade
//! - [`text`] - Identifiers, source merging, the text store and resolver
//! - [`storage`] - Persistent cache store for runtime text (SQLite, memory)
//! - [`error`] - Unified error type
//! - [`utils`] - Escaping helpers
//!
//! # Example
//!
//! ```no_run
//! use locale_text::config::Config;
//! use locale_text::locale::LocaleFactory;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let factory = LocaleFactory::from_config(config)?;
//!
//!     let locale = factory.create("da_DK", "")?;
//!     let text = locale.text("greeting:hello", &[("name", "Verden")], None)?;
//!     println!("{text} ({})", locale.temporal().date_short);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod locale;
pub mod storage;
pub mod text;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, LocaleErrorTrait, Result};
    pub use crate::locale::{Locale, LocaleCode, LocaleFactory, LocaleVariant, ResolvedLocale};
    pub use crate::storage::{SharedTextCacheStore, TextCacheStore};
    pub use crate::text::{ExportOptions, TextResolver, TextStore, TextValue};
}

// Direct re-exports for convenience
pub use locale::{Locale, LocaleFactory};
