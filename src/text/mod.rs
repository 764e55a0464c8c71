//! Text resolution engine
//!
//! Localized text is addressed by `section:key[:sub]` identifiers and
//! assembled from layered sources:
//!
//! - [`paths`] - Source load order
//! - [`source`] - Source file loading and merging
//! - [`store`] - Cached, editable collection of one language
//! - [`resolver`] - Identifier lookup, missing-text policy, placeholders
//! - [`registry`] - Shared stores per language

pub mod identifier;
pub mod logger;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod store;
pub mod value;

pub use identifier::{is_valid_key, TextIdentifier};
pub use logger::{NoopLogger, TextLogger, TracingLogger};
pub use paths::{load_order, SourcePath};
pub use registry::TextStoreRegistry;
pub use resolver::{substitute, TextResolver};
pub use source::{FileTextSource, TextSource};
pub use store::{ExportOptions, TextStore};
pub use value::{TextCollection, TextMap, TextValue};
