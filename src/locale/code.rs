//! Locale and language codes
//!
//! Locale and language share one code format. Accepted input forms:
//!
//! - ISO 639-1: `da`
//! - IETF-ish: `da_DK`, `da_dk`, `da-DK`, `da-dk`
//!
//! Internally every code is `da-dk`: two lowercase letters, a hyphen and two
//! more lowercase letters.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Normalize a raw locale or language code
///
/// Lowercases and turns underscores into hyphens. Does not validate; an
/// empty input stays empty.
///
/// - `da_DK`, `DA-dk` -> `da-dk`
/// - `EN` -> `en`
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase().replace('_', "-")
}

/// Check that a code has the internal `xx-yy` form
pub fn is_valid_code(code: &str) -> bool {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();

    let re = CODE_RE.get_or_init(|| Regex::new(r"^[a-z]{2}-[a-z]{2}$").expect("Invalid regex pattern"));

    code.len() == 5 && re.is_match(code)
}

/// A validated, normalized `xx-yy` code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Normalize and validate a code
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = normalize_code(raw);
        if is_valid_code(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(Error::config(format!(
                "'{raw}' is not a locale code of the form xx-yy"
            )))
        }
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-letter language part (`da` of `da-dk`)
    pub fn language_part(&self) -> &str {
        &self.0[..2]
    }

    /// Two-letter region part (`dk` of `da-dk`)
    pub fn region_part(&self) -> &str {
        &self.0[3..]
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for LocaleCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LocaleCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
