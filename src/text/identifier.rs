//! Text identifiers
//!
//! A text item is addressed as `section:key`, or `section:key:sub` when the
//! stored value is a mapping.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Separator between identifier parts
pub const IDENTIFIER_DELIMITER: char = ':';

/// Check that a section, key or sub-key is a legal token
///
/// Legal: ASCII letters, digits, underscore, hyphen and dot.
pub fn is_valid_key(token: &str) -> bool {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();

    let re = KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("Invalid regex pattern"));

    re.is_match(token)
}

/// Parsed `section:key[:sub]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextIdentifier {
    section: String,
    key: String,
    sub: Option<String>,
}

impl TextIdentifier {
    /// Parse an identifier string
    ///
    /// Fails with [`Error::InvalidIdentifier`] unless the input splits into
    /// two or three non-empty, legal parts.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_identifier(raw, "identifier is empty"));
        }

        let parts: Vec<&str> = raw.split(IDENTIFIER_DELIMITER).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(Error::invalid_identifier(
                raw,
                format!("expected 2 or 3 parts, got {}", parts.len()),
            ));
        }

        if let Some(position) = parts.iter().position(|part| part.is_empty()) {
            return Err(Error::invalid_identifier(
                raw,
                format!("part {} is empty", position + 1),
            ));
        }

        if let Some(part) = parts.iter().find(|part| !is_valid_key(part)) {
            return Err(Error::invalid_identifier(
                raw,
                format!("'{part}' contains illegal characters"),
            ));
        }

        Ok(Self {
            section: parts[0].to_string(),
            key: parts[1].to_string(),
            sub: parts.get(2).map(|sub| sub.to_string()),
        })
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sub-key of a three-part identifier
    pub fn sub(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Number of parts, 2 or 3
    pub fn arity(&self) -> usize {
        if self.sub.is_some() {
            3
        } else {
            2
        }
    }
}

impl fmt::Display for TextIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section, self.key)?;
        if let Some(sub) = &self.sub {
            write!(f, ":{sub}")?;
        }
        Ok(())
    }
}

impl FromStr for TextIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
