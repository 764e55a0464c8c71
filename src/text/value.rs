//! Text values and the section/key collection they live in
//!
//! A text item is either a scalar string, a list, or a mapping of sub-keys to
//! strings. Lists and mappings keep their source order. Values are opaque
//! text: `true`, `1.5` and the like are never coerced.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sub-keyed strings in source order
pub type TextMap = IndexMap<String, String>;

/// A stored text item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// Plain string, addressed by `section:key`
    Scalar(String),
    /// Ordered strings, addressed by `section:key:<index>`
    List(Vec<String>),
    /// Sub-keyed strings, addressed by `section:key:sub`
    Map(TextMap),
}

impl TextValue {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TextMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up one sub-item
    ///
    /// List indices are plain decimal (`"2"`, not `"02"`). Always `None` for
    /// a scalar.
    pub fn sub(&self, sub: &str) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => sub
                .parse::<usize>()
                .ok()
                .filter(|index| index.to_string() == sub)
                .and_then(|index| items.get(index))
                .map(String::as_str),
            Self::Map(map) => map.get(sub).map(String::as_str),
        }
    }

    /// Sub-keys in order; list indices as decimal strings
    pub fn sub_keys(&self) -> Vec<String> {
        match self {
            Self::Scalar(_) => Vec::new(),
            Self::List(items) => (0..items.len()).map(|index| index.to_string()).collect(),
            Self::Map(map) => map.keys().cloned().collect(),
        }
    }

    /// Convert a parsed TOML item
    ///
    /// Strings map to scalars. Integers, booleans and datetimes keep their
    /// TOML text; floats are rendered from the parsed number (`1.50` becomes
    /// `"1.5"`), so quote them to keep the literal. Tables become mappings and
    /// arrays become lists. Nesting beyond one level is rejected.
    pub fn from_toml(value: toml::Value) -> std::result::Result<Self, String> {
        match value {
            toml::Value::Table(table) => table
                .into_iter()
                .map(|(sub, item)| toml_scalar(item).map(|text| (sub, text)))
                .collect::<std::result::Result<_, _>>()
                .map(Self::Map),
            toml::Value::Array(items) => items
                .into_iter()
                .map(toml_scalar)
                .collect::<std::result::Result<_, _>>()
                .map(Self::List),
            scalar => toml_scalar(scalar).map(Self::Scalar),
        }
    }
}

impl From<String> for TextValue {
    fn from(text: String) -> Self {
        Self::Scalar(text)
    }
}

impl From<&str> for TextValue {
    fn from(text: &str) -> Self {
        Self::Scalar(text.to_string())
    }
}

impl From<Vec<String>> for TextValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<TextMap> for TextValue {
    fn from(map: TextMap) -> Self {
        Self::Map(map)
    }
}

fn toml_scalar(value: toml::Value) -> std::result::Result<String, String> {
    match value {
        toml::Value::String(text) => Ok(text),
        toml::Value::Integer(n) => Ok(n.to_string()),
        toml::Value::Float(n) => Ok(n.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(dt) => Ok(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            Err(String::from("text values nest at most one level"))
        }
    }
}

/// Section → key → value mapping for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextCollection {
    sections: BTreeMap<String, BTreeMap<String, TextValue>>,
}

impl TextCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&TextValue> {
        self.sections.get(section)?.get(key)
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Insert an item, returning the one it replaced
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: TextValue,
    ) -> Option<TextValue> {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value)
    }

    /// Remove an item; a section left empty is removed too
    pub fn remove(&mut self, section: &str, key: &str) -> Option<TextValue> {
        let items = self.sections.get_mut(section)?;
        let removed = items.remove(key);
        if items.is_empty() {
            self.sections.remove(section);
        }
        removed
    }

    /// Overlay another collection on top of this one
    ///
    /// Whole items are replaced key for key; mappings aren't merged, and a
    /// scalar may replace a mapping or the other way round.
    pub fn overlay(&mut self, other: TextCollection) {
        for (section, items) in other.sections {
            let target = self.sections.entry(section).or_default();
            for (key, value) in items {
                target.insert(key, value);
            }
        }
    }

    /// Number of items across all sections
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Iterate `(section, key, value)` in section then key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &TextValue)> {
        self.sections.iter().flat_map(|(section, items)| {
            items
                .iter()
                .map(move |(key, value)| (section.as_str(), key.as_str(), value))
        })
    }
}
