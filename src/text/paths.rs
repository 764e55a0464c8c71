//! Source path ordering
//!
//! Text sources are configured as an unordered `identifier -> path` mapping.
//! They load in ascending identifier order and a later source overrides an
//! earlier one item for item, so deployments control precedence by naming:
//! an override directory named `zz-site` (or `90-override`) always wins over
//! `base`.

use std::path::{Path, PathBuf};

/// One configured text source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    /// Configuration identifier; decides precedence
    pub id: String,
    pub path: PathBuf,
}

impl SourcePath {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Order configured sources for loading, lowest precedence first
///
/// Sorts by identifier, ascending and byte-wise. Input order never matters.
///
/// # Example
///
/// ```
/// use locale_text::text::paths::load_order;
///
/// let order = load_order([("override", "/srv/site"), ("base", "/srv/app")]);
/// assert_eq!(order[0].id, "base");
/// assert_eq!(order[1].id, "override");
/// ```
pub fn load_order<I, K, P>(paths: I) -> Vec<SourcePath>
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<PathBuf>,
{
    let mut ordered: Vec<SourcePath> = paths
        .into_iter()
        .map(|(id, path)| SourcePath::new(id, path))
        .collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));
    ordered
}
