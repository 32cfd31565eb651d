//! Accept filters deciding which candidates end up in a tree.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Resolved type of a candidate. Symlinks are resolved to what they point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// A directory.
    Directory,
    /// A regular file.
    File,
}

/// Inclusion predicate for a candidate file or directory.
///
/// `full_path` is the path the candidate will have in the tree, `name` its
/// final component. Any `Fn(&Path, &str) -> bool` closure is an `Accept`.
pub trait Accept: Send + Sync {
    /// Return `true` to include the candidate.
    fn accept(&self, full_path: &Path, name: &str) -> bool;
}

impl<F> Accept for F
where
    F: Fn(&Path, &str) -> bool + Send + Sync,
{
    fn accept(&self, full_path: &Path, name: &str) -> bool {
        self(full_path, name)
    }
}

/// Accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Accept for AcceptAll {
    fn accept(&self, _full_path: &Path, _name: &str) -> bool {
        true
    }
}

/// Accepts candidates whose name ends with a fixed suffix.
#[derive(Debug, Clone)]
pub struct AcceptSuffix {
    suffix: String,
}

impl AcceptSuffix {
    /// Create a suffix filter.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Accept for AcceptSuffix {
    fn accept(&self, _full_path: &Path, name: &str) -> bool {
        name.as_bytes().ends_with(self.suffix.as_bytes())
    }
}

/// Shared handle to an [`Accept`] predicate, cheap to clone.
#[derive(Clone)]
pub struct AcceptFilter {
    inner: Arc<dyn Accept>,
    label: &'static str,
}

impl AcceptFilter {
    /// A filter accepting everything. This is the default.
    pub fn all() -> Self {
        Self {
            inner: Arc::new(AcceptAll),
            label: "all",
        }
    }

    /// A filter accepting only names ending with `suffix`.
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AcceptSuffix::new(suffix)),
            label: "suffix",
        }
    }

    /// Wrap any predicate.
    pub fn new(accept: impl Accept + 'static) -> Self {
        Self {
            inner: Arc::new(accept),
            label: "custom",
        }
    }

    /// Wrap a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Path, &str) -> bool + Send + Sync + 'static,
    {
        Self::new(f)
    }

    /// Run the predicate.
    pub fn accept(&self, full_path: &Path, name: &str) -> bool {
        self.inner.accept(full_path, name)
    }
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for AcceptFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AcceptFilter").field(&self.label).finish()
    }
}

/// Names starting with `.` never make it into a tree. This also covers `.` and `..`.
pub fn is_hidden(name: &[u8]) -> bool {
    name.first() == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        let filter = AcceptFilter::all();
        assert!(filter.accept(Path::new("/a/b"), "b"));
        assert!(filter.accept(Path::new("/a/"), ""));
    }

    #[test]
    fn test_accept_suffix() {
        let filter = AcceptFilter::suffix(".kept");
        assert!(filter.accept(Path::new("root/a.kept"), "a.kept"));
        assert!(filter.accept(Path::new("root/.kept"), ".kept"));
        assert!(!filter.accept(Path::new("root/b.txt"), "b.txt"));
        assert!(!filter.accept(Path::new("root/kept"), "kept"));
    }

    #[test]
    fn test_suffix_uses_name_not_path() {
        let filter = AcceptFilter::suffix(".kept");
        assert!(!filter.accept(Path::new("root.kept/b"), "b"));
    }

    #[test]
    fn test_closure_filter() {
        let filter = AcceptFilter::from_fn(|path: &Path, name: &str| {
            path.starts_with("src") && name != "target"
        });
        assert!(filter.accept(Path::new("src/lib.rs"), "lib.rs"));
        assert!(!filter.accept(Path::new("src/target"), "target"));
        assert!(!filter.accept(Path::new("docs/a.md"), "a.md"));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(b".git"));
        assert!(is_hidden(b"."));
        assert!(is_hidden(b".."));
        assert!(!is_hidden(b"src"));
        assert!(!is_hidden(b""));
    }

    #[test]
    fn test_debug_shows_label() {
        assert_eq!(format!("{:?}", AcceptFilter::suffix(".rs")), "AcceptFilter(\"suffix\")");
    }
}
