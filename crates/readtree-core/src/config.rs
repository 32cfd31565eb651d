//! Tree reading configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use derive_builder::Builder;

use crate::error::ReadTreeError;
use crate::filter::{AcceptFilter, EntryType};

/// Default cap on accepted entries in a single directory.
pub const DEFAULT_MAX_DIR_ENTRIES: usize = 1_000_000;

/// Default cap on the content size of a single file.
pub const DEFAULT_MAX_FILE_SIZE: u64 = u32::MAX as u64;

/// Longest root path accepted, in bytes.
pub const MAX_ROOT_LEN: usize = 4096;

/// Configuration for reading a tree.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ReadTreeConfig {
    /// Root of the tree, absolute or relative to the working directory.
    pub root: PathBuf,

    /// Decides which regular files are included.
    #[builder(default)]
    pub accept_file: AcceptFilter,

    /// Decides which directories are included (and descended into).
    #[builder(default)]
    pub accept_dir: AcceptFilter,

    /// Maximum number of accepted entries in one directory.
    #[builder(default = "DEFAULT_MAX_DIR_ENTRIES")]
    pub max_dir_entries: usize,

    /// Maximum content size of one file, in bytes.
    #[builder(default = "DEFAULT_MAX_FILE_SIZE")]
    pub max_file_size: u64,
}

impl ReadTreeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl From<ReadTreeConfigBuilderError> for ReadTreeError {
    fn from(err: ReadTreeConfigBuilderError) -> Self {
        ReadTreeError::invalid_config(err.to_string())
    }
}

impl ReadTreeConfig {
    /// Create a new config builder.
    pub fn builder() -> ReadTreeConfigBuilder {
        ReadTreeConfigBuilder::default()
    }

    /// Create a config reading everything (except dotfiles) under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            accept_file: AcceptFilter::all(),
            accept_dir: AcceptFilter::all(),
            max_dir_entries: DEFAULT_MAX_DIR_ENTRIES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Validate the root and strip its trailing separators.
    ///
    /// A root made only of separators becomes `/`.
    pub fn normalize(mut self) -> Result<Self, ReadTreeError> {
        let bytes = self.root.as_os_str().as_encoded_bytes();
        if bytes.is_empty() {
            return Err(ReadTreeError::invalid_config("Root path cannot be empty"));
        }
        if bytes.len() > MAX_ROOT_LEN {
            return Err(ReadTreeError::invalid_config(format!(
                "Root path is {} bytes, max length is {MAX_ROOT_LEN}",
                bytes.len()
            )));
        }
        if bytes.contains(&0) {
            return Err(ReadTreeError::invalid_config(
                "Root path contains a NUL byte",
            ));
        }
        self.root = trim_trailing_separators(&self.root);
        Ok(self)
    }

    /// Check if a candidate passes the filter for its type.
    ///
    /// Dotfiles are excluded by the engine before this runs.
    pub fn accepts(&self, entry_type: EntryType, full_path: &Path, name: &str) -> bool {
        match entry_type {
            EntryType::Directory => self.accept_dir.accept(full_path, name),
            EntryType::File => self.accept_file.accept(full_path, name),
        }
    }
}

impl Default for ReadTreeConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

fn trim_trailing_separators(path: &Path) -> PathBuf {
    let bytes = path.as_os_str().as_encoded_bytes();
    let mut end = bytes.len();
    while end > 1 && bytes[end - 1] == b'/' {
        end -= 1;
    }
    if end == bytes.len() {
        return path.to_path_buf();
    }
    PathBuf::from(os_string_prefix(path, end))
}

#[cfg(unix)]
fn os_string_prefix(path: &Path, end: usize) -> OsString {
    use std::os::unix::ffi::OsStrExt;

    std::ffi::OsStr::from_bytes(&path.as_os_str().as_bytes()[..end]).to_os_string()
}

#[cfg(not(unix))]
fn os_string_prefix(path: &Path, end: usize) -> OsString {
    OsString::from(&path.to_string_lossy()[..end])
}
