//! Error types for tree reading.

use std::path::{Path, PathBuf};

use strum::Display;
use thiserror::Error;

/// The filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IoOp {
    /// `stat` of an entry, following symlinks.
    #[strum(serialize = "Getting file type")]
    Stat,
    /// Opening a directory stream.
    #[strum(serialize = "Opening directory")]
    OpenDir,
    /// Reading the next entry from a directory stream.
    #[strum(serialize = "Reading directory")]
    ReadDir,
    /// Opening a regular file for reading.
    #[strum(serialize = "Opening file")]
    OpenFile,
    /// Reading the content of an open file.
    #[strum(serialize = "Reading file")]
    ReadFile,
}

/// Errors that can occur while reading a tree.
///
/// Every variant is recoverable: the caller decides what to do next. A failed
/// `read_tree` never returns a partial tree alongside one of these.
#[derive(Debug, Error)]
pub enum ReadTreeError {
    /// The configuration could not be used (empty or oversized root, ...).
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The root itself was turned down by the accept filter.
    #[error("Root path rejected by accept filter: {path}")]
    RootRejected { path: PathBuf },

    /// A syscall on `path` failed.
    #[error("{op} {path}: {source}")]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry is neither a directory nor a regular file.
    #[error("Unsupported file type ({kind}): {path}")]
    UnsupportedType { path: PathBuf, kind: &'static str },

    /// A directory holds more accepted entries than the configured cap.
    #[error("Directory {path} has more than {limit} entries")]
    TooManyEntries { path: PathBuf, limit: usize },

    /// A file is larger than the configured maximum content size.
    #[error("File {path} is larger than {limit} bytes")]
    FileTooLarge { path: PathBuf, limit: u64 },
}

impl ReadTreeError {
    /// Create an I/O error with path context.
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidConfig { .. } => None,
            Self::RootRejected { path }
            | Self::Io { path, .. }
            | Self::UnsupportedType { path, .. }
            | Self::TooManyEntries { path, .. }
            | Self::FileTooLarge { path, .. } => Some(path),
        }
    }

    /// The underlying OS error code, when the failure came from a syscall.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// The `std::io::ErrorKind` of the underlying failure, if any.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
