//! File-type resolution for directory entries.

use std::fs::{self, FileType};
use std::path::Path;

use readtree_core::{EntryType, IoOp, ReadTreeError};
use tracing::error;

/// Resolve what `full_path` is, following symlinks.
///
/// `hint` is the type reported by directory enumeration, if any. A hint that
/// already says directory or regular file is trusted; anything else (a
/// symlink, an unknown type, no hint at all) is settled with `stat`.
pub(crate) fn resolve_type(
    full_path: &Path,
    hint: Option<FileType>,
) -> Result<EntryType, ReadTreeError> {
    if let Some(hint) = hint {
        if hint.is_dir() {
            return Ok(EntryType::Directory);
        }
        if hint.is_file() {
            return Ok(EntryType::File);
        }
    }

    let metadata =
        fs::metadata(full_path).map_err(|e| ReadTreeError::io(IoOp::Stat, full_path, e))?;
    let file_type = metadata.file_type();

    if file_type.is_dir() {
        Ok(EntryType::Directory)
    } else if file_type.is_file() {
        Ok(EntryType::File)
    } else {
        let kind = special_kind(file_type);
        if file_type.is_symlink() {
            error!(path = %full_path.display(), "stat followed a symlink to a symlink");
        }
        Err(ReadTreeError::UnsupportedType {
            path: full_path.to_path_buf(),
            kind,
        })
    }
}

/// Name of a file type that is neither a directory nor a regular file.
#[cfg(unix)]
fn special_kind(file_type: FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_block_device() {
        "block device"
    } else if file_type.is_char_device() {
        "character device"
    } else if file_type.is_symlink() {
        "symlink"
    } else {
        "unknown"
    }
}

#[cfg(not(unix))]
fn special_kind(file_type: FileType) -> &'static str {
    if file_type.is_symlink() {
        "symlink"
    } else {
        "unknown"
    }
}
