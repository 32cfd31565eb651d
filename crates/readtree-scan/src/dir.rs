//! Single-directory enumeration.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use readtree_core::{EntryType, IoOp, ReadTreeConfig, ReadTreeError, is_hidden};
use tracing::trace;

use crate::resolve::resolve_type;

/// An accepted directory entry whose content has not been read yet.
#[derive(Debug)]
pub(crate) struct Candidate {
    pub full_path: PathBuf,
    pub name: OsString,
    pub entry_type: EntryType,
}

/// List the accepted entries of `dir`, sorted byte-wise by name.
///
/// Dotfiles are skipped before anything else happens to them. Every other
/// entry is classified and then offered to the accept filter for its type. The
/// first classification failure aborts the whole listing.
pub(crate) fn scan_dir(
    config: &ReadTreeConfig,
    dir: &Path,
) -> Result<Vec<Candidate>, ReadTreeError> {
    let read_dir = fs::read_dir(dir).map_err(|e| ReadTreeError::io(IoOp::OpenDir, dir, e))?;

    let mut candidates = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ReadTreeError::io(IoOp::ReadDir, dir, e))?;
        let name = entry.file_name();
        if is_hidden(name.as_encoded_bytes()) {
            continue;
        }

        let full_path = entry.path();
        let entry_type = resolve_type(&full_path, entry.file_type().ok())?;
        if !config.accepts(entry_type, &full_path, &name.to_string_lossy()) {
            continue;
        }

        if candidates.len() >= config.max_dir_entries {
            return Err(ReadTreeError::TooManyEntries {
                path: dir.to_path_buf(),
                limit: config.max_dir_entries,
            });
        }
        candidates.push(Candidate {
            full_path,
            name,
            entry_type,
        });
    }

    candidates.sort_unstable_by(|a, b| a.name.as_encoded_bytes().cmp(b.name.as_encoded_bytes()));
    trace!(path = %dir.display(), entries = candidates.len(), "scanned directory");
    Ok(candidates)
}
