//! Whole-file content loading.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use readtree_core::{FileContent, IoOp, ReadTreeError};
use tracing::trace;

/// Smallest read handed to the OS; the buffer doubles when less than this is free.
const MIN_READ: usize = 16_184;

/// Read the regular file at `path` into memory.
///
/// The file is read until EOF rather than trusting its reported size, so
/// files that change length (or lie about it, like `/proc` entries) are
/// read as they are. Content larger than `max_size` bytes is an error.
pub(crate) fn load_file(path: &Path, max_size: u64) -> Result<FileContent, ReadTreeError> {
    let mut file = File::open(path).map_err(|e| ReadTreeError::io(IoOp::OpenFile, path, e))?;
    let too_large = || ReadTreeError::FileTooLarge {
        path: path.to_path_buf(),
        limit: max_size,
    };

    let mut buf = vec![0u8; MIN_READ + 1];
    let mut used = 0usize;
    loop {
        // The last byte is kept free for the terminator.
        let end = buf.len() - 1;
        let n = match file.read(&mut buf[used..end]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReadTreeError::io(IoOp::ReadFile, path, e)),
        };

        used += n;
        if used as u64 > max_size {
            return Err(too_large());
        }
        if buf.len() - used > MIN_READ {
            continue;
        }
        let grown = buf.len().checked_mul(2).ok_or_else(too_large)?;
        buf.resize(grown, 0);
    }

    buf.truncate(used);
    buf.shrink_to(used + 1);
    trace!(path = %path.display(), bytes = used, "loaded file");
    Ok(FileContent::new(buf))
}
