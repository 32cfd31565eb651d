//! File and directory node types.

use std::ffi::{CStr, OsStr};
use std::path::{Component, Path, PathBuf};

use compact_str::CompactString;
use serde::{Serialize, Serializer};

use crate::filter::EntryType;

/// Owned content of a regular file.
///
/// The buffer always ends with a single `0` byte which is not part of the
/// content, so the data can be handed to C-string APIs without copying.
#[derive(Clone, PartialEq, Eq)]
pub struct FileContent {
    buf: Vec<u8>,
}

impl FileContent {
    /// Take ownership of `data`, appending the terminating NUL.
    pub fn new(mut data: Vec<u8>) -> Self {
        data.reserve_exact(1);
        data.push(0);
        Self { buf: data }
    }

    /// Take ownership of a buffer that already ends with its terminating NUL.
    ///
    /// Hands the buffer back if the last byte is not `0`.
    pub fn from_vec_with_nul(buf: Vec<u8>) -> Result<Self, Vec<u8>> {
        if buf.last() == Some(&0) {
            Ok(Self { buf })
        } else {
            Err(buf)
        }
    }

    /// Content size in bytes, terminator excluded.
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    /// Check if the file was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The content, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    /// The content followed by its terminating NUL.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    /// The content as a C string, if it holds no interior NUL.
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(&self.buf).ok()
    }

    /// The content as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Give the content back, terminator removed.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.pop();
        self.buf
    }
}

impl std::fmt::Debug for FileContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_str() {
            Some(text) => f.debug_tuple("FileContent").field(&text).finish(),
            None => f
                .debug_struct("FileContent")
                .field("len", &self.len())
                .finish_non_exhaustive(),
        }
    }
}

impl Serialize for FileContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

/// What a node holds: file content or child nodes, never both.
#[derive(Debug, Serialize)]
pub enum NodeKind {
    /// Regular file (or symlink resolving to one).
    File { content: FileContent },
    /// Directory (or symlink resolving to one), children sorted by name.
    Directory { children: Vec<FileNode> },
}

/// A single file or directory in the tree.
#[derive(Debug, Serialize)]
pub struct FileNode {
    /// Path as reached from the configured root.
    full_path: PathBuf,

    /// Byte offset in `full_path` where the path relative to the root starts.
    #[serde(skip)]
    rel_offset: usize,

    /// Final path component (lossy for non UTF-8 names).
    name: CompactString,

    kind: NodeKind,
}

impl FileNode {
    /// Create a file node at `full_path`, which lives under (or is) `root`.
    pub fn new_file(full_path: PathBuf, root: &Path, content: FileContent) -> Self {
        Self::new(full_path, root, NodeKind::File { content })
    }

    /// Create a directory node at `full_path`, which lives under (or is) `root`.
    ///
    /// `children` must already be sorted by name.
    pub fn new_directory(full_path: PathBuf, root: &Path, children: Vec<FileNode>) -> Self {
        debug_assert!(
            children
                .windows(2)
                .all(|w| w[0].file_name() < w[1].file_name())
        );
        Self::new(full_path, root, NodeKind::Directory { children })
    }

    fn new(full_path: PathBuf, root: &Path, kind: NodeKind) -> Self {
        let rel_offset = relative_offset(&full_path, root);
        let name = full_path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(full_path.to_string_lossy()));

        Self {
            full_path,
            rel_offset,
            name,
            kind,
        }
    }

    /// Path to this node as reached from the configured root.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the root. Empty for the root itself.
    pub fn path(&self) -> &Path {
        tail(&self.full_path, self.rel_offset)
    }

    /// Final path component as text.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Final path component, exactly as the OS reported it.
    pub fn file_name(&self) -> &OsStr {
        self.full_path
            .file_name()
            .unwrap_or_else(|| self.full_path.as_os_str())
    }

    /// What this node holds.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Resolved type of this node.
    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            NodeKind::File { .. } => EntryType::File,
            NodeKind::Directory { .. } => EntryType::Directory,
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// File content, `None` for directories.
    pub fn content(&self) -> Option<&FileContent> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Child nodes, `None` for files. Empty directories give an empty slice.
    pub fn children(&self) -> Option<&[FileNode]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Content size for files, 0 for directories.
    pub fn size(&self) -> u64 {
        self.content().map_or(0, |c| c.len() as u64)
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children().map_or(0, <[FileNode]>::len)
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: impl AsRef<OsStr>) -> Option<&FileNode> {
        let name = name.as_ref();
        let children = self.children()?;
        children
            .binary_search_by(|c| c.file_name().cmp(name))
            .ok()
            .map(|i| &children[i])
    }

    /// Look up a descendant by its path relative to this node.
    pub fn find(&self, rel_path: impl AsRef<Path>) -> Option<&FileNode> {
        let mut node = self;
        for component in rel_path.as_ref().components() {
            match component {
                Component::Normal(name) => node = node.child(name)?,
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(node)
    }

    /// Depth-first, pre-order iterator over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

impl Drop for FileNode {
    // Children are released from an explicit stack so that dropping a very
    // deep tree does not recurse once per level.
    fn drop(&mut self) {
        let NodeKind::Directory { children } = &mut self.kind else {
            return;
        };
        if children.iter().all(FileNode::is_file) {
            return;
        }

        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let NodeKind::Directory { children } = &mut node.kind {
                pending.append(children);
            }
        }
    }
}

/// Pre-order iterator returned by [`FileNode::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a FileNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FileNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}

/// Offset of the root-relative part of `full_path`: just past `root` and the
/// separator following it, or the whole length for the root itself.
fn relative_offset(full_path: &Path, root: &Path) -> usize {
    let full = full_path.as_os_str().as_encoded_bytes();
    let root = root.as_os_str().as_encoded_bytes();
    if full.len() <= root.len() || !full.starts_with(root) {
        return full.len();
    }
    let mut offset = root.len();
    while full.get(offset) == Some(&b'/') {
        offset += 1;
    }
    offset
}

#[cfg(unix)]
fn tail(path: &Path, offset: usize) -> &Path {
    use std::os::unix::ffi::OsStrExt;

    let bytes = path.as_os_str().as_bytes();
    Path::new(OsStr::from_bytes(bytes.get(offset..).unwrap_or_default()))
}

#[cfg(not(unix))]
fn tail(path: &Path, offset: usize) -> &Path {
    path.to_str()
        .and_then(|s| s.get(offset..))
        .map_or(Path::new(""), Path::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(root: &str, rel: &str, text: &str) -> FileNode {
        FileNode::new_file(
            Path::new(root).join(rel),
            Path::new(root),
            FileContent::new(text.as_bytes().to_vec()),
        )
    }

    #[test]
    fn test_file_content_terminator() {
        let content = FileContent::new(b"abc".to_vec());
        assert_eq!(content.len(), 3);
        assert_eq!(content.as_bytes(), b"abc");
        assert_eq!(content.as_bytes_with_nul(), b"abc\0");
        assert_eq!(content.as_c_str().unwrap().to_bytes(), b"abc");
        assert_eq!(content.as_str(), Some("abc"));
        assert_eq!(content.into_vec(), b"abc");
    }

    #[test]
    fn test_file_content_empty() {
        let content = FileContent::new(Vec::new());
        assert!(content.is_empty());
        assert_eq!(content.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn test_file_content_interior_nul() {
        let content = FileContent::new(b"a\0b".to_vec());
        assert_eq!(content.len(), 3);
        assert!(content.as_c_str().is_none());
    }

    #[test]
    fn test_from_vec_with_nul() {
        assert!(FileContent::from_vec_with_nul(b"x\0".to_vec()).is_ok());
        assert_eq!(
            FileContent::from_vec_with_nul(b"x".to_vec()).unwrap_err(),
            b"x"
        );
    }

    #[test]
    fn test_relative_path() {
        let node = file("root", "sub/a.txt", "A");
        assert_eq!(node.full_path(), Path::new("root/sub/a.txt"));
        assert_eq!(node.path(), Path::new("sub/a.txt"));
        assert_eq!(node.name(), "a.txt");
    }

    #[test]
    fn test_relative_path_under_slash_root() {
        let node = file("/", "etc", "x");
        assert_eq!(node.full_path(), Path::new("/etc"));
        assert_eq!(node.path(), Path::new("etc"));
    }

    #[test]
    fn test_root_node_has_empty_path() {
        let root = FileNode::new_directory(PathBuf::from("root"), Path::new("root"), Vec::new());
        assert_eq!(root.path(), Path::new(""));
        assert_eq!(root.name(), "root");
        assert!(root.children().is_some_and(<[FileNode]>::is_empty));
        assert_eq!(root.child_count(), 0);
        assert!(root.content().is_none());
    }

    #[test]
    fn test_find_and_walk() {
        let sub = FileNode::new_directory(
            PathBuf::from("root/sub"),
            Path::new("root"),
            vec![file("root", "sub/c", "C")],
        );
        let root = FileNode::new_directory(
            PathBuf::from("root"),
            Path::new("root"),
            vec![file("root", "a", "A"), sub],
        );

        let c = root.find("sub/c").and_then(FileNode::content).unwrap();
        assert_eq!(c.as_bytes(), b"C");
        assert!(root.find("sub/missing").is_none());
        assert!(root.find("a/b").is_none());
        assert_eq!(root.find("").map(FileNode::name), Some("root"));

        let paths: Vec<_> = root.walk().map(|n| n.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from(""),
                PathBuf::from("a"),
                PathBuf::from("sub"),
                PathBuf::from("sub/c"),
            ]
        );
    }

    #[test]
    fn test_drop_deep_tree() {
        let mut node = file("r", "leaf", "x");
        for _ in 0..100_000 {
            node = FileNode::new_directory(PathBuf::from("r/d"), Path::new("r"), vec![node]);
        }
        drop(node);
    }
}
