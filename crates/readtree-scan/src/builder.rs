//! Recursive tree construction.

use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use readtree_core::{EntryType, FileNode, FileTree, ReadTreeConfig, ReadTreeError, TreeStats};
use tracing::debug;

use crate::content::load_file;
use crate::dir::{Candidate, scan_dir};
use crate::resolve::resolve_type;

/// Read the tree rooted at `config.root` into memory.
///
/// The root's trailing separators are trimmed, its type is resolved and it is
/// offered to the accept filter for that type: a rejected root is an error.
/// A root directory is read recursively, a root file is loaded on its own.
///
/// The read is all or nothing. On the first failure, in sorted depth-first
/// order, everything built so far is released and that failure is returned.
///
/// Recursion goes one stack frame per directory level, so the depth of the
/// tree on disk bounds the stack used.
pub fn read_tree(config: ReadTreeConfig) -> Result<FileTree, ReadTreeError> {
    let start = Instant::now();
    let config = config.normalize()?;
    let root = config.root.clone();
    debug!(root = %root.display(), "reading tree");

    let entry_type = resolve_type(&root, None)?;
    if !config.accepts(entry_type, &root, &root_name(&root)) {
        return Err(ReadTreeError::RootRejected { path: root });
    }

    let mut builder = TreeBuilder::new(&config);
    let root_node = match entry_type {
        EntryType::Directory => {
            let children = builder.read_children(&root, 1)?;
            FileNode::new_directory(root.clone(), &root, children)
        }
        EntryType::File => {
            let content = load_file(&root, config.max_file_size)?;
            builder.stats.record_file(content.len() as u64, 0);
            FileNode::new_file(root.clone(), &root, content)
        }
    };

    let stats = builder.stats;
    debug!(
        root = %root.display(),
        files = stats.total_files,
        dirs = stats.total_dirs,
        bytes = stats.total_bytes,
        "read tree"
    );
    Ok(FileTree::new(root_node, config, stats, start.elapsed()))
}

/// Builds child nodes for one `read_tree` call.
struct TreeBuilder<'a> {
    config: &'a ReadTreeConfig,
    stats: TreeStats,
}

impl<'a> TreeBuilder<'a> {
    fn new(config: &'a ReadTreeConfig) -> Self {
        Self {
            config,
            stats: TreeStats::new(),
        }
    }

    /// Build the accepted children of `dir`, which sit at `depth`.
    ///
    /// Stops at the first child that fails. Children already built and
    /// candidates not yet visited are dropped before the error is returned.
    fn read_children(&mut self, dir: &Path, depth: u32) -> Result<Vec<FileNode>, ReadTreeError> {
        let candidates = scan_dir(self.config, dir)?;
        let mut children = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.build_node(candidate, depth) {
                Ok(node) => children.push(node),
                Err(err) => {
                    debug!(
                        dir = %dir.display(),
                        released = children.len(),
                        error = %err,
                        "aborting directory read"
                    );
                    return Err(err);
                }
            }
        }

        Ok(children)
    }

    fn build_node(&mut self, candidate: Candidate, depth: u32) -> Result<FileNode, ReadTreeError> {
        let config = self.config;
        match candidate.entry_type {
            EntryType::Directory => {
                let children = self.read_children(&candidate.full_path, depth + 1)?;
                self.stats.record_dir(depth);
                Ok(FileNode::new_directory(candidate.full_path, &config.root, children))
            }
            EntryType::File => {
                let content = load_file(&candidate.full_path, config.max_file_size)?;
                self.stats.record_file(content.len() as u64, depth);
                Ok(FileNode::new_file(candidate.full_path, &config.root, content))
            }
        }
    }
}

/// Name the root is offered to the accept filter under.
fn root_name(root: &Path) -> Cow<'_, str> {
    match root.file_name() {
        Some(name) => name.to_string_lossy(),
        None => root.to_string_lossy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readtree_core::AcceptFilter;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_read() {
        let temp = create_test_tree();
        let tree = read_tree(ReadTreeConfig::new(temp.path())).unwrap();

        assert_eq!(tree.stats.total_files, 4);
        assert_eq!(tree.stats.total_dirs, 3);
        assert_eq!(tree.stats.total_bytes, 5 + 17 + 4 + 17);
        assert_eq!(tree.stats.max_depth, 3);
        assert!(tree.root.is_dir());
        assert_eq!(tree.root.path(), Path::new(""));
    }

    #[test]
    fn test_children_sorted_by_name() {
        let temp = create_test_tree();
        let tree = read_tree(ReadTreeConfig::new(temp.path())).unwrap();

        let names: Vec<_> = tree.root.children().unwrap().iter().map(FileNode::name).collect();
        assert_eq!(names, ["dir1", "dir2", "file1.txt"]);
    }

    #[test]
    fn test_trailing_separators_trimmed() {
        let temp = create_test_tree();
        let mut root = temp.path().as_os_str().to_os_string();
        root.push("//");

        let tree = read_tree(ReadTreeConfig::new(root)).unwrap();
        assert_eq!(tree.root.full_path(), temp.path());
        assert_eq!(tree.root_path(), temp.path());

        let file = tree.find("dir1/subdir/file3.txt").unwrap();
        assert_eq!(file.full_path(), temp.path().join("dir1/subdir/file3.txt"));
        assert_eq!(file.path(), Path::new("dir1/subdir/file3.txt"));
    }

    #[test]
    fn test_root_file() {
        let temp = create_test_tree();
        let tree = read_tree(ReadTreeConfig::new(temp.path().join("file1.txt"))).unwrap();

        assert!(tree.root.is_file());
        assert_eq!(tree.root.path(), Path::new(""));
        assert_eq!(tree.root.content().unwrap().as_bytes(), b"hello");
        assert_eq!(tree.stats.total_files, 1);
    }

    #[test]
    fn test_root_rejected() {
        let temp = create_test_tree();
        let config = ReadTreeConfig::builder()
            .root(temp.path().join("dir1"))
            .accept_dir(AcceptFilter::suffix(".kepd"))
            .build()
            .unwrap();

        let err = read_tree(config).unwrap_err();
        assert!(matches!(err, ReadTreeError::RootRejected { .. }));
    }

    #[test]
    fn test_error_stops_the_read() {
        let temp = create_test_tree();
        let config = ReadTreeConfig::builder()
            .root(temp.path())
            .max_file_size(10u64)
            .build()
            .unwrap();

        // dir1/file2.txt is the first oversized file in sorted order.
        let err = read_tree(config).unwrap_err();
        assert!(matches!(err, ReadTreeError::FileTooLarge { .. }));
        assert_eq!(err.path(), Some(temp.path().join("dir1/file2.txt").as_path()));
    }

    #[test]
    fn test_root_name() {
        assert_eq!(root_name(Path::new("a/b.kepd")), "b.kepd");
        assert_eq!(root_name(Path::new(".")), ".");
        assert_eq!(root_name(Path::new("/")), "/");
    }
}
