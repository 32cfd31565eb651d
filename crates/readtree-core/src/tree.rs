//! File tree container and statistics.

use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::config::ReadTreeConfig;
use crate::node::{FileNode, Walk};

/// Summary statistics for a tree that was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories, the root excluded.
    pub total_dirs: u64,
    /// Total content bytes loaded.
    pub total_bytes: u64,
    /// Maximum depth reached (the root's children are at depth 1).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loaded file.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_bytes += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Complete tree read from disk, along with the configuration that produced it.
#[derive(Debug, Serialize)]
pub struct FileTree {
    /// Root node of the tree.
    pub root: FileNode,

    /// Normalized configuration used for the read.
    #[serde(skip)]
    pub config: ReadTreeConfig,

    /// When the read finished.
    pub read_at: SystemTime,

    /// How long the read took.
    pub read_duration: Duration,

    /// Summary statistics.
    pub stats: TreeStats,
}

impl FileTree {
    /// Create a new file tree.
    pub fn new(
        root: FileNode,
        config: ReadTreeConfig,
        stats: TreeStats,
        read_duration: Duration,
    ) -> Self {
        Self {
            root,
            config,
            read_at: SystemTime::now(),
            read_duration,
            stats,
        }
    }

    /// Root path the tree was read from.
    pub fn root_path(&self) -> &Path {
        &self.config.root
    }

    /// Get the total number of files.
    pub fn total_files(&self) -> u64 {
        self.stats.total_files
    }

    /// Get the total number of directories.
    pub fn total_dirs(&self) -> u64 {
        self.stats.total_dirs
    }

    /// Get the total content size.
    pub fn total_bytes(&self) -> u64 {
        self.stats.total_bytes
    }

    /// Look up a node by its path relative to the root.
    pub fn find(&self, rel_path: impl AsRef<Path>) -> Option<&FileNode> {
        self.root.find(rel_path)
    }

    /// Depth-first, pre-order iterator over every node.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }
}

/// Release a tree and everything it owns. `None` is a no-op.
pub fn destroy_tree(tree: Option<FileTree>) {
    drop(tree);
}
