//! Directory tree reading engine for readtree.
//!
//! This crate reads a directory subtree from disk into a single in-memory
//! [`FileTree`], holding the full content of every regular file.
//!
//! # Overview
//!
//! - **Deterministic**: children are sorted byte-wise by name.
//! - **Filtered**: caller-supplied accept filters for files and directories;
//!   names starting with `.` are always skipped.
//! - **Symlinks resolved**: a link becomes whatever it points to. Broken or
//!   cyclic links, FIFOs, sockets and devices are errors.
//! - **All or nothing**: any failure aborts the read and no partial tree is
//!   ever returned.
//!
//! # Example
//!
//! ```rust,no_run
//! use readtree_scan::{AcceptFilter, ReadTreeConfig, read_tree};
//!
//! let config = ReadTreeConfig::builder()
//!     .root("/path/to/src")
//!     .accept_file(AcceptFilter::suffix(".rs"))
//!     .build()
//!     .unwrap();
//! let tree = read_tree(config).unwrap();
//!
//! for node in tree.walk().filter(|n| n.is_file()) {
//!     println!("{}: {} bytes", node.path().display(), node.size());
//! }
//! ```

mod builder;
mod content;
mod dir;
mod resolve;

pub use builder::read_tree;

// Re-export core types for convenience
pub use readtree_core::{
    Accept, AcceptFilter, EntryType, FileContent, FileNode, FileTree, IoOp, NodeKind,
    ReadTreeConfig, ReadTreeError, TreeStats, Walk, destroy_tree,
};
