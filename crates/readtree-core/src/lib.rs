//! Core types for readtree.
//!
//! This crate provides the data structures shared by the readtree engine:
//! file nodes and trees, accept filters, configuration and errors.

mod config;
mod error;
mod filter;
mod node;
mod tree;

pub use config::{
    DEFAULT_MAX_DIR_ENTRIES, DEFAULT_MAX_FILE_SIZE, MAX_ROOT_LEN, ReadTreeConfig,
    ReadTreeConfigBuilder, ReadTreeConfigBuilderError,
};
pub use error::{IoOp, ReadTreeError};
pub use filter::{Accept, AcceptAll, AcceptFilter, AcceptSuffix, EntryType, is_hidden};
pub use node::{FileContent, FileNode, NodeKind, Walk};
pub use tree::{FileTree, TreeStats, destroy_tree};
