//! blocktree - A B-tree index with pluggable block-access collaborators.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           blocktree                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                 Tree Layer (tree/)                      │    │
//! │  │   BTree controller: search / insert / delete / min-max  │    │
//! │  │   ┌───────────────────────────────────────────────┐     │    │
//! │  │   │   NodeArena: slot vector + LIFO free list     │     │    │
//! │  │   │        stable NodeId handles, no parents      │     │    │
//! │  │   └───────────────────────────────────────────────┘     │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │                              ↓ on_read / on_write               │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │       Access Layer (access/)  [Pluggable]               │    │
//! │  │   NoopAccess │ CountingAccess │ RecordingAccess │ yours  │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tree never performs I/O. It notifies its [`BlockAccess`]
//! collaborator before reading a node during a descent and after
//! mutating one; what those events mean is entirely up to the
//! collaborator.
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`tree`] - The B-tree core and traversal
//! - [`access`] - Block-access collaborators
//!
//! # Quick Start
//! ```
//! use blocktree::{BTree, TraversalOrder};
//!
//! // A tree with minimum degree 2 (each node holds 1 to 3 keys)
//! let mut tree: BTree<i32> = BTree::new(2);
//!
//! for key in [5, 3, 8, 1] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.contains(&8));
//! assert_eq!(tree.minimum().unwrap(), &1);
//!
//! let sorted: Vec<i32> = tree.traverse(TraversalOrder::Inorder).copied().collect();
//! assert_eq!(sorted, vec![1, 3, 5, 8]);
//! ```

// Core modules
pub mod access;
pub mod common;
pub mod tree;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, NodeId, Result};

pub use access::{
    AccessEvent, AccessStats, BlockAccess, CountingAccess, NoopAccess, RecordingAccess,
    StatsSnapshot,
};
pub use tree::{BTree, Node, Traversal, TraversalOrder};
