//! An in-memory B+Tree index for Rust.
//!
//! This crate provides [`BPTreeMap`], an order-preserving index structure
//! supporting insertion of unique-key records and point lookup by key,
//! parameterized by a runtime branching factor (the B+Tree's "M"):
//!
//! - [`with_order`](BPTreeMap::with_order) - Construct a tree with a chosen
//!   branching factor (`order >= 3`)
//! - [`insert`](BPTreeMap::insert) - Insert a key-value pair, splitting and
//!   growing the tree as needed
//! - [`get`](BPTreeMap::get) - Point lookup by key
//! - [`to_dot`](BPTreeMap::to_dot) - Export the tree's topology as two
//!   Graphviz documents for debugging
//!
//! # Example
//!
//! ```
//! use bptree::{BPTreeMap, InsertOutcome};
//!
//! let mut index = BPTreeMap::with_order(3).unwrap();
//!
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     assert!(matches!(index.insert(key, key * 10), InsertOutcome::Inserted(_)));
//! }
//!
//! assert_eq!(index.get(&12), Some(&120));
//! assert_eq!(index.get(&99), None);
//!
//! // The branching factor caps every node at `order - 1` keys, so the
//! // eight insertions above have already forced several splits.
//! assert!(index.height() > 1);
//! ```
//!
//! # Implementation
//!
//! The tree is a classic B+Tree: all records live in leaf nodes at equal
//! depth, internal nodes hold only routing keys, and a full node splits on
//! insertion, promoting a separator key into its parent (growing a new root
//! when the split reaches the top). Nodes are stored in an arena and
//! addressed by stable handles; each node carries a non-owning handle back
//! to its parent, which the split path keeps consistent after every
//! structural change.
//!
//! Leaves also maintain a sibling link to the next leaf in key order. The
//! link is kept correct through every split but is deliberately not exposed:
//! range scans, deletion, and concurrent access are outside this crate's
//! scope.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

mod error;
mod export;
mod raw;

pub mod bptree_map;

pub use bptree_map::{BPTreeMap, InsertOutcome, NodeId};
pub use error::{Error, Result};
pub use export::DotDump;
