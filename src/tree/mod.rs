//! Minimal tree tables that ranked trees are read from and written to.
//!
//! This module defines:
//!  - The [`TableCollection`] struct that holds node and edge tables.
//!  - The [`Tree`] struct, a parent/child view of the nodes built from the tables.
//!  - The [`Node`] struct that represents a node of a [`Tree`].

mod node;
mod tables;
mod tree_impl;

pub use self::node::{Node, NODE_IS_SAMPLE};
pub use self::tables::{EdgeRow, NodeRow, TableCollection};
pub use self::tree_impl::{Tree, TreeError};

/// A type that represents Identifiers of [`Node`] objects
/// within a [`Tree`] object.
pub type NodeId = usize;

/// A type that represents the time of a [`Node`]
pub type Time = f64;
