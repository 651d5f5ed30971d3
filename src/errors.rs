use thiserror::Error;

use crate::tree::{NodeId, TreeError};

/// Errors that can occur when ranking or unranking trees.
#[derive(Error, Debug)]
pub enum RankError {
    /// A rank, combination or leaf count is out of range or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The tree has more than one root, so there is no single tree to rank
    #[error("Can't rank trees with multiple roots, found {0} roots.")]
    MultipleRoots(usize),
    /// The tree has no root at all
    #[error("This tree is empty.")]
    IsEmpty,
    /// An internal node has a single child
    #[error("Node {0} has a single child, unary nodes can't be ranked.")]
    UnaryNode(NodeId),
    /// There was a [`TreeError`] when reading or writing the tree
    #[error("Problem with the tree structure.")]
    TreeError(#[from] TreeError),
}

impl RankError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Errors that can occur when parsing a topology from a newick string.
#[derive(Error, Debug, PartialEq)]
pub enum NewickParseError {
    /// There is an unclosed bracket in the newick String
    #[error("Missing a closing bracket.")]
    UnclosedBracket,
    /// A bracket or separator is misplaced
    #[error("Unexpected character {1:?} at position {0}.")]
    UnexpectedCharacter(usize, char),
    /// A leaf name is not a non-negative integer
    #[error("Leaf label {0:?} is not a non-negative integer.")]
    InvalidLabel(String),
    /// A subtree has a single child
    #[error("Subtree closing at position {0} has a single child.")]
    UnaryNode(usize),
    /// Nothing to parse
    #[error("The newick string is empty.")]
    Empty,
}
