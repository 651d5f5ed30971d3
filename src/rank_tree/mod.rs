//! Canonical unordered, leaf-labelled trees that can be ranked and unranked.
//!
//! The rank of a tree with `n` leaves has two parts:
//!  - The *shape rank*: the position of its topology in the enumeration of all
//!    unlabelled trees with `n` leaves.
//!  - The *label rank*: the position of its labelling in the enumeration of all
//!    the labellings of that shape.
//!
//! Siblings are kept in canonical order, by number of leaves, then shape rank,
//! then smallest leaf label, so each isomorphism class has a single
//! representative.
//!
//! ```
//! use num_bigint::BigUint;
//! use ranktree::rank_tree::RankTree;
//!
//! let tree: RankTree = "(2,(0,1))".parse().unwrap();
//! let rank = tree.rank().unwrap();
//! assert_eq!(rank.shape, BigUint::from(1u32));
//! assert_eq!(rank.label, BigUint::from(2u32));
//!
//! let unranked = RankTree::unrank(&rank, 3).unwrap();
//! assert_eq!(unranked, tree);
//! ```

use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::NewickParseError;
use crate::partition::group_by_runs;

pub mod bridge;
pub mod enumerate;
pub mod label;
pub mod shape;

pub use self::enumerate::{AllLabelledTrees, AllShapes};
pub use self::label::num_labellings;
pub use self::shape::{num_shapes, num_tree_pairings};

/// Leaf label, `None` for leaves that have not been labelled yet
pub type Label = Option<usize>;

/// Position of a tree in the enumeration of all trees with the same number of leaves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rank {
    /// Rank of the unlabelled shape of the tree
    pub shape: BigUint,
    /// Rank of the labelling of the tree among the labellings of its shape
    pub label: BigUint,
}

impl Rank {
    pub fn new(shape: impl Into<BigUint>, label: impl Into<BigUint>) -> Self {
        Self {
            shape: shape.into(),
            label: label.into(),
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.shape, self.label)
    }
}

/// An unordered tree that keeps track of the ranks of each of its subtrees.
#[derive(Debug, Clone)]
pub struct RankTree {
    children: Vec<RankTree>,
    num_leaves: usize,
    labels: Vec<Label>,
    shape_rank: BigUint,
    label_rank: Option<BigUint>,
}

/// Building trees
impl RankTree {
    /// Creates an unlabelled leaf
    pub fn new_leaf() -> Self {
        Self::from_leaf_label(None)
    }

    /// Creates a leaf with the given label
    pub fn new_labelled(label: usize) -> Self {
        Self::from_leaf_label(Some(label))
    }

    fn from_leaf_label(label: Label) -> Self {
        Self {
            children: vec![],
            num_leaves: 1,
            labels: vec![label],
            shape_rank: BigUint::zero(),
            label_rank: None,
        }
    }

    /// Creates an internal node from its children. The children are kept in
    /// the given order, see [`RankTree::canonical`] to sort them.
    ///
    /// # Panics
    /// If there are fewer than 2 children, unary nodes can't be ranked.
    /// ```
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let cherry = RankTree::new(vec![RankTree::new_labelled(0), RankTree::new_labelled(1)]);
    /// assert_eq!(cherry.num_leaves(), 2);
    /// assert_eq!(cherry.labels(), &[Some(0), Some(1)]);
    /// ```
    pub fn new(children: Vec<RankTree>) -> Self {
        assert!(
            children.len() > 1,
            "An internal node needs at least 2 children, got {}",
            children.len()
        );
        let shape_rank = shape::compute_shape_rank(&children);
        Self::from_parts(children, shape_rank, None)
    }

    /// Creates an internal node whose children are sorted in canonical order
    pub fn canonical(mut children: Vec<RankTree>) -> Self {
        children.sort_by(Self::canonical_cmp);
        Self::new(children)
    }

    /// Recursively sorts the children of every node in canonical order
    pub fn canonicalize(self) -> Self {
        if self.is_leaf() {
            return self;
        }
        let children = self.children.into_iter().map(Self::canonicalize).collect();
        Self::canonical(children)
    }

    /// Assembles a node whose ranks are already known
    pub(crate) fn from_parts(
        children: Vec<RankTree>,
        shape_rank: BigUint,
        label_rank: Option<BigUint>,
    ) -> Self {
        let num_leaves = children.iter().map(|c| c.num_leaves).sum();
        let labels = children
            .iter()
            .map(|c| c.labels.iter().copied())
            .kmerge()
            .collect();

        Self {
            children,
            num_leaves,
            labels,
            shape_rank,
            label_rank,
        }
    }

    pub(crate) fn with_cached_label_rank(mut self, label_rank: BigUint) -> Self {
        self.label_rank = Some(label_rank);
        self
    }
}

/// Accessing tree characteristics
impl RankTree {
    /// Children of the root in canonical order
    pub fn children(&self) -> &[RankTree] {
        &self.children
    }

    /// Number of leaves under this node
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Sorted labels of all the leaves under this node
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label of a leaf, or smallest label of the subtree
    pub fn label(&self) -> Label {
        self.labels[0]
    }

    pub fn min_label(&self) -> Label {
        self.labels[0]
    }

    /// Rank of this tree among all the unlabelled trees with the same number of leaves
    pub fn shape_rank(&self) -> &BigUint {
        &self.shape_rank
    }

    /// Label rank computed by the finalize pass, if it was run on this tree
    pub fn cached_label_rank(&self) -> Option<&BigUint> {
        self.label_rank.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if every leaf of the tree has a label
    pub fn is_labelled(&self) -> bool {
        self.labels.iter().all(Option::is_some)
    }

    /// Number of leaves of each child
    pub fn leaf_partition(&self) -> Vec<usize> {
        self.children.iter().map(|c| c.num_leaves).collect()
    }

    /// Leaves of the tree, from left to right
    /// ```
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let tree: RankTree = "(3,(0,(1,2)))".parse().unwrap();
    /// let labels: Vec<_> = tree.leaves().iter().map(|l| l.label()).flatten().collect();
    /// assert_eq!(labels, vec![3, 0, 1, 2]);
    /// ```
    pub fn leaves(&self) -> Vec<&RankTree> {
        if self.is_leaf() {
            return vec![self];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }
}

/// Canonical ordering, grouping and comparisons
impl RankTree {
    /// Key defining the canonical order of sibling subtrees
    pub fn canonical_order(&self) -> (usize, &BigUint, Label) {
        (self.num_leaves, &self.shape_rank, self.min_label())
    }

    /// Compares two trees according to their canonical order
    pub fn canonical_cmp(a: &RankTree, b: &RankTree) -> Ordering {
        a.canonical_order().cmp(&b.canonical_order())
    }

    /// Check if the children of every node are in canonical order
    /// ```
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let canonical: RankTree = "(0,(1,2))".parse().unwrap();
    /// assert!(canonical.is_canonical());
    ///
    /// let flipped = RankTree::new(vec![
    ///     RankTree::new(vec![RankTree::new_labelled(1), RankTree::new_labelled(2)]),
    ///     RankTree::new_labelled(0),
    /// ]);
    /// assert!(!flipped.is_canonical());
    /// ```
    pub fn is_canonical(&self) -> bool {
        self.children
            .windows(2)
            .all(|w| Self::canonical_cmp(&w[0], &w[1]) != Ordering::Greater)
            && self.children.iter().all(|c| c.is_canonical())
    }

    /// Check if all the children of the root have the same shape
    pub fn is_symmetrical(&self) -> bool {
        self.children
            .iter()
            .map(|c| (c.num_leaves, &c.shape_rank))
            .all_equal()
    }

    /// Check if two trees have the same shape, regardless of labels
    pub fn shape_equal(&self, other: &Self) -> bool {
        if self.is_leaf() && other.is_leaf() {
            return true;
        }

        self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(c1, c2)| c1.shape_equal(c2))
    }

    /// Consecutive children with the same number of leaves
    pub fn group_children_by_num_leaves(&self) -> Vec<&[RankTree]> {
        group_by_runs(&self.children, |c1, c2| c1.num_leaves == c2.num_leaves)
    }

    /// Consecutive children with the same shape
    pub fn group_children_by_shape(&self) -> Vec<&[RankTree]> {
        group_by_runs(&self.children, |c1, c2| {
            c1.num_leaves == c2.num_leaves && c1.shape_rank == c2.shape_rank
        })
    }
}

impl PartialEq for RankTree {
    fn eq(&self, other: &Self) -> bool {
        if self.is_leaf() && other.is_leaf() {
            return self.label() == other.label();
        }

        self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(c1, c2)| c1 == c2)
    }
}

impl Eq for RankTree {}

impl Display for RankTree {
    /// Topology of the tree in newick format, without the closing semicolon
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            return match self.label() {
                Some(label) => write!(f, "{label}"),
                None => Ok(()),
            };
        }

        write!(f, "(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for RankTree {
    type Err = NewickParseError;

    /// Reads a tree topology with integer leaf labels from a newick string.
    /// Branch lengths, comments and internal node names are skipped and the
    /// resulting tree is in canonical order.
    /// ```
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let tree: RankTree = "((1:0.5,2)a:0.1, 0);".parse().unwrap();
    /// assert_eq!(tree.to_string(), "(0,(1,2))");
    /// ```
    fn from_str(newick: &str) -> Result<Self, Self::Err> {
        #[derive(Debug, PartialEq)]
        enum Field {
            Name,
            Skip,
            Comment,
        }

        // Children of the subtrees that are still open
        let mut open: Vec<Vec<RankTree>> = vec![];
        let mut current: Option<RankTree> = None;
        let mut name = String::new();
        let mut parsing = Field::Name;

        let finish_leaf = |name: &mut String,
                           current: &mut Option<RankTree>|
         -> Result<(), NewickParseError> {
            if current.is_none() {
                let label = name
                    .parse()
                    .map_err(|_| NewickParseError::InvalidLabel(name.clone()))?;
                *current = Some(RankTree::new_labelled(label));
            }
            name.clear();
            Ok(())
        };

        for (pos, c) in newick.char_indices() {
            if parsing == Field::Comment {
                if c == ']' {
                    parsing = Field::Skip;
                }
                continue;
            }
            if c.is_whitespace() {
                continue;
            }

            // The whole tree has been read, only a root name or length may follow
            let closed = open.is_empty() && current.is_some();

            match c {
                '[' => parsing = Field::Comment,
                ':' => parsing = Field::Skip,
                ';' => break,
                '(' => {
                    if current.is_some() || !name.is_empty() {
                        return Err(NewickParseError::UnexpectedCharacter(pos, c));
                    }
                    open.push(vec![]);
                    parsing = Field::Name;
                }
                ',' | ')' => {
                    let siblings = open
                        .last_mut()
                        .ok_or(NewickParseError::UnexpectedCharacter(pos, c))?;
                    finish_leaf(&mut name, &mut current)?;
                    siblings.extend(current.take());
                    parsing = Field::Name;

                    if c == ')' {
                        let children = open.pop().unwrap_or_default();
                        if children.len() < 2 {
                            return Err(NewickParseError::UnaryNode(pos));
                        }
                        current = Some(RankTree::canonical(children));
                        // Internal node names are not kept
                        parsing = Field::Skip;
                    }
                }
                _ => {
                    if parsing == Field::Name && !closed {
                        name.push(c);
                    }
                }
            }
        }

        if !open.is_empty() {
            return Err(NewickParseError::UnclosedBracket);
        }
        if current.is_none() && !name.is_empty() {
            finish_leaf(&mut name, &mut current)?;
        }

        current.ok_or(NewickParseError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cherry(a: usize, b: usize) -> RankTree {
        RankTree::new(vec![RankTree::new_labelled(a), RankTree::new_labelled(b)])
    }

    #[test]
    fn construction() {
        let tree = RankTree::new(vec![RankTree::new_labelled(3), cherry(0, 2)]);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.labels(), &[Some(0), Some(2), Some(3)]);
        assert_eq!(tree.min_label(), Some(0));
        assert_eq!(tree.leaf_partition(), vec![1, 2]);
        assert!(tree.is_labelled());
        assert!(!RankTree::new(vec![RankTree::new_leaf(), RankTree::new_labelled(1)]).is_labelled());
    }

    #[test]
    #[should_panic]
    fn unary_nodes_are_rejected() {
        RankTree::new(vec![RankTree::new_leaf()]);
    }

    #[test]
    fn equal() {
        assert_eq!(RankTree::new_leaf(), RankTree::new_leaf());
        assert!(RankTree::new_leaf().shape_equal(&RankTree::new_leaf()));

        assert_eq!(RankTree::new_labelled(0), RankTree::new_labelled(0));
        assert_ne!(RankTree::new_labelled(0), RankTree::new_labelled(1));
        assert!(RankTree::new_labelled(0).shape_equal(&RankTree::new_labelled(1)));

        let tree1 = cherry(0, 1);
        assert_eq!(tree1, tree1);
        assert_ne!(tree1, RankTree::new_leaf());
        assert!(!tree1.shape_equal(&RankTree::new_leaf()));

        let tree2 = cherry(2, 1);
        assert_ne!(tree1, tree2);
        assert!(tree1.shape_equal(&tree2));
    }

    #[test]
    fn is_canonical() {
        let shape_not_canonical = RankTree::new(vec![
            RankTree::new_labelled(0),
            RankTree::new(vec![cherry(1, 2), RankTree::new_labelled(3)]),
        ]);
        assert!(!shape_not_canonical.is_canonical());
        assert!(shape_not_canonical.canonicalize().is_canonical());

        let labels_not_canonical = RankTree::new(vec![
            RankTree::new_labelled(0),
            RankTree::new(vec![cherry(2, 3), cherry(1, 4)]),
        ]);
        assert!(!labels_not_canonical.is_canonical());
        let fixed = labels_not_canonical.canonicalize();
        assert!(fixed.is_canonical());
        assert_eq!(fixed.to_string(), "(0,((1,4),(2,3)))");
    }

    #[test]
    fn shape_rank_ignores_sibling_order() {
        let sorted = RankTree::new(vec![RankTree::new_labelled(0), cherry(1, 2)]);
        let flipped = RankTree::new(vec![cherry(1, 2), RankTree::new_labelled(0)]);
        assert_eq!(sorted.shape_rank(), flipped.shape_rank());
    }

    #[test]
    fn is_symmetrical() {
        assert!(RankTree::new_leaf().is_symmetrical());
        let three_leaf_asym = RankTree::new(vec![
            RankTree::new_leaf(),
            RankTree::new(vec![RankTree::new_leaf(), RankTree::new_leaf()]),
        ]);
        assert!(!three_leaf_asym.is_symmetrical());
        let six_leaf_sym = RankTree::new(vec![three_leaf_asym.clone(), three_leaf_asym]);
        assert!(six_leaf_sym.is_symmetrical());
    }

    #[test]
    fn grouping_children() {
        let tree = RankTree::new(vec![
            RankTree::new_labelled(0),
            RankTree::new_labelled(1),
            cherry(2, 3),
            RankTree::new(vec![
                RankTree::new_labelled(4),
                RankTree::new_labelled(5),
                RankTree::new_labelled(6),
            ]),
            RankTree::new(vec![RankTree::new_labelled(7), cherry(8, 9)]),
        ]);
        let by_leaves: Vec<_> = tree
            .group_children_by_num_leaves()
            .iter()
            .map(|g| g.len())
            .collect();
        assert_eq!(by_leaves, vec![2, 1, 2]);

        let by_shape: Vec<_> = tree
            .group_children_by_shape()
            .iter()
            .map(|g| g.len())
            .collect();
        assert_eq!(by_shape, vec![2, 1, 1, 1]);
    }

    #[test]
    fn newick_round_trip() {
        let cases = ["0", "(0,1,2)", "(0,(1,2))", "(2,(0,1))", "((0,3),(1,2))"];
        for newick in cases {
            let tree: RankTree = newick.parse().unwrap();
            assert_eq!(tree.to_string(), newick);
            let with_semicolon: RankTree = format!("{newick};").parse().unwrap();
            assert_eq!(with_semicolon, tree);
        }
        assert_eq!(RankTree::new_leaf().to_string(), "");
    }

    #[test]
    fn newick_skips_lengths_and_names() {
        let tree: RankTree = "((2:0.1,1:0.2)inner:0.3[&comment],0)root:0.0;"
            .parse()
            .unwrap();
        assert_eq!(tree.to_string(), "(0,(1,2))");
    }

    #[test]
    fn newick_errors() {
        assert_eq!(
            "((0,1),2".parse::<RankTree>(),
            Err(NewickParseError::UnclosedBracket)
        );
        assert_eq!(
            "(0,1))".parse::<RankTree>(),
            Err(NewickParseError::UnexpectedCharacter(5, ')'))
        );
        assert_eq!(
            "(0,a)".parse::<RankTree>(),
            Err(NewickParseError::InvalidLabel("a".into()))
        );
        assert_eq!(
            "((0),1)".parse::<RankTree>(),
            Err(NewickParseError::UnaryNode(3))
        );
        assert_eq!(
            "(0,1),2".parse::<RankTree>(),
            Err(NewickParseError::UnexpectedCharacter(5, ','))
        );
        assert_eq!("".parse::<RankTree>(), Err(NewickParseError::Empty));
        assert_eq!(";".parse::<RankTree>(), Err(NewickParseError::Empty));
    }

    #[test]
    fn leaves_left_to_right() {
        let tree: RankTree = "(0,(1,(2,3)),(4,5,6))".parse().unwrap();
        let labels: Vec<_> = tree.leaves().iter().filter_map(|l| l.label()).collect();
        assert_eq!(labels, vec![0, 4, 5, 6, 1, 2, 3]);
    }
}
