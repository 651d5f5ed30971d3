//! Lazy enumeration of every tree with a given number of leaves, in rank order.

use num_bigint::BigUint;
use num_traits::Zero;

use super::{num_shapes, RankTree};

/// Iterator over the unlabelled trees with a given number of leaves,
/// by increasing shape rank. See [`RankTree::all_shapes`].
#[derive(Debug, Clone)]
pub struct AllShapes {
    num_leaves: usize,
    next: BigUint,
    count: BigUint,
}

impl Iterator for AllShapes {
    type Item = RankTree;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let tree = RankTree::shape_unrank(&self.next, self.num_leaves).ok()?;
        self.next += 1u32;
        Some(tree)
    }
}

/// Iterator over the labelled trees with a given number of leaves,
/// by increasing shape rank then label rank. See [`RankTree::all_labelled_trees`].
#[derive(Debug, Clone)]
pub struct AllLabelledTrees {
    shapes: AllShapes,
    // Shape being labelled, next label rank and number of labellings
    current: Option<(RankTree, BigUint, BigUint)>,
}

impl Iterator for AllLabelledTrees {
    type Item = RankTree;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((shape, next, count)) = &mut self.current {
                if *next < *count {
                    let tree = shape.label_unrank(next).ok()?;
                    *next += 1u32;
                    return Some(tree);
                }
            }

            let shape = self.shapes.next()?;
            let count = shape.num_labellings();
            self.current = Some((shape, BigUint::zero(), count));
        }
    }
}

impl RankTree {
    /// All the unlabelled trees with `n` leaves, in shape rank order.
    /// ```
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let shapes: Vec<_> = RankTree::all_shapes(3).map(|t| t.leaf_partition()).collect();
    /// assert_eq!(shapes, vec![vec![1, 1, 1], vec![1, 2]]);
    /// ```
    pub fn all_shapes(n: usize) -> AllShapes {
        AllShapes {
            num_leaves: n,
            next: BigUint::zero(),
            count: num_shapes(n),
        }
    }

    /// All the trees with `n` leaves labelled `0..n`, in rank order.
    /// ```
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let trees: Vec<_> = RankTree::all_labelled_trees(3).map(|t| t.to_string()).collect();
    /// assert_eq!(trees, vec!["(0,1,2)", "(0,(1,2))", "(1,(0,2))", "(2,(0,1))"]);
    /// ```
    pub fn all_labelled_trees(n: usize) -> AllLabelledTrees {
        AllLabelledTrees {
            shapes: Self::all_shapes(n),
            current: None,
        }
    }
}
