//! Ranking and unranking of the labellings of a fixed tree shape.
//!
//! The children of a node are grouped by shape. Each group receives a
//! combination of the labels available at the node. Within a group of
//! identical subtrees, swapping two subtrees yields the same tree, so the
//! smallest label of the group always goes to the first subtree, then the
//! smallest remaining label to the second subtree, and so on.
//!
//! For every group, the labelling of a node therefore decomposes into:
//!  1. which combination of labels is assigned to the group,
//!  2. how those labels are split between the trees of the group,
//!  3. how each tree of the group is labelled with its own labels.

use std::iter::once;

use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::{pow, One, Zero};

use super::{Label, Rank, RankTree};
use crate::combinatorics::{self, comb};
use crate::errors::RankError;

/// Number of distinct labellings of the tree with `n` leaves and the given shape rank.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::rank_tree::num_labellings;
///
/// // (0,(1,2)), (1,(0,2)) and (2,(0,1))
/// assert_eq!(num_labellings(&BigUint::from(1u32), 3).unwrap(), BigUint::from(3u32));
/// ```
pub fn num_labellings(shape_rank: &BigUint, n: usize) -> Result<BigUint, RankError> {
    Ok(RankTree::shape_unrank(shape_rank, n)?.num_labellings())
}

fn merged_labels(trees: &[RankTree]) -> Vec<Label> {
    trees
        .iter()
        .map(|t| t.labels.iter().copied())
        .kmerge()
        .collect()
}

fn set_minus<T: PartialEq + Clone>(values: &[T], subset: &[T]) -> Vec<T> {
    values
        .iter()
        .filter(|v| !subset.contains(v))
        .cloned()
        .collect()
}

/// Number of ways to split the labels of a group of `count` identical trees
/// with `k` leaves each, between those trees.
fn num_assignments_in_group(k: usize, count: usize) -> BigUint {
    // Choose k - 1 labels out of the remaining ones since the smallest
    // one is always assigned to the next tree
    (1..=count).map(|j| comb(j * k - 1, k - 1)).product()
}

/// Number of ways to split a given set of labels between the trees of
/// `group` and to label each of those trees.
fn num_group_labellings(group: &[RankTree]) -> BigUint {
    // All the trees are identical so they can be labelled in the same ways
    let per_tree = group[0].num_labellings();
    num_assignments_in_group(group[0].num_leaves, group.len()) * pow(per_tree, group.len())
}

/// For every `i`, the number of ways to distribute labels between the
/// groups `groups[i..]` and to label all their trees.
fn tail_labellings(groups: &[&[RankTree]]) -> Vec<BigUint> {
    let mut tails = vec![BigUint::one(); groups.len() + 1];
    let mut remaining_leaves = 0;
    for (i, group) in groups.iter().enumerate().rev() {
        let group_leaves = group.len() * group[0].num_leaves;
        remaining_leaves += group_leaves;
        tails[i] = comb(remaining_leaves, group_leaves) * num_group_labellings(group) * &tails[i + 1];
    }
    tails
}

/// Rank of the way labels are split between, and assigned within, the
/// trees of a group of identical trees.
fn group_rank(group: &[RankTree]) -> Result<BigUint, RankError> {
    let k = group[0].num_leaves;
    let per_tree = group[0].num_labellings();
    let mut all_labels = merged_labels(group);

    let mut rank = BigUint::zero();
    for (i, tree) in group.iter().enumerate() {
        let curr_trees = group.len() - i;
        // The smallest label is always in `tree`, so this is also the rank
        // of its other labels among the other labels of the group
        let comb_rank = combinatorics::rank(&tree.labels, &all_labels)?;
        let num_rest_combs = num_assignments_in_group(k, curr_trees - 1);

        let preceding_combs = comb_rank * &num_rest_combs * pow(per_tree.clone(), curr_trees);
        let curr_comb =
            tree.label_rank_unchecked()? * num_rest_combs * pow(per_tree.clone(), curr_trees - 1);
        rank += preceding_combs + curr_comb;

        all_labels = set_minus(&all_labels, &tree.labels);
    }

    Ok(rank)
}

/// Subsets of labels assigned to each child and the label rank of each child
/// for the node whose children are grouped in `groups` and that has the given label rank.
fn children_label_ranks(
    groups: &[&[RankTree]],
    rank: BigUint,
    labels: &[usize],
) -> Result<(Vec<Vec<usize>>, Vec<BigUint>), RankError> {
    let tails = tail_labellings(groups);
    let mut labels = labels.to_vec();
    let mut rank = rank;

    let mut child_labels = vec![];
    let mut child_ranks = vec![];
    for (i, group) in groups.iter().enumerate() {
        let num_rest_labellings = &tails[i + 1];
        let per_label_comb = num_group_labellings(group) * num_rest_labellings;

        let comb_rank = &rank / &per_label_comb;
        let g_rank = (&rank % &per_label_comb) / num_rest_labellings;
        rank %= num_rest_labellings;

        let group_leaves = group.len() * group[0].num_leaves;
        let g_labels = combinatorics::unrank(&comb_rank, &labels, group_leaves)?;

        let (labels_in_group, ranks_in_group) = group_label_ranks(g_rank, group, &g_labels)?;
        child_labels.extend(labels_in_group);
        child_ranks.extend(ranks_in_group);

        labels = set_minus(&labels, &g_labels);
    }

    Ok((child_labels, child_ranks))
}

/// Subsets of labels assigned to each tree of a group of identical trees
/// and the label rank of each tree.
fn group_label_ranks(
    rank: BigUint,
    group: &[RankTree],
    labels: &[usize],
) -> Result<(Vec<Vec<usize>>, Vec<BigUint>), RankError> {
    let k = group[0].num_leaves;
    let per_tree = group[0].num_labellings();
    let mut labels = labels.to_vec();
    let mut rank = rank;

    let mut tree_labels = Vec::with_capacity(group.len());
    let mut tree_ranks = Vec::with_capacity(group.len());
    for i in 0..group.len() {
        let rest_trees = group.len() - i - 1;
        let num_rest_labellings =
            num_assignments_in_group(k, rest_trees) * pow(per_tree.clone(), rest_trees);
        let per_label_comb = &per_tree * &num_rest_labellings;

        let comb_rank = &rank / &per_label_comb;
        let t_rank = (&rank % &per_label_comb) / &num_rest_labellings;
        rank %= &num_rest_labellings;

        let t_labels: Vec<usize> = once(labels[0])
            .chain(combinatorics::unrank(&comb_rank, &labels[1..], k - 1)?)
            .collect();
        labels = set_minus(&labels, &t_labels);

        tree_labels.push(t_labels);
        tree_ranks.push(t_rank);
    }

    Ok((tree_labels, tree_ranks))
}

impl RankTree {
    /// Number of distinct labellings of this tree's shape.
    pub fn num_labellings(&self) -> BigUint {
        if self.is_leaf() {
            return BigUint::one();
        }

        tail_labellings(&self.group_children_by_shape())
            .swap_remove(0)
    }

    /// Fails if the labelling of this tree can't be ranked.
    fn check_labelling(&self) -> Result<(), RankError> {
        if !self.is_labelled() {
            return Err(RankError::invalid("all the leaves must be labelled"));
        }
        if self.labels.windows(2).any(|w| w[0] == w[1]) {
            return Err(RankError::invalid("leaf labels must be unique"));
        }
        if !self.is_canonical() {
            return Err(RankError::invalid("the tree is not in canonical order"));
        }
        Ok(())
    }

    /// Rank of the labelling of this tree among all the labellings of its shape.
    /// ```
    /// use num_bigint::BigUint;
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let tree: RankTree = "((0,3),(1,2))".parse().unwrap();
    /// assert_eq!(tree.label_rank().unwrap(), BigUint::from(2u32));
    /// ```
    pub fn label_rank(&self) -> Result<BigUint, RankError> {
        if let Some(rank) = &self.label_rank {
            return Ok(rank.clone());
        }
        self.check_labelling()?;
        self.label_rank_unchecked()
    }

    /// Rank of the labelling.
    ///
    /// For each group G of identical children, take the rank of the
    /// combination of labels assigned to G among the labels that are still
    /// available. That rank times the number of labellings of G and of the
    /// following groups is the number of labellings preceding ours.
    /// Then add the rank of the labelling within G times the number of
    /// labellings of the following groups.
    fn label_rank_unchecked(&self) -> Result<BigUint, RankError> {
        if let Some(rank) = &self.label_rank {
            return Ok(rank.clone());
        }
        if self.is_leaf() {
            return Ok(BigUint::zero());
        }

        let groups = self.group_children_by_shape();
        let tails = tail_labellings(&groups);
        let mut all_labels = self.labels.clone();

        let mut total = BigUint::zero();
        for (i, group) in groups.iter().enumerate() {
            let num_rest_labellings = &tails[i + 1];
            let g_labels = merged_labels(group);

            let comb_rank = combinatorics::rank(&g_labels, &all_labels)?;
            total += comb_rank * num_group_labellings(group) * num_rest_labellings;
            total += group_rank(group)? * num_rest_labellings;

            all_labels = set_minus(&all_labels, &g_labels);
        }

        Ok(total)
    }

    /// Returns the same tree where the label rank of every node has been
    /// computed and stored.
    pub fn with_label_ranks(self) -> Result<Self, RankError> {
        self.check_labelling()?;
        self.finalize_labels()
    }

    fn finalize_labels(self) -> Result<Self, RankError> {
        if self.is_leaf() {
            return Ok(self.with_cached_label_rank(BigUint::zero()));
        }

        let children = self
            .children
            .into_iter()
            .map(Self::finalize_labels)
            .collect::<Result<Vec<_>, _>>()?;
        let node = Self::from_parts(children, self.shape_rank, None);
        let rank = node.label_rank_unchecked()?;

        Ok(node.with_cached_label_rank(rank))
    }

    /// Shape rank and label rank of this tree
    pub fn rank(&self) -> Result<Rank, RankError> {
        Ok(Rank {
            shape: self.shape_rank.clone(),
            label: self.label_rank()?,
        })
    }

    /// Generates the tree with `n` leaves and the given rank.
    /// ```
    /// use ranktree::rank_tree::{Rank, RankTree};
    ///
    /// let tree = RankTree::unrank(&Rank::new(3u32, 5u32), 4).unwrap();
    /// assert_eq!(tree.to_string(), "(1,(3,(0,2)))");
    /// ```
    pub fn unrank(rank: &Rank, n: usize) -> Result<Self, RankError> {
        Self::shape_unrank(&rank.shape, n)?.label_unrank(&rank.label)
    }

    /// Generates a tree with the same shape as this one, labelled with `0..n`
    /// according to the given label rank.
    pub fn label_unrank(&self, label_rank: &BigUint) -> Result<Self, RankError> {
        let count = self.num_labellings();
        if label_rank >= &count {
            return Err(RankError::invalid(format!(
                "label rank {label_rank} is out of range, this shape has {count} labellings"
            )));
        }

        let labels: Vec<usize> = (0..self.num_leaves).collect();
        self.label_unrank_with(label_rank.clone(), &labels)
    }

    fn label_unrank_with(&self, label_rank: BigUint, labels: &[usize]) -> Result<Self, RankError> {
        assert_eq!(
            labels.len(),
            self.num_leaves,
            "Labelling a subtree with {} leaves using {} labels",
            self.num_leaves,
            labels.len()
        );

        if self.is_leaf() {
            assert!(label_rank.is_zero(), "A leaf has a single labelling");
            return Ok(RankTree::new_labelled(labels[0]).with_cached_label_rank(label_rank));
        }

        let groups = self.group_children_by_shape();
        let (child_labels, child_ranks) = children_label_ranks(&groups, label_rank.clone(), labels)?;

        let children = self
            .children
            .iter()
            .zip(child_ranks.into_iter().zip(child_labels))
            .map(|(child, (rank, labels))| child.label_unrank_with(rank, &labels))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(
            children,
            self.shape_rank.clone(),
            Some(label_rank),
        ))
    }
}
