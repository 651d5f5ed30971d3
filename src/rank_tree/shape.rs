//! Ranking and unranking of unlabelled tree shapes.
//!
//! Unlabelled trees with `n` leaves are enumerated partition by partition,
//! in the order of [`partitions`]. Within a partition, children with the same
//! number of leaves `k` form a group. The shapes of a group of `g` children are
//! a combination with replacement of `g` shapes out of the `num_shapes(k)` shapes
//! with `k` leaves. Groups vary independently, with the last group varying fastest.

use std::sync::{Mutex, PoisonError};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use tracing::trace;

use super::RankTree;
use crate::combinatorics::{
    comb_with_replacement, with_replacement_rank_unchecked, with_replacement_unrank,
};
use crate::errors::RankError;
use crate::partition::{group_by_runs, group_partition, partitions};

/// Number of shapes for each number of leaves, grown on demand and never evicted
static SHAPE_COUNTS: Lazy<Mutex<Vec<BigUint>>> =
    Lazy::new(|| Mutex::new(vec![BigUint::zero(), BigUint::one()]));

/// Runs `f` on the table of shape counts, after making sure it covers `n` leaves
fn with_shape_counts<R>(n: usize, f: impl FnOnce(&[BigUint]) -> R) -> R {
    // The table is only ever appended to so a poisoned lock still holds valid values
    let mut counts = SHAPE_COUNTS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    while counts.len() <= n {
        let m = counts.len();
        let count = partitions(m)
            .map(|part| pairings_from_counts(counts.as_slice(), &part))
            .sum();
        trace!(leaves = m, shapes = %count, "Extending shape count table");
        counts.push(count);
    }

    f(counts.as_slice())
}

fn pairings_from_counts(counts: &[BigUint], part: &[usize]) -> BigUint {
    group_partition(part)
        .iter()
        .map(|g| comb_with_replacement(counts[g[0]].clone(), g.len()))
        .product()
}

/// The number of unlabelled trees with `n` leaves, without unary nodes.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::rank_tree::num_shapes;
///
/// let counts: Vec<_> = (0..8).map(num_shapes).collect();
/// let expected: Vec<BigUint> = [0u32, 1, 1, 2, 5, 12, 33, 90].into_iter().map(BigUint::from).collect();
/// assert_eq!(counts, expected);
/// ```
pub fn num_shapes(n: usize) -> BigUint {
    with_shape_counts(n, |counts| counts[n].clone())
}

/// The number of tree shapes whose root children have the numbers of leaves
/// given by the partition `part`. Each group of `g` children with `k` leaves
/// picks `g` shapes out of `num_shapes(k)`, with replacement.
pub fn num_tree_pairings(part: &[usize]) -> BigUint {
    let max = part.iter().copied().max().unwrap_or(0);
    with_shape_counts(max, |counts| pairings_from_counts(counts, part))
}

/// Number of pairings of the groups `groups[i..]`, for every `i`,
/// where a group is a run of `(number of children, leaves per child)`.
fn tail_pairings(groups: &[(usize, usize)]) -> Vec<BigUint> {
    let mut tails = vec![BigUint::one(); groups.len() + 1];
    for (i, &(size, k)) in groups.iter().enumerate().rev() {
        tails[i] = &tails[i + 1] * comb_with_replacement(num_shapes(k), size);
    }
    tails
}

/// Shape rank of the tree whose root has the given children.
///
/// First count every tree whose leaf partition comes before this one.
/// Then, for each group of children with `k` leaves, the shapes of the
/// group were chosen as a combination with replacement of `S(k)` shapes.
/// The rank of this combination times the number of arrangements of the
/// following groups is the number of trees preceding this one in the group.
pub(crate) fn compute_shape_rank(children: &[RankTree]) -> BigUint {
    if children.is_empty() {
        return BigUint::zero();
    }

    let mut keys: Vec<(usize, &BigUint)> = children
        .iter()
        .map(|c| (c.num_leaves, &c.shape_rank))
        .collect();
    keys.sort();

    let part: Vec<usize> = keys.iter().map(|(k, _)| *k).collect();
    let n = part.iter().sum();
    let mut total: BigUint = partitions(n)
        .take_while(|prev_part| prev_part != &part)
        .map(|prev_part| num_tree_pairings(&prev_part))
        .sum();

    let groups = group_by_runs(&keys, |a, b| a.0 == b.0);
    let sizes: Vec<_> = groups.iter().map(|g| (g.len(), g[0].0)).collect();
    let tails = tail_pairings(&sizes);

    for (i, group) in groups.iter().enumerate() {
        let k = group[0].0;
        let ranks: Vec<BigUint> = group.iter().map(|(_, r)| (*r).clone()).collect();
        let group_rank = with_replacement_rank_unchecked(&ranks, &num_shapes(k));
        total += group_rank * &tails[i + 1];
    }

    total
}

/// Leaf partition of the tree with `n` leaves and shape rank `rank`, and the
/// shape rank of each of its children.
fn children_shape_ranks(rank: &BigUint, n: usize) -> Result<(Vec<usize>, Vec<BigUint>), RankError> {
    let mut num_prior_trees = BigUint::zero();
    let mut found = None;
    for part in partitions(n) {
        let num_trees_with_part = num_tree_pairings(&part);
        if &num_prior_trees + &num_trees_with_part > *rank {
            found = Some(part);
            break;
        }
        num_prior_trees += num_trees_with_part;
    }
    let part = found.ok_or_else(|| {
        RankError::invalid(format!("shape rank {rank} is out of range for {n} leaves"))
    })?;

    // Rank among the trees with this partition
    let mut rank = rank - num_prior_trees;

    let groups = group_partition(&part);
    let sizes: Vec<_> = groups.iter().map(|g| (g.len(), g[0])).collect();
    let tails = tail_pairings(&sizes);

    let mut child_ranks = Vec::with_capacity(part.len());
    for (i, &(size, k)) in sizes.iter().enumerate() {
        let rest_pairings = &tails[i + 1];
        let shapes_comb_rank = &rank / rest_pairings;
        child_ranks.extend(with_replacement_unrank(
            &shapes_comb_rank,
            &num_shapes(k),
            size,
        )?);
        rank %= rest_pairings;
    }

    Ok((part, child_ranks))
}

impl RankTree {
    /// Generates the unlabelled tree with `n` leaves and the given shape rank.
    /// ```
    /// use num_bigint::BigUint;
    /// use ranktree::rank_tree::RankTree;
    ///
    /// let tree = RankTree::shape_unrank(&BigUint::from(3u32), 4).unwrap();
    /// assert_eq!(tree.leaf_partition(), vec![1, 3]);
    /// assert_eq!(tree.shape_rank(), &BigUint::from(3u32));
    /// ```
    pub fn shape_unrank(shape_rank: &BigUint, n: usize) -> Result<Self, RankError> {
        let count = num_shapes(n);
        if shape_rank >= &count {
            return Err(RankError::invalid(format!(
                "shape rank {shape_rank} is out of range, there are {count} shapes with {n} leaves"
            )));
        }

        Self::shape_unrank_unchecked(shape_rank, n)
    }

    fn shape_unrank_unchecked(shape_rank: &BigUint, n: usize) -> Result<Self, RankError> {
        if n == 1 {
            return Ok(RankTree::new_leaf());
        }

        let (part, child_ranks) = children_shape_ranks(shape_rank, n)?;
        let children = child_ranks
            .iter()
            .zip(part)
            .map(|(rank, k)| Self::shape_unrank_unchecked(rank, k))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(children, shape_rank.clone(), None))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use itertools::Itertools;

    use super::*;

    /// Generates all unlabelled trees with `n` leaves in enumeration order.
    ///
    /// For each partition of `n`, the groups of equal parts are filled with
    /// combinations with replacement of the smaller trees, and the cartesian
    /// product of the groups is taken.
    pub(crate) fn all_unlabelled_trees(n: usize) -> Vec<RankTree> {
        if n == 0 {
            return vec![];
        }
        if n == 1 {
            return vec![RankTree::new_leaf()];
        }

        let mut trees = vec![];
        for part in partitions(n) {
            for children in all_subtree_pairings(&group_partition(&part)) {
                trees.push(RankTree::new(children));
            }
        }
        trees
    }

    fn all_subtree_pairings(groups: &[&[usize]]) -> Vec<Vec<RankTree>> {
        let Some((g, rest)) = groups.split_first() else {
            return vec![vec![]];
        };

        let mut pairings = vec![];
        for first in all_unlabelled_trees(g[0])
            .into_iter()
            .combinations_with_replacement(g.len())
        {
            for tail in all_subtree_pairings(rest) {
                pairings.push(first.iter().cloned().chain(tail).collect());
            }
        }
        pairings
    }

    #[test]
    fn num_shapes_matches_enumeration() {
        for n in 0..11 {
            assert_eq!(
                BigUint::from(all_unlabelled_trees(n).len()),
                num_shapes(n),
                "n = {n}"
            );
        }
    }

    #[test]
    fn num_shapes_sequence() {
        let expected = [0u32, 1, 1, 2, 5, 12, 33, 90, 261, 766, 2312];
        for (n, count) in expected.iter().enumerate() {
            assert_eq!(num_shapes(n), BigUint::from(*count));
        }
    }

    #[test]
    fn num_shapes_large() {
        // Far beyond u64, computed without enumerating anything
        assert!(num_shapes(45).bits() > 64);
    }

    #[test]
    fn tree_pairings() {
        assert_eq!(num_tree_pairings(&[1, 1, 1, 1]), BigUint::one());
        assert_eq!(num_tree_pairings(&[1, 3]), BigUint::from(2u32));
        // Two subtrees out of the 5 shapes with 4 leaves
        assert_eq!(num_tree_pairings(&[4, 4]), BigUint::from(15u32));
        assert_eq!(num_tree_pairings(&[]), BigUint::one());
    }

    #[test]
    fn shape_rank() {
        for n in 0..10 {
            for (rank, tree) in all_unlabelled_trees(n).iter().enumerate() {
                assert_eq!(tree.shape_rank(), &BigUint::from(rank), "n = {n}");
            }
        }
    }

    #[test]
    fn shape_unrank() {
        for n in 0..8 {
            for (rank, tree) in all_unlabelled_trees(n).iter().enumerate() {
                let rank = BigUint::from(rank);
                let unranked = RankTree::shape_unrank(&rank, n).unwrap();
                assert!(tree.shape_equal(&unranked));
                assert_eq!(unranked.shape_rank(), &rank);
                assert!(unranked.is_canonical());
            }
        }
    }

    #[test]
    fn shape_unrank_recomputes_to_same_rank() {
        for n in 1..12 {
            let count = num_shapes(n);
            let mut rank = BigUint::zero();
            while rank < count {
                let tree = RankTree::shape_unrank(&rank, n).unwrap();
                // Rebuild from scratch so the rank is recomputed bottom-up
                let rebuilt: RankTree = tree.clone().canonicalize();
                assert_eq!(rebuilt.shape_rank(), &rank);
                assert_eq!(tree.num_leaves(), n);
                rank += 1u32;
            }
        }
    }

    #[test]
    fn shape_unrank_out_of_range() {
        assert!(matches!(
            RankTree::shape_unrank(&BigUint::zero(), 0),
            Err(RankError::InvalidArgument(_))
        ));
        assert!(matches!(
            RankTree::shape_unrank(&num_shapes(6), 6),
            Err(RankError::InvalidArgument(_))
        ));
    }

    #[test]
    fn last_shape_is_symmetrical() {
        for n in (2..18).step_by(2) {
            let last = num_shapes(n) - 1u32;
            let tree = RankTree::shape_unrank(&last, n).unwrap();
            assert!(tree.is_symmetrical(), "n = {n}");
            assert_eq!(tree.leaf_partition(), vec![n / 2, n / 2]);
        }
    }
}
