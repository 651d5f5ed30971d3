//! Bijective ranking and unranking of unordered, leaf-labelled trees.
//!
//! Every tree with `n` leaves, without unary nodes, gets a unique pair of
//! integers `(shape_rank, label_rank)`. Shape ranks enumerate the unlabelled
//! topologies with `n` leaves and label ranks enumerate the distinct
//! labellings of a topology, both densely from 0. Any valid pair can be
//! turned back into its tree, which makes it possible to enumerate, index
//! and sample tree topologies.
//!
//! ```
//! use ranktree::{rank, unrank, Rank};
//!
//! let tree = unrank(&Rank::new(3u32, 5u32), 4).unwrap();
//! assert_eq!(tree.to_newick().unwrap(), "(1,(3,(0,2)));");
//! assert_eq!(rank(&tree).unwrap(), Rank::new(3u32, 5u32));
//! ```

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::Rng;
use tracing::debug;

pub mod combinatorics;
pub mod errors;
pub mod partition;
pub mod rank_tree;
pub mod tree;

pub use errors::RankError;
pub use rank_tree::{num_labellings, num_shapes, Rank, RankTree};

use tree::Tree;

/// Shape rank and label rank of a tree with a single root.
/// Leaves are labelled by their node id.
pub fn rank(tree: &Tree) -> Result<Rank, RankError> {
    let rank = tree.rank()?;
    debug!(%rank, leaves = tree.n_leaves(), "Ranked tree");
    Ok(rank)
}

/// Rank of the unlabelled shape of a tree
pub fn shape_rank(tree: &Tree) -> Result<BigUint, RankError> {
    Ok(RankTree::from_tree(tree)?.shape_rank().clone())
}

/// Rank of the labelling of a tree among all the labellings of its shape
pub fn label_rank(tree: &Tree) -> Result<BigUint, RankError> {
    RankTree::from_tree(tree)?.label_rank()
}

/// Generates the tree with `n` leaves and the given rank
pub fn unrank(rank: &Rank, n: usize) -> Result<Tree, RankError> {
    debug!(%rank, leaves = n, "Unranking tree");
    Tree::unrank(rank, n)
}

/// Generates the tree with `n` leaves with the given shape, labelled `0..n`
/// from left to right.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::shape_unrank;
///
/// let tree = shape_unrank(&BigUint::from(3u32), 4).unwrap();
/// assert_eq!(tree.to_newick().unwrap(), "(0,(1,(2,3)));");
/// ```
pub fn shape_unrank(shape_rank: &BigUint, n: usize) -> Result<Tree, RankError> {
    debug!(%shape_rank, leaves = n, "Unranking shape");
    RankTree::shape_unrank(shape_rank, n)?
        .label_unrank(&BigUint::zero())?
        .to_tree()
}

/// Generates the tree with the same shape as `tree` and the given label rank
pub fn label_unrank(tree: &Tree, label_rank: &BigUint) -> Result<Tree, RankError> {
    RankTree::from_tree(tree)?.label_unrank(label_rank)?.to_tree()
}

/// Draws a tree with `n` leaves labelled `0..n`: the shape is drawn
/// uniformly among all shapes, then the labelling uniformly among the
/// labellings of that shape.
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use ranktree::random_tree;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let tree = random_tree(10, &mut rng).unwrap();
/// assert_eq!(tree.num_leaves(), 10);
/// assert!(tree.is_canonical());
/// ```
pub fn random_tree<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<RankTree, RankError> {
    if n == 0 {
        return Err(RankError::invalid("a tree needs at least one leaf"));
    }

    let shape_rank = rng.gen_biguint_below(&num_shapes(n));
    let shape = RankTree::shape_unrank(&shape_rank, n)?;
    let label_rank = rng.gen_biguint_below(&shape.num_labellings());
    debug!(%shape_rank, %label_rank, leaves = n, "Sampled tree");

    shape.label_unrank(&label_rank)
}
