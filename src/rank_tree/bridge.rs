//! Conversion between [`RankTree`] values and [`Tree`] structs.

use tracing::debug;

use super::{Rank, RankTree};
use crate::errors::RankError;
use crate::tree::{NodeId, TableCollection, Tree, NODE_IS_SAMPLE};

impl RankTree {
    /// Reads the topology of a tree with a single root. Each leaf is labelled
    /// with its node id and the label ranks are computed.
    /// ```
    /// use ranktree::rank_tree::RankTree;
    /// use ranktree::tree::{TableCollection, NODE_IS_SAMPLE};
    ///
    /// let mut tables = TableCollection::new(1.0);
    /// for _ in 0..3 {
    ///     tables.add_node(NODE_IS_SAMPLE, 0.0);
    /// }
    /// let parent = tables.add_node(0, 1.0);
    /// let root = tables.add_node(0, 2.0);
    /// tables.add_edge(0.0, 1.0, parent, 0).unwrap();
    /// tables.add_edge(0.0, 1.0, parent, 2).unwrap();
    /// tables.add_edge(0.0, 1.0, root, parent).unwrap();
    /// tables.add_edge(0.0, 1.0, root, 1).unwrap();
    /// tables.sort();
    ///
    /// let tree = RankTree::from_tree(&tables.tree().unwrap()).unwrap();
    /// assert_eq!(tree.to_string(), "(1,(0,2))");
    /// ```
    pub fn from_tree(tree: &Tree) -> Result<Self, RankError> {
        let roots = tree.roots();
        let root = match roots.as_slice() {
            [] => return Err(RankError::IsEmpty),
            [root] => *root,
            _ => return Err(RankError::MultipleRoots(roots.len())),
        };

        debug!(root, nodes = tree.size(), "Reading tree topology");
        Self::from_tree_node(tree, root)?.with_label_ranks()
    }

    fn from_tree_node(tree: &Tree, id: NodeId) -> Result<Self, RankError> {
        let children = tree.children(&id)?;
        match children.len() {
            0 => Ok(RankTree::new_labelled(id)),
            1 => Err(RankError::UnaryNode(id)),
            _ => {
                let children = children
                    .iter()
                    .map(|&child| Self::from_tree_node(tree, child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RankTree::canonical(children))
            }
        }
    }

    /// Writes this tree to a new [`Tree`]. Leaves become sample nodes at
    /// time 0 whose ids are their labels, internal nodes are placed one time
    /// unit above their oldest child.
    pub fn to_tree(&self) -> Result<Tree, RankError> {
        let n = self.num_leaves;
        let mut tables = TableCollection::new(1.0);
        for _ in 0..n {
            tables.add_node(NODE_IS_SAMPLE, 0.0);
        }
        self.add_to_tables(&mut tables, n)?;

        // Internal nodes were added children first
        tables.sort();
        debug!(
            leaves = n,
            nodes = tables.nodes().len(),
            edges = tables.edges().len(),
            "Writing tree topology"
        );

        Ok(tables.tree()?)
    }

    fn add_to_tables(&self, tables: &mut TableCollection, n: usize) -> Result<NodeId, RankError> {
        if self.is_leaf() {
            return match self.label() {
                Some(label) if label < n => Ok(label),
                Some(label) => Err(RankError::invalid(format!(
                    "leaf label {label} is out of range for a tree with {n} leaves"
                ))),
                None => Err(RankError::invalid("all the leaves must be labelled")),
            };
        }

        let child_ids = self
            .children
            .iter()
            .map(|child| child.add_to_tables(tables, n))
            .collect::<Result<Vec<_>, _>>()?;

        let max_child_time = child_ids
            .iter()
            .map(|&id| tables.nodes()[id].time)
            .fold(0.0, f64::max);
        let parent = tables.add_node(0, max_child_time + 1.0);
        for child in child_ids {
            tables.add_edge(0.0, 1.0, parent, child)?;
        }

        Ok(parent)
    }
}

impl Tree {
    /// Shape rank and label rank of the tree
    /// ```
    /// use num_bigint::BigUint;
    /// use ranktree::rank_tree::Rank;
    /// use ranktree::tree::Tree;
    ///
    /// let tree = Tree::unrank(&Rank::new(1u32, 2u32), 3).unwrap();
    /// assert_eq!(tree.to_newick().unwrap(), "(2,(0,1));");
    /// assert_eq!(tree.rank().unwrap(), Rank::new(1u32, 2u32));
    /// ```
    pub fn rank(&self) -> Result<Rank, RankError> {
        RankTree::from_tree(self)?.rank()
    }

    /// Generates the tree with `n` leaves and the given rank
    pub fn unrank(rank: &Rank, n: usize) -> Result<Self, RankError> {
        RankTree::unrank(rank, n)?.to_tree()
    }
}
