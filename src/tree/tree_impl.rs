use itertools::Itertools;
use ptree::{print_tree, TreeBuilder};

use thiserror::Error;

use super::node::Node;
use super::NodeId;

/// Errors that can occur when building, reading and writing [`Tree`] structs.
#[derive(Error, Debug)]
pub enum TreeError {
    /// There is no node with this id
    #[error("There is no node with index: {0}")]
    NodeNotFound(NodeId),
    /// The edge interval is empty or outside of the sequence
    #[error("Edge interval [{left}, {right}) is empty or out of the sequence bounds.")]
    EdgeOutOfBounds {
        /// Left coordinate of the edge
        left: f64,
        /// Right coordinate of the edge
        right: f64,
    },
    /// A node was given a second parent
    #[error("Node {0} already has a parent.")]
    MultipleParents(NodeId),
    /// A parent is not strictly older than its child
    #[error("Parent node {parent} must be older than its child {child}.")]
    TimeOrder {
        /// Id of the parent node
        parent: NodeId,
        /// Id of the child node
        child: NodeId,
    },
    /// The tree has no root
    #[error("This tree is empty.")]
    IsEmpty,
    /// There was an error writing the tree
    #[error("Error writing tree")]
    IoError(#[from] std::io::Error),
}

/// A tree where each node knows its parent and its children
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

/// Base methods to add and get [`Node`] objects to and from the [`Tree`].
impl Tree {
    /// Create a new empty Tree object
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a new node to the tree.
    pub fn add(&mut self, node: Node) -> NodeId {
        let idx = self.nodes.len();
        let mut node = node;
        node.id = idx;
        self.nodes.push(node);

        idx
    }

    /// Add a child to one of the tree's nodes.
    ///
    /// # Example
    /// ```
    /// use ranktree::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root_id = tree.add(Node::new(0, 1.0));
    ///
    /// let left = tree.add_child(Node::new_sample(), root_id).unwrap();
    /// let right = tree.add_child(Node::new_sample(), root_id).unwrap();
    ///
    /// assert_eq!(tree.children(&root_id).unwrap(), &[left, right]);
    /// assert_eq!(tree.get(&left).unwrap().parent, Some(root_id));
    /// ```
    pub fn add_child(&mut self, node: Node, parent: NodeId) -> Result<NodeId, TreeError> {
        if parent >= self.nodes.len() {
            return Err(TreeError::NodeNotFound(parent));
        }

        let id = self.add(node);
        self.add_edge(parent, id)?;

        Ok(id)
    }

    /// Links two nodes of the tree
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.get(&parent)?;
        let node = self.get_mut(&child)?;
        if node.parent.is_some() {
            return Err(TreeError::MultipleParents(child));
        }
        node.set_parent(parent);
        self.get_mut(&parent)?.add_child(child);

        Ok(())
    }

    /// Get a reference to a specific Node of the tree
    pub fn get(&self, id: &NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(*id).ok_or(TreeError::NodeNotFound(*id))
    }

    /// Get a mutable reference to a specific Node of the tree
    pub fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(*id).ok_or(TreeError::NodeNotFound(*id))
    }

    /// Children of a node, in the order they were added
    pub fn children(&self, id: &NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.get(id)?.children)
    }

    /// Roots of the tree: parentless nodes that are samples or have children.
    /// ```
    /// use ranktree::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// tree.add(Node::new_sample());
    /// tree.add(Node::new_sample());
    /// tree.add(Node::new(0, 1.0));
    ///
    /// assert_eq!(tree.roots(), vec![0, 1]);
    /// ```
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_root() && (node.is_sample() || !node.is_tip()))
            .map(|node| node.id)
            .collect()
    }

    /// Gets the first root of the tree
    pub fn root(&self) -> Result<NodeId, TreeError> {
        self.roots().first().copied().ok_or(TreeError::IsEmpty)
    }

    /// Check if the node has no children
    pub fn is_leaf(&self, id: &NodeId) -> Result<bool, TreeError> {
        Ok(self.get(id)?.is_tip())
    }

    /// Check if the node is flagged as a sample
    pub fn is_sample(&self, id: &NodeId) -> Result<bool, TreeError> {
        Ok(self.get(id)?.is_sample())
    }

    /// Ids of the sample nodes
    pub fn samples(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_sample())
            .map(|node| node.id)
            .collect()
    }
}

impl Tree {
    // ###################
    // # TREE TRAVERSALS #
    // ###################

    /// Returns a vector containing node ids in preorder
    /// ```
    /// use ranktree::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.add(Node::new(0, 2.0));
    /// let inner = tree.add_child(Node::new(0, 1.0), root).unwrap();
    /// let a = tree.add_child(Node::new_sample(), inner).unwrap();
    /// let b = tree.add_child(Node::new_sample(), inner).unwrap();
    /// let c = tree.add_child(Node::new_sample(), root).unwrap();
    ///
    /// assert_eq!(tree.preorder(&root).unwrap(), vec![root, inner, a, b, c]);
    /// ```
    pub fn preorder(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![*root];
        for child in self.get(root)?.children.iter() {
            indices.extend(self.preorder(child)?)
        }

        Ok(indices)
    }

    /// Returns a vector containing node ids in postorder
    /// ```
    /// use ranktree::tree::{Tree, Node};
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.add(Node::new(0, 2.0));
    /// let inner = tree.add_child(Node::new(0, 1.0), root).unwrap();
    /// let a = tree.add_child(Node::new_sample(), inner).unwrap();
    /// let b = tree.add_child(Node::new_sample(), inner).unwrap();
    /// let c = tree.add_child(Node::new_sample(), root).unwrap();
    ///
    /// assert_eq!(tree.postorder(&root).unwrap(), vec![a, b, inner, c, root]);
    /// ```
    pub fn postorder(&self, root: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut indices = vec![];
        for child in self.get(root)?.children.iter() {
            indices.extend(self.postorder(child)?)
        }
        indices.push(*root);

        Ok(indices)
    }
}

impl Tree {
    /// Returns the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves under the roots of the tree
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|&node| node.is_tip() && (node.is_sample() || !node.is_root()))
            .count()
    }
}

impl Tree {
    // ##################
    // # WRITING TREES  #
    // ##################

    fn to_newick_impl(&self, root: &NodeId) -> Result<String, TreeError> {
        let node = self.get(root)?;
        if node.is_tip() {
            return Ok(format!("{root}"));
        }

        let children: Vec<String> = node
            .children
            .iter()
            .map(|child| self.to_newick_impl(child))
            .collect::<Result<_, _>>()?;

        Ok(format!("({})", children.iter().join(",")))
    }

    /// Writes the topology of the tree in newick format, with leaves named by their id
    pub fn to_newick(&self) -> Result<String, TreeError> {
        let root = self.root()?;
        Ok(self.to_newick_impl(&root)? + ";")
    }

    /// Recursive function that adds node representation to a printable tree builder
    fn print_nodes(&self, root_idx: &NodeId, output_tree: &mut TreeBuilder) -> Result<(), TreeError> {
        let root = self.get(root_idx)?;
        let label = format!("{root}");

        if root.children.is_empty() {
            output_tree.add_empty_child(label);
        } else {
            output_tree.begin_child(label);
            for child_idx in root.children.iter() {
                self.print_nodes(child_idx, output_tree)?;
            }
            output_tree.end_child();
        }

        Ok(())
    }

    /// Print the tree to the console
    pub fn print(&self) -> Result<(), TreeError> {
        let root = self.root()?;
        let mut builder = TreeBuilder::new(format!("{}", self.get(&root)?));
        for child_idx in self.get(&root)?.children.iter() {
            self.print_nodes(child_idx, &mut builder)?;
        }
        let tree = builder.build();
        print_tree(&tree)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds ((0,1),2) with samples first then internal nodes
    fn build_simple_tree() -> Result<Tree, TreeError> {
        let mut tree = Tree::new();
        for _ in 0..3 {
            tree.add(Node::new_sample());
        }
        let inner = tree.add(Node::new(0, 1.0)); // 3
        let root = tree.add(Node::new(0, 2.0)); // 4
        tree.add_edge(inner, 0)?;
        tree.add_edge(inner, 1)?;
        tree.add_edge(root, inner)?;
        tree.add_edge(root, 2)?;
        Ok(tree)
    }

    #[test]
    fn simple_tree() {
        let tree = build_simple_tree().unwrap();
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.roots(), vec![4]);
        assert_eq!(tree.root().unwrap(), 4);
        assert_eq!(tree.samples(), vec![0, 1, 2]);
        assert!(tree.is_leaf(&2).unwrap());
        assert!(!tree.is_leaf(&3).unwrap());
        assert!(tree.is_sample(&0).unwrap());
        assert!(!tree.is_sample(&4).unwrap());
        assert_eq!(tree.children(&4).unwrap(), &[3, 2]);
    }

    #[test]
    fn traversals() {
        let tree = build_simple_tree().unwrap();
        assert_eq!(tree.preorder(&4).unwrap(), vec![4, 3, 0, 1, 2]);
        assert_eq!(tree.postorder(&4).unwrap(), vec![0, 1, 3, 2, 4]);
        assert!(matches!(
            tree.preorder(&10),
            Err(TreeError::NodeNotFound(10))
        ));
    }

    #[test]
    fn newick() {
        let tree = build_simple_tree().unwrap();
        assert_eq!(tree.to_newick().unwrap(), "((0,1),2);");

        let mut single = Tree::new();
        single.add(Node::new_sample());
        assert_eq!(single.to_newick().unwrap(), "0;");
    }

    #[test]
    fn structure_errors() {
        let mut tree = build_simple_tree().unwrap();
        assert!(matches!(
            tree.add_edge(4, 0),
            Err(TreeError::MultipleParents(0))
        ));
        assert!(matches!(
            tree.add_child(Node::new_sample(), 12),
            Err(TreeError::NodeNotFound(12))
        ));

        let empty = Tree::new();
        assert!(empty.roots().is_empty());
        assert!(matches!(empty.root(), Err(TreeError::IsEmpty)));
        assert!(matches!(empty.to_newick(), Err(TreeError::IsEmpty)));
    }
}
