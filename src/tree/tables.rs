use super::{Node, NodeId, Time, Tree, TreeError};

/// A row of the node table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRow {
    /// Bit flags, see [`NODE_IS_SAMPLE`](super::NODE_IS_SAMPLE)
    pub flags: u32,
    /// Time of the node
    pub time: Time,
}

/// A row of the edge table, linking `parent` to `child` over `[left, right)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRow {
    pub left: f64,
    pub right: f64,
    pub parent: NodeId,
    pub child: NodeId,
}

/// Node and edge tables describing a tree along a sequence.
///
/// Node ids are row indices in the node table.
/// ```
/// use ranktree::tree::{TableCollection, NODE_IS_SAMPLE};
///
/// let mut tables = TableCollection::new(1.0);
/// let a = tables.add_node(NODE_IS_SAMPLE, 0.0);
/// let b = tables.add_node(NODE_IS_SAMPLE, 0.0);
/// let root = tables.add_node(0, 1.0);
/// tables.add_edge(0.0, 1.0, root, a).unwrap();
/// tables.add_edge(0.0, 1.0, root, b).unwrap();
/// tables.sort();
///
/// let tree = tables.tree().unwrap();
/// assert_eq!(tree.roots(), vec![root]);
/// assert_eq!(tree.to_newick().unwrap(), "(0,1);");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableCollection {
    sequence_length: f64,
    nodes: Vec<NodeRow>,
    edges: Vec<EdgeRow>,
}

impl TableCollection {
    /// Creates empty tables for a sequence of the given length
    pub fn new(sequence_length: f64) -> Self {
        Self {
            sequence_length,
            nodes: vec![],
            edges: vec![],
        }
    }

    pub fn sequence_length(&self) -> f64 {
        self.sequence_length
    }

    pub fn nodes(&self) -> &[NodeRow] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRow] {
        &self.edges
    }

    /// Adds a row to the node table and returns its id
    pub fn add_node(&mut self, flags: u32, time: Time) -> NodeId {
        self.nodes.push(NodeRow { flags, time });
        self.nodes.len() - 1
    }

    /// Adds a row to the edge table and returns its index
    pub fn add_edge(
        &mut self,
        left: f64,
        right: f64,
        parent: NodeId,
        child: NodeId,
    ) -> Result<usize, TreeError> {
        for id in [parent, child] {
            if id >= self.nodes.len() {
                return Err(TreeError::NodeNotFound(id));
            }
        }
        if !(0.0 <= left && left < right && right <= self.sequence_length) {
            return Err(TreeError::EdgeOutOfBounds { left, right });
        }

        self.edges.push(EdgeRow {
            left,
            right,
            parent,
            child,
        });
        Ok(self.edges.len() - 1)
    }

    /// Sorts the edges by parent time, then parent id, child id and left coordinate.
    pub fn sort(&mut self) {
        let nodes = &self.nodes;
        self.edges.sort_by(|e1, e2| {
            nodes[e1.parent]
                .time
                .total_cmp(&nodes[e2.parent].time)
                .then(e1.parent.cmp(&e2.parent))
                .then(e1.child.cmp(&e2.child))
                .then(e1.left.total_cmp(&e2.left))
        });
    }

    /// Builds the tree at the start of the sequence.
    ///
    /// Every node of the table is added to the tree, the ones that have
    /// no edge and are not samples are not part of any root's subtree.
    pub fn tree(&self) -> Result<Tree, TreeError> {
        let mut tree = Tree::new();
        for row in self.nodes.iter() {
            tree.add(Node::new(row.flags, row.time));
        }

        for edge in self.edges.iter().filter(|e| e.left <= 0.0 && 0.0 < e.right) {
            let parent_time = self.nodes[edge.parent].time;
            let child_time = self.nodes[edge.child].time;
            if parent_time <= child_time {
                return Err(TreeError::TimeOrder {
                    parent: edge.parent,
                    child: edge.child,
                });
            }
            tree.add_edge(edge.parent, edge.child)?;
        }

        Ok(tree)
    }
}
