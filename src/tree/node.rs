use std::fmt::{Debug, Display};

use super::{NodeId, Time};

/// Flag marking a node as a sample, i.e. a leaf that is part of the tree
/// even when it has no edges.
pub const NODE_IS_SAMPLE: u32 = 1;

#[derive(Clone, PartialEq)]
/// A node of the Tree
pub struct Node {
    /// Index of the node
    pub id: NodeId,
    /// Time of the node, samples are at time 0 and parents are older than their children
    pub time: Time,
    /// Bit flags of the node, see [`NODE_IS_SAMPLE`]
    pub flags: u32,
    /// Index of the parent node
    pub parent: Option<NodeId>,
    /// Indices of child nodes
    pub children: Vec<NodeId>,
}

impl Node {
    /// Creates a new node with the given flags and time
    pub fn new(flags: u32, time: Time) -> Self {
        Self {
            id: 0,
            time,
            flags,
            parent: None,
            children: vec![],
        }
    }

    /// Creates a new sample node at time 0
    pub fn new_sample() -> Self {
        Self::new(NODE_IS_SAMPLE, 0.0)
    }

    /// Sets the internal Node id
    pub fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    /// Set the parent node
    pub fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    /// Adds a child to the node
    /// ```
    /// use ranktree::tree::Node;
    ///
    /// let mut parent = Node::new(0, 1.0);
    /// parent.id = 2;
    /// let mut child = Node::new_sample();
    ///
    /// child.set_parent(parent.id);
    /// parent.add_child(child.id);
    ///
    /// assert!(!parent.is_tip());
    /// assert!(!child.is_root());
    /// ```
    pub fn add_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Check if the node is a tip node
    pub fn is_tip(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if the node is a root node
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if the node is flagged as a sample
    pub fn is_sample(&self) -> bool {
        self.flags & NODE_IS_SAMPLE != 0
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sample() {
            write!(f, "{} (t={})", self.id, self.time)
        } else {
            write!(f, "(t={})", self.time)
        }
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Id[{}] Time[{}] Flags[{}] Parent[{:?}] Children({:?})",
            self.id, self.time, self.flags, self.parent, self.children,
        )
    }
}
