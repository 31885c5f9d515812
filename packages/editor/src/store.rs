//! # Node Store
//!
//! Authoritative mapping of node id → node record.
//!
//! Every mutating method checks its preconditions before touching anything,
//! so a call either fully applies (returns `true` / `Some`) or leaves the
//! store exactly as it was.

use std::collections::HashMap;

use crate::node::{Node, NodeId, Status};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing map without validating it
    ///
    /// Use [`crate::validate::validate`] (or [`crate::Document::load`]) before
    /// relying on tree invariants.
    pub fn from_map(nodes: HashMap<NodeId, Node>) -> Self {
        Self { nodes }
    }

    pub fn into_map(self) -> HashMap<NodeId, Node> {
        self.nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Children of `id`, or an empty slice if the node is missing
    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of `child` within `parent`'s children
    pub fn position(&self, parent: &NodeId, child: &NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| c == child)
    }

    /// Replace a node's content. Returns false if the node is missing.
    pub fn set_content(&mut self, id: &NodeId, text: impl Into<String>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.content = text.into();
                true
            }
            None => false,
        }
    }

    /// Replace a node's status. Returns false if the node is missing.
    pub fn set_status(&mut self, id: &NodeId, status: Status) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.metadata.status = Some(status);
                true
            }
            None => false,
        }
    }

    /// Insert a new leaf node into `parent_id`'s children at `index`
    ///
    /// The index is clamped to the child count. Fails (returning false) if
    /// the id is already taken, the parent is missing, or the node brings its
    /// own children.
    pub fn insert(&mut self, node: Node, parent_id: &NodeId, index: usize) -> bool {
        if self.nodes.contains_key(&node.id) || !node.children.is_empty() {
            return false;
        }
        let Some(parent) = self.nodes.get_mut(parent_id) else {
            return false;
        };

        let index = index.min(parent.children.len());
        parent.children.insert(index, node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Remove a node and all of its transitive descendants
    ///
    /// The node is also detached from whichever node lists it as a child.
    /// Returns the removed records (subtree root first), or `None` if the
    /// node does not exist.
    pub fn remove(&mut self, id: &NodeId) -> Option<Vec<Node>> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        let parent = self
            .nodes
            .values()
            .find(|node| node.children.contains(id))
            .map(|node| node.id.clone());
        if let Some(parent) = parent {
            self.detach(&parent, id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children.iter().rev().cloned());
                removed.push(node);
            }
        }
        Some(removed)
    }

    /// Remove `child` from `parent`'s children, returning its old position
    pub(crate) fn detach(&mut self, parent: &NodeId, child: &NodeId) -> Option<usize> {
        let parent = self.nodes.get_mut(parent)?;
        let pos = parent.children.iter().position(|c| c == child)?;
        parent.children.remove(pos);
        Some(pos)
    }

    /// Insert an existing node id into `parent`'s children (index clamped)
    pub(crate) fn attach(&mut self, parent: &NodeId, child: NodeId, index: usize) -> bool {
        match self.nodes.get_mut(parent) {
            Some(parent) => {
                let index = index.min(parent.children.len());
                parent.children.insert(index, child);
                true
            }
            None => false,
        }
    }

    pub(crate) fn swap_children(&mut self, parent: &NodeId, a: usize, b: usize) -> bool {
        match self.nodes.get_mut(parent) {
            Some(parent) if a < parent.children.len() && b < parent.children.len() => {
                parent.children.swap(a, b);
                true
            }
            _ => false,
        }
    }
}

impl FromIterator<Node> for NodeStore {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().map(|node| (node.id.clone(), node)).collect(),
        }
    }
}
