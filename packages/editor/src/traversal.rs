//! # Flat Traversal
//!
//! Pre-order, children-in-order walk of the outline. This defines the visual
//! top-to-bottom order used by vertical navigation.

use std::collections::HashSet;

use crate::node::{Node, NodeId};
use crate::store::NodeStore;

/// Visitor for walking an outline in visual order
///
/// `visit_node` is called once per node, parents before children. Return
/// `false` to skip the node's children (a collapsed node, for instance).
pub trait Visitor {
    fn visit_node(&mut self, node: &Node, depth: usize) -> bool;
}

/// Walk the tree under `root_id` in pre-order
///
/// A node is never visited twice, so a malformed store cannot make the walk
/// loop; validated documents never hit that guard.
pub fn walk<V: Visitor>(visitor: &mut V, root_id: &NodeId, nodes: &NodeStore) {
    let mut visited = HashSet::with_capacity(nodes.len());
    let mut stack = vec![(root_id, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = nodes.get(id) else {
            continue;
        };
        if !visited.insert(id) {
            continue;
        }
        if visitor.visit_node(node, depth) {
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }
}

/// One row of the flattened outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub id: NodeId,
    pub depth: usize,
}

struct Collect<'a> {
    collapsed: Option<&'a HashSet<NodeId>>,
    entries: Vec<FlatEntry>,
}

impl Visitor for Collect<'_> {
    fn visit_node(&mut self, node: &Node, depth: usize) -> bool {
        self.entries.push(FlatEntry {
            id: node.id.clone(),
            depth,
        });
        self.collapsed
            .map_or(true, |collapsed| !collapsed.contains(&node.id))
    }
}

/// Every node reachable from `root_id`, root first, in visual order
pub fn flatten(root_id: &NodeId, nodes: &NodeStore) -> Vec<NodeId> {
    flatten_entries(root_id, nodes, None)
        .into_iter()
        .map(|entry| entry.id)
        .collect()
}

/// Visual order skipping the descendants of collapsed nodes
///
/// The collapsed nodes themselves stay visible.
pub fn flatten_visible(
    root_id: &NodeId,
    nodes: &NodeStore,
    collapsed: &HashSet<NodeId>,
) -> Vec<NodeId> {
    flatten_entries(root_id, nodes, Some(collapsed))
        .into_iter()
        .map(|entry| entry.id)
        .collect()
}

/// Visual order with the depth of each row
pub fn flatten_entries(
    root_id: &NodeId,
    nodes: &NodeStore,
    collapsed: Option<&HashSet<NodeId>>,
) -> Vec<FlatEntry> {
    let mut collect = Collect {
        collapsed,
        entries: Vec::with_capacity(nodes.len()),
    };
    walk(&mut collect, root_id, nodes);
    collect.entries
}
