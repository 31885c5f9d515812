//! # Structural Validation
//!
//! Checks a node map against the outline invariants before it is accepted:
//!
//! - every child reference resolves
//! - no node lists the same child twice
//! - every node has at most one parent, and the root has none
//! - every node is reachable from the root (so there are no cycles)
//!
//! Violations are reported, never repaired. Nodes are visited in id order so
//! the same broken tree always yields the same error.

use std::collections::{HashMap, HashSet};

use crate::errors::StructureError;
use crate::node::NodeId;
use crate::store::NodeStore;

pub fn validate(root_id: &NodeId, nodes: &NodeStore) -> Result<(), StructureError> {
    if !nodes.contains(root_id) {
        return Err(StructureError::MissingRoot(root_id.clone()));
    }

    let mut sorted: Vec<_> = nodes.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut parents: HashMap<&NodeId, &NodeId> = HashMap::with_capacity(nodes.len());
    for (key, node) in &sorted {
        if *key != &node.id {
            return Err(StructureError::KeyMismatch {
                key: (*key).clone(),
                id: node.id.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(node.children.len());
        for child in &node.children {
            if !seen.insert(child) {
                return Err(StructureError::DuplicateChild {
                    parent: node.id.clone(),
                    child: child.clone(),
                });
            }
            if !nodes.contains(child) {
                return Err(StructureError::DanglingChild {
                    parent: node.id.clone(),
                    child: child.clone(),
                });
            }
            if child == root_id {
                return Err(StructureError::RootHasParent {
                    parent: node.id.clone(),
                });
            }
            if let Some(first) = parents.insert(child, &node.id) {
                return Err(StructureError::MultipleParents {
                    child: child.clone(),
                    first: first.clone(),
                    second: node.id.clone(),
                });
            }
        }
    }

    let reachable = reachable_from(root_id, nodes);
    if reachable.len() == nodes.len() {
        return Ok(());
    }

    // Every node now has at most one parent, so following parent links from
    // an unreachable node either loops (a cycle) or stops at a parentless
    // node that is not the root (an orphaned subtree).
    for (id, _) in &sorted {
        if reachable.contains(*id) {
            continue;
        }

        let mut walked = HashSet::new();
        let mut current = *id;
        loop {
            if !walked.insert(current) {
                return Err(StructureError::Cycle {
                    node: current.clone(),
                });
            }
            match parents.get(current) {
                Some(&parent) => current = parent,
                None => {
                    return Err(StructureError::Orphan {
                        node: current.clone(),
                    })
                }
            }
        }
    }

    Ok(())
}

fn reachable_from<'a>(root_id: &'a NodeId, nodes: &'a NodeStore) -> HashSet<&'a NodeId> {
    let mut reached = HashSet::with_capacity(nodes.len());
    let mut stack = vec![root_id];

    while let Some(id) = stack.pop() {
        if reached.insert(id) {
            stack.extend(nodes.children(id).iter());
        }
    }

    reached
}
