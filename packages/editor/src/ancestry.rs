//! # Ancestor Index
//!
//! Derived cache mapping every node reachable from the root to its ancestor
//! chain, ordered root → parent. The root maps to an empty chain.
//!
//! The index is always rebuilt from scratch by a single traversal. It never
//! holds anything that cannot be re-derived from the [`NodeStore`], so two
//! indexes built from the same tree compare equal.

use std::collections::HashMap;
use tracing::instrument;

use crate::node::NodeId;
use crate::store::NodeStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorIndex {
    paths: HashMap<NodeId, Vec<NodeId>>,
}

impl AncestorIndex {
    /// Build the index by depth-first traversal from `root_id`
    ///
    /// Ids that are not reachable from the root are absent. A node reached a
    /// second time (only possible in a malformed tree) is not expanded again.
    #[instrument(level = "debug", skip_all, fields(root = %root_id, nodes = nodes.len()))]
    pub fn rebuild(root_id: &NodeId, nodes: &NodeStore) -> Self {
        let mut paths = HashMap::with_capacity(nodes.len());
        if !nodes.contains(root_id) {
            return Self { paths };
        }

        paths.insert(root_id.clone(), Vec::new());
        let mut stack = vec![root_id.clone()];

        while let Some(id) = stack.pop() {
            let mut child_path = paths[&id].clone();
            child_path.push(id.clone());

            for child in nodes.children(&id) {
                if paths.contains_key(child) || !nodes.contains(child) {
                    continue;
                }
                paths.insert(child.clone(), child_path.clone());
                stack.push(child.clone());
            }
        }

        Self { paths }
    }

    /// Ancestors of `id` from the root down to its parent
    pub fn ancestors(&self, id: &NodeId) -> Option<&[NodeId]> {
        self.paths.get(id).map(Vec::as_slice)
    }

    /// Parent of `id`; `None` for the root or unindexed ids
    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.paths.get(id).and_then(|path| path.last())
    }

    pub fn depth(&self, id: &NodeId) -> Option<usize> {
        self.paths.get(id).map(Vec::len)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.paths.contains_key(id)
    }

    /// True iff `ancestor_id` is a strict ancestor of `candidate_id`
    pub fn is_descendant(&self, candidate_id: &NodeId, ancestor_id: &NodeId) -> bool {
        self.paths
            .get(candidate_id)
            .is_some_and(|path| path.contains(ancestor_id))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn sample() -> NodeStore {
        [
            Node::task("root").with_children(["a", "b"]),
            Node::task("a").with_children(["a1", "a2"]),
            Node::task("a1").with_children(["a1x"]),
            Node::task("a1x"),
            Node::task("a2"),
            Node::task("b"),
            Node::task("stray"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_paths_run_root_to_parent() {
        let index = AncestorIndex::rebuild(&id("root"), &sample());

        assert_eq!(index.ancestors(&id("root")), Some(&[][..]));
        assert_eq!(index.ancestors(&id("a1x")), Some(&[id("root"), id("a"), id("a1")][..]));
        assert_eq!(index.parent(&id("b")), Some(&id("root")));
        assert_eq!(index.parent(&id("root")), None);
        assert_eq!(index.depth(&id("a2")), Some(2));
    }

    #[test]
    fn test_unreachable_nodes_are_absent() {
        let index = AncestorIndex::rebuild(&id("root"), &sample());
        assert!(!index.contains(&id("stray")));
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn test_is_descendant() {
        let index = AncestorIndex::rebuild(&id("root"), &sample());

        assert!(index.is_descendant(&id("a1x"), &id("a")));
        assert!(index.is_descendant(&id("b"), &id("root")));
        assert!(!index.is_descendant(&id("a"), &id("a")));
        assert!(!index.is_descendant(&id("b"), &id("a")));
        assert!(!index.is_descendant(&id("stray"), &id("root")));
    }

    #[test]
    fn test_missing_root_gives_empty_index() {
        let index = AncestorIndex::rebuild(&id("nope"), &sample());
        assert!(index.is_empty());
    }

    #[test]
    fn test_rebuild_terminates_on_cycle() {
        let store: NodeStore = [
            Node::task("root").with_children(["a"]),
            Node::task("a").with_children(["root"]),
        ]
        .into_iter()
        .collect();

        let index = AncestorIndex::rebuild(&id("root"), &store);
        assert_eq!(index.len(), 2);
    }
}
