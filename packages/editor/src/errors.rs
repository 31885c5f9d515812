//! Error types for the editor

use crate::node::NodeId;
use thiserror::Error;

/// A tree that breaks the outline's structural invariants
///
/// Reported when a document is loaded; the editor never repairs such a tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    #[error("Root node not found: {0}")]
    MissingRoot(NodeId),

    #[error("Node stored under key {key} has id {id}")]
    KeyMismatch { key: NodeId, id: NodeId },

    #[error("Node {parent} references missing child {child}")]
    DanglingChild { parent: NodeId, child: NodeId },

    #[error("Node {parent} lists child {child} more than once")]
    DuplicateChild { parent: NodeId, child: NodeId },

    #[error("Node {child} is claimed by both {first} and {second}")]
    MultipleParents {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },

    #[error("Root node is listed as a child of {parent}")]
    RootHasParent { parent: NodeId },

    #[error("Cycle detected through node {node}")]
    Cycle { node: NodeId },

    #[error("Node {node} is not reachable from the root")]
    Orphan { node: NodeId },

    #[error("Ancestor index is out of date with the node store")]
    StaleAncestorIndex,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid outline: {0}")]
    Structure(#[from] StructureError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown status '{0}' (expected unchecked, done or failed)")]
pub struct UnknownStatus(pub String);
