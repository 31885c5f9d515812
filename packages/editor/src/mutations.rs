//! # Outline Mutations
//!
//! Serializable descriptions of every edit a UI can request. Hotkeys, menu
//! actions, drag-and-drop and the CLI all build a [`Mutation`] and hand it to
//! [`crate::Document::apply`].
//!
//! ## Mutation Semantics
//!
//! ### Impossible edits
//! - Targeting a missing node, or a move with no valid destination, is a
//!   no-op reported as [`MutationOutcome::NoOp`], never an error
//! - UIs can therefore fire hotkeys without pre-checking tree shape
//!
//! ### Structural edits
//! - Change some node's `children`; the ancestor index is rebuilt as part of
//!   the same call
//! - Never create a cycle: a node cannot move under itself or a descendant
//!
//! ### Content / status edits
//! - Atomic replacement of one field, no index rebuild

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, Status};

/// Semantic edit intents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert an empty task right after the node and select it
    CreateSiblingAfter { node_id: NodeId },

    /// Remove the node and its whole subtree
    DeleteNode { node_id: NodeId },

    /// Become the last child of the preceding sibling
    Indent { node_id: NodeId },

    /// Become the next sibling of the current parent
    Outdent { node_id: NodeId },

    /// Swap with the previous sibling, or cross into the previous subtree
    MoveUp { node_id: NodeId },

    /// Swap with the next sibling, or cross into the next subtree
    MoveDown { node_id: NodeId },

    /// Re-parent under `new_parent_id` at `index` (clamped)
    MoveTo {
        node_id: NodeId,
        new_parent_id: NodeId,
        index: usize,
    },

    /// Realize a resolved drag-and-drop intent
    Drop { node_id: NodeId, intent: DropIntent },

    /// Replace the node's content text
    UpdateContent { node_id: NodeId, content: String },

    /// Replace the node's status marker
    UpdateStatus { node_id: NodeId, status: Status },
}

/// Where a dragged node should land, relative to a target node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DropIntent {
    /// Immediately before the target, under the target's parent
    Before(NodeId),
    /// Immediately after the target, under the target's parent
    After(NodeId),
    /// As the target's last child
    Into(NodeId),
}

impl DropIntent {
    pub fn target(&self) -> &NodeId {
        match self {
            DropIntent::Before(id) | DropIntent::After(id) | DropIntent::Into(id) => id,
        }
    }
}

impl Mutation {
    /// The node the mutation acts on
    pub fn node_id(&self) -> &NodeId {
        match self {
            Mutation::CreateSiblingAfter { node_id }
            | Mutation::DeleteNode { node_id }
            | Mutation::Indent { node_id }
            | Mutation::Outdent { node_id }
            | Mutation::MoveUp { node_id }
            | Mutation::MoveDown { node_id }
            | Mutation::MoveTo { node_id, .. }
            | Mutation::Drop { node_id, .. }
            | Mutation::UpdateContent { node_id, .. }
            | Mutation::UpdateStatus { node_id, .. } => node_id,
        }
    }

    /// Whether the mutation can change some node's children
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Mutation::UpdateContent { .. } | Mutation::UpdateStatus { .. }
        )
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::CreateSiblingAfter { .. } => "create_sibling_after",
            Mutation::DeleteNode { .. } => "delete_node",
            Mutation::Indent { .. } => "indent",
            Mutation::Outdent { .. } => "outdent",
            Mutation::MoveUp { .. } => "move_up",
            Mutation::MoveDown { .. } => "move_down",
            Mutation::MoveTo { .. } => "move_to",
            Mutation::Drop { .. } => "drop",
            Mutation::UpdateContent { .. } => "update_content",
            Mutation::UpdateStatus { .. } => "update_status",
        }
    }
}

/// Whether an edit changed the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NoOp,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == MutationOutcome::Applied
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub outcome: MutationOutcome,

    /// Document version after the mutation
    pub version: u64,

    /// Id of the node created by [`Mutation::CreateSiblingAfter`]
    pub created: Option<NodeId>,
}
