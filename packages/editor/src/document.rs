//! # Document Handle
//!
//! A Document owns one consistent snapshot of an outline:
//!
//! - the [`NodeStore`] (authoritative node records)
//! - the [`AncestorIndex`] (derived, rebuilt after every shape change)
//! - the [`Selection`] (selected node, cursor, remembered column)
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Validate → Edit → Snapshot
//!   ↓        ↓        ↓        ↓
//! nodes   errors  Mutations  nodes
//! ```
//!
//! Every operation runs to completion on `&mut self`, so callers never see a
//! half-applied edit. A Document is not internally synchronized; share it
//! between threads behind one lock per document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, trace, warn};

use crate::ancestry::AncestorIndex;
use crate::errors::{EditorError, StructureError};
use crate::id_generator::{document_seed, IdGenerator};
use crate::mutations::{DropIntent, Mutation, MutationOutcome, MutationResult};
use crate::node::{Node, NodeId, Status};
use crate::selection::Selection;
use crate::store::NodeStore;
use crate::traversal::{self, FlatEntry};
use crate::validate::validate;

/// Serializable (nodes, root) pair exchanged with persistence collaborators
///
/// A node key listed twice in the serialized map is rejected rather than
/// letting the later entry win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSnapshot {
    pub root_id: NodeId,
    #[serde(deserialize_with = "unique_nodes")]
    pub nodes: BTreeMap<NodeId, Node>,
}

fn unique_nodes<'de, D>(deserializer: D) -> Result<BTreeMap<NodeId, Node>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, MapAccess, Visitor};
    use std::fmt;

    struct UniqueNodesVisitor;

    impl<'de> Visitor<'de> for UniqueNodesVisitor {
        type Value = BTreeMap<NodeId, Node>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of node id to node")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut nodes = BTreeMap::new();
            while let Some(key) = map.next_key::<NodeId>()? {
                if nodes.contains_key(&key) {
                    return Err(A::Error::custom(format!("duplicate node key {}", key)));
                }
                let node = map.next_value::<Node>()?;
                nodes.insert(key, node);
            }
            Ok(nodes)
        }
    }

    deserializer.deserialize_map(UniqueNodesVisitor)
}

/// Vertical navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Editable outline document
#[derive(Debug, Clone)]
pub struct Document {
    root_id: NodeId,
    nodes: NodeStore,
    ancestors: AncestorIndex,
    selection: Selection,
    ids: IdGenerator,

    /// Increments on each applied edit
    version: u64,
    dirty: bool,
}

impl Document {
    /// Create a document holding only a root node
    pub fn new(root_content: impl Into<String>) -> Self {
        let mut ids = IdGenerator::new("outline");
        let root = Node::task(ids.next_id()).with_content(root_content);
        let root_id = root.id.clone();
        let nodes: NodeStore = std::iter::once(root).collect();
        let ancestors = AncestorIndex::rebuild(&root_id, &nodes);

        Self {
            root_id,
            nodes,
            ancestors,
            selection: Selection::new(),
            ids,
            version: 0,
            dirty: false,
        }
    }

    /// Load a node map, rejecting trees that break structural invariants
    pub fn load(nodes: HashMap<NodeId, Node>, root_id: NodeId) -> Result<Self, StructureError> {
        let nodes = NodeStore::from_map(nodes);
        if let Err(err) = validate(&root_id, &nodes) {
            warn!(root = %root_id, error = %err, "rejected outline");
            return Err(err);
        }

        let ancestors = AncestorIndex::rebuild(&root_id, &nodes);
        info!(root = %root_id, nodes = nodes.len(), "loaded outline");

        Ok(Self {
            ids: IdGenerator::from_seed(document_seed(root_id.as_str())),
            root_id,
            nodes,
            ancestors,
            selection: Selection::new(),
            version: 0,
            dirty: false,
        })
    }

    pub fn from_snapshot(snapshot: OutlineSnapshot) -> Result<Self, StructureError> {
        Self::load(snapshot.nodes.into_iter().collect(), snapshot.root_id)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let snapshot: OutlineSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot)?)
    }

    /// Use `seed` as the prefix for generated node ids
    pub fn with_id_seed(mut self, seed: &str) -> Self {
        self.ids = IdGenerator::new(seed);
        self
    }

    /// Owned copy of the (nodes, root) pair for saving
    pub fn snapshot(&self) -> OutlineSnapshot {
        OutlineSnapshot {
            root_id: self.root_id.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.clone()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn ancestors(&self) -> &AncestorIndex {
        &self.ancestors
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Parent of `id`; `None` for the root and for missing ids
    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.ancestors.parent(id)
    }

    pub fn depth(&self, id: &NodeId) -> Option<usize> {
        self.ancestors.depth(id)
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes.children(id)
    }

    pub fn is_descendant(&self, candidate_id: &NodeId, ancestor_id: &NodeId) -> bool {
        self.ancestors.is_descendant(candidate_id, ancestor_id)
    }

    pub fn flatten(&self) -> Vec<NodeId> {
        traversal::flatten(&self.root_id, &self.nodes)
    }

    pub fn flatten_visible(&self, collapsed: &HashSet<NodeId>) -> Vec<NodeId> {
        traversal::flatten_visible(&self.root_id, &self.nodes, collapsed)
    }

    pub fn flatten_entries(&self, collapsed: Option<&HashSet<NodeId>>) -> Vec<FlatEntry> {
        traversal::flatten_entries(&self.root_id, &self.nodes, collapsed)
    }

    /// Re-check every structural invariant, including index freshness
    pub fn check_invariants(&self) -> Result<(), StructureError> {
        validate(&self.root_id, &self.nodes)?;
        if AncestorIndex::rebuild(&self.root_id, &self.nodes) != self.ancestors {
            return Err(StructureError::StaleAncestorIndex);
        }
        Ok(())
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        let mut created = None;

        let outcome = match mutation {
            Mutation::CreateSiblingAfter { node_id } => {
                created = self.create_sibling_after(&node_id);
                if created.is_some() {
                    MutationOutcome::Applied
                } else {
                    MutationOutcome::NoOp
                }
            }
            Mutation::DeleteNode { node_id } => self.delete_node(&node_id),
            Mutation::Indent { node_id } => self.indent(&node_id),
            Mutation::Outdent { node_id } => self.outdent(&node_id),
            Mutation::MoveUp { node_id } => self.move_up(&node_id),
            Mutation::MoveDown { node_id } => self.move_down(&node_id),
            Mutation::MoveTo {
                node_id,
                new_parent_id,
                index,
            } => self.move_to(&node_id, &new_parent_id, index),
            Mutation::Drop { node_id, intent } => self.drop_node(&node_id, &intent),
            Mutation::UpdateContent { node_id, content } => {
                self.update_content(&node_id, content)
            }
            Mutation::UpdateStatus { node_id, status } => self.update_status(&node_id, status),
        };

        MutationResult {
            outcome,
            version: self.version,
            created,
        }
    }

    // ---------------------------------------------------------------------
    // Structural edits
    // ---------------------------------------------------------------------

    /// Insert an empty task after `current_id` and select it
    ///
    /// Returns the new node's id, or `None` when `current_id` is missing or
    /// is the root.
    pub fn create_sibling_after(&mut self, current_id: &NodeId) -> Option<NodeId> {
        let Some((parent, pos)) = self.locate(current_id) else {
            no_op("create_sibling_after", current_id, "missing or root");
            return None;
        };

        let new_id = self.ids.next_unused(|id| self.nodes.contains(id));
        let mut node = Node::task(new_id.clone());
        node.metadata.created = Some(Utc::now());

        if !self.nodes.insert(node, &parent, pos + 1) {
            no_op("create_sibling_after", current_id, "insert refused");
            return None;
        }
        self.finish_restructure("create_sibling_after", current_id);
        self.selection.select(new_id.clone(), 0);

        Some(new_id)
    }

    /// Remove `id` and its whole subtree
    ///
    /// The selection is left alone; choosing what to select next is up to
    /// the caller. The root cannot be deleted.
    pub fn delete_node(&mut self, id: &NodeId) -> MutationOutcome {
        if id == &self.root_id {
            return no_op("delete_node", id, "root");
        }
        if self.locate(id).is_none() {
            return no_op("delete_node", id, "missing");
        }

        let removed = self.nodes.remove(id).map_or(0, |nodes| nodes.len());
        trace!(node = %id, removed, "removed subtree");

        self.finish_restructure("delete_node", id)
    }

    /// Make `id` the last child of its preceding sibling
    pub fn indent(&mut self, id: &NodeId) -> MutationOutcome {
        let Some((parent, pos)) = self.locate(id) else {
            return no_op("indent", id, "missing");
        };
        if pos == 0 {
            return no_op("indent", id, "first child");
        }

        let new_parent = self.nodes.children(&parent)[pos - 1].clone();
        self.nodes.detach(&parent, id);
        self.nodes.attach(&new_parent, id.clone(), usize::MAX);

        self.finish_restructure("indent", id)
    }

    /// Make `id` the next sibling of its current parent
    pub fn outdent(&mut self, id: &NodeId) -> MutationOutcome {
        let Some((parent, _)) = self.locate(id) else {
            return no_op("outdent", id, "missing");
        };
        let Some((grandparent, parent_pos)) = self.locate(&parent) else {
            return no_op("outdent", id, "top level");
        };

        self.nodes.detach(&parent, id);
        self.nodes.attach(&grandparent, id.clone(), parent_pos + 1);

        self.finish_restructure("outdent", id)
    }

    /// Move `id` one position up in visual order at the same depth
    ///
    /// A first child crosses into the parent's previous sibling, becoming
    /// its last child.
    pub fn move_up(&mut self, id: &NodeId) -> MutationOutcome {
        let Some((parent, pos)) = self.locate(id) else {
            return no_op("move_up", id, "missing");
        };

        if pos > 0 {
            self.nodes.swap_children(&parent, pos - 1, pos);
            return self.finish_reorder("move_up", id);
        }

        let Some((grandparent, parent_pos)) = self.locate(&parent) else {
            return no_op("move_up", id, "no previous subtree");
        };
        if parent_pos == 0 {
            return no_op("move_up", id, "no previous subtree");
        }

        let target = self.nodes.children(&grandparent)[parent_pos - 1].clone();
        self.nodes.detach(&parent, id);
        self.nodes.attach(&target, id.clone(), usize::MAX);

        self.finish_restructure("move_up", id)
    }

    /// Move `id` one position down in visual order at the same depth
    ///
    /// A last child crosses into the parent's next sibling, becoming its
    /// first child.
    pub fn move_down(&mut self, id: &NodeId) -> MutationOutcome {
        let Some((parent, pos)) = self.locate(id) else {
            return no_op("move_down", id, "missing");
        };

        if pos + 1 < self.nodes.children(&parent).len() {
            self.nodes.swap_children(&parent, pos, pos + 1);
            return self.finish_reorder("move_down", id);
        }

        let Some((grandparent, parent_pos)) = self.locate(&parent) else {
            return no_op("move_down", id, "no next subtree");
        };
        let Some(target) = self.nodes.children(&grandparent).get(parent_pos + 1).cloned() else {
            return no_op("move_down", id, "no next subtree");
        };

        self.nodes.detach(&parent, id);
        self.nodes.attach(&target, id.clone(), 0);

        self.finish_restructure("move_down", id)
    }

    /// Re-parent `id` under `new_parent_id` at `index`
    ///
    /// The index refers to the new parent's children after `id` has been
    /// detached, and is clamped to their count. Refuses to move the root or
    /// to move a node under itself or one of its descendants.
    pub fn move_to(&mut self, id: &NodeId, new_parent_id: &NodeId, index: usize) -> MutationOutcome {
        let Some((old_parent, old_pos)) = self.locate(id) else {
            return no_op("move_to", id, "missing or root");
        };
        if !self.ancestors.contains(new_parent_id) {
            return no_op("move_to", id, "missing parent");
        }
        if new_parent_id == id || self.ancestors.is_descendant(new_parent_id, id) {
            return no_op("move_to", id, "would create cycle");
        }

        let sibling_count = self.nodes.children(new_parent_id).len();
        let available = if &old_parent == new_parent_id {
            sibling_count - 1
        } else {
            sibling_count
        };
        let index = index.min(available);
        if &old_parent == new_parent_id && index == old_pos {
            return no_op("move_to", id, "already in place");
        }

        self.nodes.detach(&old_parent, id);
        self.nodes.attach(new_parent_id, id.clone(), index);

        if &old_parent == new_parent_id {
            self.finish_reorder("move_to", id)
        } else {
            self.finish_restructure("move_to", id)
        }
    }

    /// Realize a drag-and-drop intent as a single re-parenting step
    pub fn drop_node(&mut self, id: &NodeId, intent: &DropIntent) -> MutationOutcome {
        let target = intent.target();
        if target == id {
            return no_op("drop", id, "dropped on itself");
        }

        match intent {
            DropIntent::Into(target) => self.move_to(id, target, usize::MAX),
            DropIntent::Before(target) | DropIntent::After(target) => {
                let Some((parent, target_pos)) = self.locate(target) else {
                    return no_op("drop", id, "target has no parent");
                };
                // Positions shift left once `id` leaves the same sibling list
                let shift = match self.nodes.position(&parent, id) {
                    Some(pos) if pos < target_pos => 1,
                    _ => 0,
                };
                let index = match intent {
                    DropIntent::Before(_) => target_pos - shift,
                    _ => target_pos + 1 - shift,
                };
                self.move_to(id, &parent, index)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Content / status edits
    // ---------------------------------------------------------------------

    /// Replace a node's content
    ///
    /// Editing the selected node counts as a fresh edit: the cursor is
    /// clamped to the new length and the remembered column is dropped.
    pub fn update_content(&mut self, id: &NodeId, text: impl Into<String>) -> MutationOutcome {
        let text = text.into();
        match self.nodes.get(id) {
            None => return no_op("update_content", id, "missing"),
            Some(node) if node.content == text => return no_op("update_content", id, "unchanged"),
            Some(_) => {}
        }

        let len = text.chars().count();
        self.nodes.set_content(id, text);
        if self.selection.is_selected(id) {
            let offset = self.selection.cursor_offset;
            self.selection.set_cursor(offset, len);
        }

        self.touch();
        debug!(op = "update_content", node = %id, "applied edit");
        MutationOutcome::Applied
    }

    pub fn update_status(&mut self, id: &NodeId, status: Status) -> MutationOutcome {
        match self.nodes.get(id) {
            None => return no_op("update_status", id, "missing"),
            Some(node) if node.status() == Some(status) => {
                return no_op("update_status", id, "unchanged")
            }
            Some(_) => {}
        }

        self.nodes.set_status(id, status);
        self.touch();
        debug!(op = "update_status", node = %id, %status, "applied edit");
        MutationOutcome::Applied
    }

    // ---------------------------------------------------------------------
    // Selection & navigation
    // ---------------------------------------------------------------------

    /// Select `id` for editing with the cursor at `cursor_offset`
    ///
    /// Selection is unconditional; selecting a missing id simply leaves
    /// nothing visibly selected. For existing nodes the offset is clamped.
    pub fn select_node(&mut self, id: NodeId, cursor_offset: usize) {
        let offset = match self.nodes.get(&id) {
            Some(node) => cursor_offset.min(node.content_len()),
            None => cursor_offset,
        };
        self.selection.select(id, offset);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Place the cursor within the selected node (horizontal movement)
    pub fn set_cursor(&mut self, offset: usize) {
        let len = self
            .selection
            .selected_id
            .as_ref()
            .and_then(|id| self.nodes.get(id))
            .map_or(0, Node::content_len);
        self.selection.set_cursor(offset, len);
    }

    /// React to the presentation layer collapsing `id`
    ///
    /// A selection inside the collapsed subtree moves to `id` with the cursor
    /// at the end of its content.
    pub fn collapse(&mut self, id: &NodeId) -> MutationOutcome {
        let Some(node) = self.nodes.get(id) else {
            return no_op("collapse", id, "missing");
        };
        let inside = self
            .selection
            .selected_id
            .as_ref()
            .is_some_and(|selected| self.ancestors.is_descendant(selected, id));

        if self
            .selection
            .relocate_for_collapse(id, node.content_len(), inside)
        {
            debug!(node = %id, "moved selection out of collapsed subtree");
            MutationOutcome::Applied
        } else {
            MutationOutcome::NoOp
        }
    }

    /// Move the selection one row through the full visual order
    pub fn navigate(&mut self, direction: Direction) -> MutationOutcome {
        let order = self.flatten();
        self.navigate_over(&order, direction)
    }

    /// Move the selection one row through the visible rows only
    pub fn navigate_visible(
        &mut self,
        direction: Direction,
        collapsed: &HashSet<NodeId>,
    ) -> MutationOutcome {
        let order = self.flatten_visible(collapsed);
        self.navigate_over(&order, direction)
    }

    fn navigate_over(&mut self, order: &[NodeId], direction: Direction) -> MutationOutcome {
        let current = self
            .selection
            .selected_id
            .as_ref()
            .and_then(|selected| order.iter().position(|id| id == selected));

        let target = match (current, direction) {
            (None, Direction::Down) => order.first(),
            (None, Direction::Up) => None,
            (Some(pos), Direction::Up) => pos.checked_sub(1).and_then(|prev| order.get(prev)),
            (Some(pos), Direction::Down) => order.get(pos + 1),
        };
        let Some(target) = target else {
            trace!(?direction, "navigation at boundary");
            return MutationOutcome::NoOp;
        };

        let len = self.nodes.get(target).map_or(0, Node::content_len);
        self.selection.step_to(target.clone(), len);
        MutationOutcome::Applied
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Parent and position of a non-root node reachable from the root
    fn locate(&self, id: &NodeId) -> Option<(NodeId, usize)> {
        let parent = self.ancestors.parent(id)?.clone();
        let pos = self.nodes.position(&parent, id)?;
        Some((parent, pos))
    }

    /// Shape changed: rebuild the ancestor index before anyone reads it
    fn finish_restructure(&mut self, op: &'static str, id: &NodeId) -> MutationOutcome {
        self.ancestors = AncestorIndex::rebuild(&self.root_id, &self.nodes);
        self.touch();
        debug!(op, node = %id, version = self.version, "applied structural edit");
        MutationOutcome::Applied
    }

    /// Sibling order changed but no parent did; the index is still valid
    fn finish_reorder(&mut self, op: &'static str, id: &NodeId) -> MutationOutcome {
        self.touch();
        debug!(op, node = %id, version = self.version, "reordered siblings");
        MutationOutcome::Applied
    }

    fn touch(&mut self) {
        self.version += 1;
        self.dirty = true;
    }
}

fn no_op(op: &'static str, id: &NodeId, reason: &'static str) -> MutationOutcome {
    trace!(op, node = %id, reason, "ignored edit");
    MutationOutcome::NoOp
}
