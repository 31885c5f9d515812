//! # Selection & Cursor
//!
//! Tracks the selected node, the cursor offset inside its content (in
//! characters) and the remembered column used by vertical navigation.
//!
//! The remembered column behaves like column-sticky cursor movement in a
//! text editor: moving down through a short line and on to a long one puts
//! the cursor back at the column it started from. Any horizontal placement
//! or fresh selection forgets it.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub selected_id: Option<NodeId>,
    pub cursor_offset: usize,
    pub remembered_column: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected_id.as_ref() == Some(id)
    }

    /// Select a node with the cursor at `cursor_offset`
    pub fn select(&mut self, id: NodeId, cursor_offset: usize) {
        self.selected_id = Some(id);
        self.cursor_offset = cursor_offset;
        self.remembered_column = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Place the cursor horizontally, forgetting the remembered column
    pub fn set_cursor(&mut self, offset: usize, content_len: usize) {
        self.cursor_offset = offset.min(content_len);
        self.remembered_column = None;
    }

    /// Step vertically onto `target`
    ///
    /// The cursor lands at the remembered column (or the current offset when
    /// none is remembered), clamped to the target's length. The column used
    /// is remembered for the next step.
    pub fn step_to(&mut self, target: NodeId, target_len: usize) {
        let column = self.remembered_column.unwrap_or(self.cursor_offset);
        self.selected_id = Some(target);
        self.cursor_offset = column.min(target_len);
        self.remembered_column = Some(column);
    }

    /// Keep the selection visible when `collapsing` folds its subtree
    ///
    /// A selection on the collapsing node itself is untouched. A selection
    /// on a strict descendant moves to the collapsing node with the cursor
    /// at the end of its content.
    pub fn relocate_for_collapse(
        &mut self,
        collapsing: &NodeId,
        collapsing_len: usize,
        selected_is_descendant: bool,
    ) -> bool {
        if self.is_selected(collapsing) || !selected_is_descendant {
            return false;
        }
        self.select(collapsing.clone(), collapsing_len);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_select_resets_remembered_column() {
        let mut selection = Selection {
            selected_id: Some(id("a")),
            cursor_offset: 3,
            remembered_column: Some(8),
        };
        selection.select(id("b"), 1);

        assert!(selection.is_selected(&id("b")));
        assert_eq!(selection.cursor_offset, 1);
        assert_eq!(selection.remembered_column, None);
    }

    #[test]
    fn test_column_sticks_across_short_lines() {
        let mut selection = Selection::new();
        selection.select(id("long"), 8);

        selection.step_to(id("short"), 2);
        assert_eq!(selection.cursor_offset, 2);
        assert_eq!(selection.remembered_column, Some(8));

        selection.step_to(id("longer"), 20);
        assert_eq!(selection.cursor_offset, 8);
        assert_eq!(selection.remembered_column, Some(8));
    }

    #[test]
    fn test_set_cursor_clamps_and_forgets_column() {
        let mut selection = Selection::new();
        selection.select(id("a"), 0);
        selection.step_to(id("b"), 4);

        selection.set_cursor(10, 4);
        assert_eq!(selection.cursor_offset, 4);
        assert_eq!(selection.remembered_column, None);
    }

    #[test]
    fn test_collapse_relocation() {
        let mut selection = Selection::new();
        selection.select(id("child"), 2);

        assert!(selection.relocate_for_collapse(&id("parent"), 6, true));
        assert!(selection.is_selected(&id("parent")));
        assert_eq!(selection.cursor_offset, 6);

        // Already on the collapsing node: offset preserved
        selection.set_cursor(1, 6);
        assert!(!selection.relocate_for_collapse(&id("parent"), 6, false));
        assert_eq!(selection.cursor_offset, 1);
    }
}
