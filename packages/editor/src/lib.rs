//! # Outliner Editor
//!
//! Tree document model and structural edit engine for outlines.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ collaborator: file → (nodes, root)          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document (nodes, index, selection)  │
//! │  - Validate on load                         │
//! │  - Structural edits + index rebuild         │
//! │  - Content / status edits                   │
//! │  - Selection, cursor, navigation            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ presentation: flatten() → rows on screen    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Node store is source of truth**: the ancestor index is a derived view
//! 2. **Shape change and index rebuild are one step**: never left to callers
//! 3. **Impossible edits are no-ops**: hotkeys need no pre-validation
//! 4. **Broken trees are rejected on load**: never silently repaired
//!
//! ## Usage
//!
//! ```rust
//! use outliner_editor::{Document, Mutation, Node, NodeId};
//! use std::collections::HashMap;
//!
//! let nodes: HashMap<NodeId, Node> = [
//!     Node::task("root").with_children(["a", "b"]),
//!     Node::task("a").with_content("Milk"),
//!     Node::task("b").with_content("Eggs"),
//! ]
//! .into_iter()
//! .map(|node| (node.id.clone(), node))
//! .collect();
//!
//! let mut doc = Document::load(nodes, NodeId::from("root"))?;
//!
//! // Insert an empty task after "a"; it becomes the selection
//! let result = doc.apply(Mutation::CreateSiblingAfter { node_id: NodeId::from("a") });
//! let created = result.created.unwrap();
//! assert_eq!(doc.selection().selected_id.as_ref(), Some(&created));
//!
//! // Indent "b" under the new node
//! doc.apply(Mutation::Indent { node_id: NodeId::from("b") });
//! assert_eq!(doc.parent(&NodeId::from("b")), Some(&created));
//! # Ok::<(), outliner_editor::StructureError>(())
//! ```

mod ancestry;
mod document;
mod errors;
mod id_generator;
mod mutations;
mod node;
mod selection;
mod store;
mod traversal;
mod validate;

pub use ancestry::AncestorIndex;
pub use document::{Direction, Document, OutlineSnapshot};
pub use errors::{EditorError, StructureError, UnknownStatus};
pub use id_generator::{document_seed, IdGenerator};
pub use mutations::{DropIntent, Mutation, MutationOutcome, MutationResult};
pub use node::{Metadata, Node, NodeId, NodeKind, Status};
pub use selection::Selection;
pub use store::NodeStore;
pub use traversal::{flatten, flatten_entries, flatten_visible, walk, FlatEntry, Visitor};
pub use validate::validate;
