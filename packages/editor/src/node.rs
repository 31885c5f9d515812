//! # Outline Nodes
//!
//! The unit of the outline: content text, ordered children and an open
//! metadata map.
//!
//! Metadata keys this crate does not understand are kept verbatim in
//! [`Metadata::extra`], so loading and saving a file never drops data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::errors::UnknownStatus;

/// Opaque node identifier, stable for the node's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Completion marker shown next to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unchecked,
    Done,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unchecked => "unchecked",
            Status::Done => "done",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unchecked" | "todo" => Ok(Status::Unchecked),
            "done" => Ok(Status::Done),
            "failed" => Ok(Status::Failed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// What a node represents
///
/// Nodes created by the editor are always [`NodeKind::Task`]; the other
/// kinds only arrive through loaded documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Task,
    Note,
    Heading,
}

/// Open metadata map attached to every node
///
/// Unknown keys round-trip verbatim. Known fields are written only when set,
/// so an explicit `"status": null` loads as `None` and is omitted on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,

    /// Keys not understood by this crate, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single outline entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(default)]
    pub content: String,

    /// Ordered child ids; order defines sibling and visual order
    #[serde(default)]
    pub children: Vec<NodeId>,

    #[serde(default)]
    pub kind: NodeKind,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Node {
    /// Create an empty node of the given kind
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            children: Vec::new(),
            kind,
            metadata: Metadata::default(),
        }
    }

    /// Create an empty, unchecked task
    pub fn task(id: impl Into<NodeId>) -> Self {
        let mut node = Self::new(id, NodeKind::Task);
        node.metadata.status = Some(Status::Unchecked);
        node
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_children<I, T>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn status(&self) -> Option<Status> {
        self.metadata.status
    }

    /// Content length in characters (the unit of cursor offsets)
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_metadata_survives_round_trip() {
        let json = r#"{
            "id": "a",
            "content": "Buy milk",
            "metadata": { "status": "done", "color": "red", "priority": 3 }
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.status(), Some(Status::Done));
        assert_eq!(node.metadata.extra.get("color"), Some(&Value::from("red")));

        let reparsed: Node = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        assert_eq!(reparsed, node);
        assert_eq!(reparsed.metadata.extra.get("priority"), Some(&Value::from(3)));
    }

    #[test]
    fn test_null_status_is_omitted_on_save() {
        let json = r#"{ "id": "a", "metadata": { "status": null, "x": 1 } }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.status(), None);

        let saved = serde_json::to_value(&node.metadata).unwrap();
        assert_eq!(saved, serde_json::json!({ "x": 1 }));
    }

    #[test]
    fn test_missing_fields_default() {
        let node: Node = serde_json::from_str(r#"{ "id": "a" }"#).unwrap();
        assert!(node.content.is_empty());
        assert!(node.is_leaf());
        assert_eq!(node.kind, NodeKind::Task);
        assert_eq!(node.status(), None);
    }

    #[test]
    fn test_content_len_counts_chars() {
        let node = Node::task("a").with_content("héllo");
        assert_eq!(node.content_len(), 5);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Done".parse::<Status>(), Ok(Status::Done));
        assert_eq!("todo".parse::<Status>(), Ok(Status::Unchecked));
        assert!("maybe".parse::<Status>().is_err());
    }
}
