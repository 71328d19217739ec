//! Serde model of the Figma document tree.
//!
//! Only the properties the decomposition engine reads are typed; everything else a
//! node carries is kept in `extra` so a persisted node record round-trips unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tag of the document root. Never selected for output.
pub const DOCUMENT_TYPE: &str = "DOCUMENT";

/// Paint type tag marking bitmap image content.
pub const IMAGE_PAINT: &str = "IMAGE";

/// A single element of the design document (frame, component, text layer, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Vec<Paint>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A fill or background entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub paint_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Paint {
    pub fn is_image(&self) -> bool {
        self.paint_type.as_deref() == Some(IMAGE_PAINT)
    }
}

impl Node {
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn fills(&self) -> &[Paint] {
        self.fills.as_deref().unwrap_or_default()
    }

    pub fn background(&self) -> &[Paint] {
        self.background.as_deref().unwrap_or_default()
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    pub fn is_document(&self) -> bool {
        self.type_tag() == Some(DOCUMENT_TYPE)
    }

    /// Name used for breadcrumbs: the node name, else its type, else `"Node"`.
    pub fn crumb(&self) -> &str {
        self.name
            .as_deref()
            .or(self.node_type.as_deref())
            .unwrap_or("Node")
    }

    /// True when the node carries any paint or child that could hold image references.
    pub fn has_paint_or_children(&self) -> bool {
        !self.fills().is_empty() || !self.background().is_empty() || !self.children().is_empty()
    }

    /// Extracts the `document` subtree from a full `GET /files/{key}` response.
    /// A response without a document yields an empty node, which produces no output.
    pub fn document_of(file_json: &Value) -> Result<Node, serde_json::Error> {
        match file_json.get("document") {
            Some(doc) if !doc.is_null() => Node::deserialize(doc),
            _ => Ok(Node::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_properties_survive_a_round_trip() {
        let raw = json!({
            "id": "1:2",
            "name": "Card",
            "type": "FRAME",
            "absoluteBoundingBox": {"x": 0.0, "y": 4.0},
            "fills": [{"type": "IMAGE", "imageRef": "abc"}],
            "children": []
        });
        let node: Node = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.fills().len(), 1);
        assert!(node.fills()[0].is_image());
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn missing_fields_fall_back() {
        let node: Node = serde_json::from_value(json!({})).unwrap();
        assert_eq!(node.crumb(), "Node");
        assert!(node.children().is_empty());
        assert!(!node.has_paint_or_children());
    }

    #[test]
    fn document_of_tolerates_missing_document() {
        let node = Node::document_of(&json!({"name": "file"})).unwrap();
        assert_eq!(node, Node::default());
    }
}
