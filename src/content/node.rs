//! Typed view over the editor's JSON document tree.

use serde_json::{Map, Value};

/// Node type names the editor uses for checklist items.
const TASK_KINDS: &[&str] = &["taskItem", "task_item", "task-item"];

/// Whether a node type name denotes a checklist item.
pub fn is_task_kind(kind: &str) -> bool {
    TASK_KINDS.contains(&kind)
}

/// Attributes carried by a checklist item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAttrs {
    /// Editor-assigned stable id; `None` when missing or empty.
    pub id: Option<String>,
    pub checked: bool,
}

impl TaskAttrs {
    fn from_map(attrs: &Map<String, Value>) -> Self {
        let id = match attrs.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let checked = attrs
            .get("checked")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Self { id, checked }
    }
}

/// One node of a document tree.
///
/// Built permissively: fields with an unexpected shape are treated as absent,
/// so any JSON value converts to some `Node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A checklist item. Its text lives in its descendants.
    TaskItem { attrs: TaskAttrs, children: Vec<Node> },
    /// A text leaf.
    Text { text: String },
    /// Any other node (document root, paragraph, list, heading, ...).
    Element { kind: String, children: Vec<Node> },
}

impl Node {
    /// Parse a serialized tree. Fails only when the payload is not JSON.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(&value))
    }

    /// Convert a JSON value into a node tree.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Node::Element {
                kind: String::new(),
                children: Vec::new(),
            };
        };

        let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();
        let children: Vec<Node> = obj
            .get("content")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Node::from_value).collect())
            .unwrap_or_default();

        if is_task_kind(kind) {
            let attrs = obj
                .get("attrs")
                .and_then(Value::as_object)
                .map(TaskAttrs::from_map)
                .unwrap_or_default();
            return Node::TaskItem { attrs, children };
        }

        match obj.get("text").and_then(Value::as_str) {
            Some(text) if !text.is_empty() || children.is_empty() => Node::Text {
                text: text.to_string(),
            },
            _ => Node::Element {
                kind: kind.to_string(),
                children,
            },
        }
    }

    /// The node's type name.
    pub fn kind(&self) -> &str {
        match self {
            Node::TaskItem { .. } => TASK_KINDS[0],
            Node::Text { .. } => "text",
            Node::Element { kind, .. } => kind,
        }
    }

    /// Child nodes in document order; empty for text leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::TaskItem { children, .. } | Node::Element { children, .. } => children,
            Node::Text { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_task_item_with_attrs() {
        let node = Node::from_value(&json!({
            "type": "taskItem",
            "attrs": { "id": "a", "checked": true },
            "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] }]
        }));

        match node {
            Node::TaskItem { attrs, children } => {
                assert_eq!(attrs.id.as_deref(), Some("a"));
                assert!(attrs.checked);
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].kind(), "paragraph");
            }
            other => panic!("expected task item, got {:?}", other),
        }
    }

    #[test]
    fn empty_id_and_non_bool_checked_are_absent() {
        let node = Node::from_value(&json!({
            "type": "taskItem",
            "attrs": { "id": "", "checked": "yes" }
        }));
        assert_eq!(
            node,
            Node::TaskItem {
                attrs: TaskAttrs::default(),
                children: vec![]
            }
        );
    }

    #[test]
    fn malformed_shapes_are_tolerated() {
        let node = Node::from_value(&json!({ "type": 7, "content": "nope", "attrs": [] }));
        assert_eq!(
            node,
            Node::Element {
                kind: String::new(),
                children: vec![]
            }
        );

        let node = Node::from_value(&json!(["not", "an", "object"]));
        assert!(node.children().is_empty());
    }

    #[test]
    fn accepts_alternate_task_spellings() {
        assert!(is_task_kind("taskItem"));
        assert!(is_task_kind("task_item"));
        assert!(is_task_kind("task-item"));
        assert!(!is_task_kind("taskList"));
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(Node::parse("{not json").is_err());
        assert!(Node::parse(r#"{"type":"doc"}"#).is_ok());
    }
}
