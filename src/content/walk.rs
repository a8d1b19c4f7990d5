//! Plain-text flattening of a subtree.

use super::node::Node;

/// Concatenate all text leaves under `node`, depth-first, with no separator.
pub fn collect_text(node: &Node) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text } => out.push_str(text),
        Node::TaskItem { children, .. } | Node::Element { children, .. } => {
            for child in children {
                push_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_fragments_without_separator() {
        let node = Node::from_value(&json!({
            "type": "paragraph",
            "content": [
                { "type": "text", "text": "Buy " },
                { "type": "text", "text": "milk", "marks": [{ "type": "bold" }] },
                { "type": "hardBreak" },
                { "type": "text", "text": "!" }
            ]
        }));
        assert_eq!(collect_text(&node), "Buy milk!");
    }

    #[test]
    fn nested_text_is_depth_first() {
        let node = Node::from_value(&json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "a" }] },
                { "type": "bulletList", "content": [
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [{ "type": "text", "text": "b" }] }
                    ]}
                ]},
                { "type": "paragraph", "content": [{ "type": "text", "text": "c" }] }
            ]
        }));
        assert_eq!(collect_text(&node), "abc");
    }

    #[test]
    fn empty_nodes_contribute_nothing() {
        let node = Node::from_value(&json!({ "type": "paragraph" }));
        assert_eq!(collect_text(&node), "");
    }
}
