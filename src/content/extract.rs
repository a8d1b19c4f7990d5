//! Checklist extraction.

use super::node::Node;
use super::walk::collect_text;
use crate::types::ExtractedTask;
use rand::Rng;

/// Length of identifiers invented for checklist items that carry none.
pub const DEFAULT_GENERATED_ID_LENGTH: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a lowercase base-36 token of `len` characters from `rng`.
pub fn generate_node_id<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len.max(1))
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Collect the checklist items of a tree in depth-first pre-order.
///
/// `order` is one counter for the whole walk, advanced only on checklist
/// items; an item nested inside another comes right after its parent.
/// Items without an id get one from `rng`. Duplicate ids are passed through.
pub fn extract_tasks<R: Rng + ?Sized>(
    root: &Node,
    rng: &mut R,
    id_len: usize,
) -> Vec<ExtractedTask> {
    let mut tasks = Vec::new();
    visit(root, rng, id_len, &mut tasks);
    tasks
}

fn visit<R: Rng + ?Sized>(node: &Node, rng: &mut R, id_len: usize, tasks: &mut Vec<ExtractedTask>) {
    if let Node::TaskItem { attrs, .. } = node {
        let node_id = match &attrs.id {
            Some(id) => id.clone(),
            None => generate_node_id(rng, id_len),
        };
        tasks.push(ExtractedTask {
            text: collect_text(node),
            is_completed: attrs.checked,
            order: tasks.len() as i64,
            node_id,
        });
    }

    for child in node.children() {
        visit(child, rng, id_len, tasks);
    }
}
