//! Rich-text document trees and the checklist items inside them.
//!
//! The editor submits its document as a JSON tree of `{type, attrs, content,
//! text}` objects. [`Node`] is the typed view of that tree, [`collect_text`]
//! flattens a subtree to plain text and [`extract_tasks`] pulls out the
//! checklist items in document order.

mod extract;
mod node;
mod walk;

pub use extract::{DEFAULT_GENERATED_ID_LENGTH, extract_tasks, generate_node_id};
pub use node::{Node, TaskAttrs, is_task_kind};
pub use walk::collect_text;
