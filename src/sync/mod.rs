//! Keeps a document's task records in step with the checklist in its content.
//!
//! A save parses the submitted tree, extracts its checklist items, diffs them
//! against the stored records ([`plan::plan_sync`]) and applies the resulting
//! writes together with the document's content and counts in one
//! transaction ([`crate::db::Database::save_document_content`]).

mod apply;
pub mod plan;

pub use plan::{NewTask, SyncPlan, TaskOp, TaskPatch, plan_sync};
