//! Core types for documents and their synchronized task records.

use serde::{Deserialize, Serialize};

/// Serialized tree stored on a freshly created document: one empty paragraph.
pub const EMPTY_DOCUMENT_CONTENT: &str =
    r#"{"type":"doc","content":[{"type":"paragraph","content":[]}]}"#;

/// A rich-text document owning a set of task records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub project_id: Option<String>,
    /// Raw serialized tree, exactly as last submitted.
    pub content: String,
    pub todo_count: i64,
    pub completed_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Document listing entry without the (potentially large) content payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub project_id: Option<String>,
    pub todo_count: i64,
    pub completed_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Document> for DocumentSummary {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            project_id: doc.project_id,
            todo_count: doc.todo_count,
            completed_count: doc.completed_count,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// A persisted task record, one per checklist item of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Store-assigned key.
    pub id: String,
    pub document_id: String,
    /// Copy of the owning document's project at creation or last reassignment.
    pub project_id: Option<String>,
    /// Stable identity of the checklist node across edits, unique per document.
    pub node_id: String,
    pub text: String,
    pub is_completed: bool,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Set only while `is_completed` is true.
    pub completed_at: Option<i64>,
}

/// A checklist item as found in one submitted tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub text: String,
    pub is_completed: bool,
    pub order: i64,
    pub node_id: String,
}

/// Per-kind counts of the writes a synchronization pass performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

/// Result of saving a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub todo_count: i64,
    pub completed_count: i64,
    pub changes: ChangeCounts,
}
