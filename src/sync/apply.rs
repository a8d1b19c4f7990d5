//! The transactional side of a content save.

use super::plan::{SyncPlan, TaskOp, plan_sync};
use crate::config::IdsConfig;
use crate::content::{Node, extract_tasks};
use crate::db::documents::get_document_internal;
use crate::db::tasks::{
    delete_task_internal, insert_task_internal, load_document_tasks_internal, patch_task_internal,
};
use crate::db::{Database, now_ms};
use crate::error::SyncError;
use crate::types::{Document, ExtractedTask, SyncOutcome};
use rand::Rng;
use rusqlite::{Connection, params};
use std::time::Instant;
use tracing::{debug, info};

impl Database {
    /// Save a document's serialized tree and reconcile its task records.
    ///
    /// Runs in one transaction: either every task insert/patch/delete and the
    /// document update land, or none do. A payload that is not JSON and an
    /// unknown document are both rejected before anything is written.
    pub fn save_document_content<R: Rng + ?Sized>(
        &self,
        document_id: &str,
        content: &str,
        ids: &IdsConfig,
        rng: &mut R,
    ) -> Result<SyncOutcome, SyncError> {
        self.save_document_content_at(document_id, content, ids, rng, now_ms())
    }

    /// [`Database::save_document_content`] with an explicit timestamp for
    /// every write of this pass.
    pub fn save_document_content_at<R: Rng + ?Sized>(
        &self,
        document_id: &str,
        content: &str,
        ids: &IdsConfig,
        rng: &mut R,
        now: i64,
    ) -> Result<SyncOutcome, SyncError> {
        let started = Instant::now();

        let root = Node::parse(content)?;
        let extracted = extract_tasks(&root, rng, ids.generated_id_length);

        let (outcome, plan) = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let doc = get_document_internal(&tx, document_id)?
                .ok_or_else(|| SyncError::DocumentNotFound(document_id.to_string()))?;
            let existing = load_document_tasks_internal(&tx, document_id)?;

            let plan = plan_sync(&existing, &extracted, now);
            apply_plan(&tx, &doc, &plan, now)?;
            let outcome = update_aggregates(&tx, &doc, content, &extracted, &plan, now)?;

            tx.commit()?;
            Ok::<_, SyncError>((outcome, plan))
        })?;

        debug!(document_id = %document_id, ops = plan.ops.len(), "Applied task plan");
        info!(
            document_id = %document_id,
            todo_count = outcome.todo_count,
            completed_count = outcome.completed_count,
            inserted = outcome.changes.inserted,
            updated = outcome.changes.updated,
            deleted = outcome.changes.deleted,
            unchanged = outcome.changes.unchanged,
            duration_ms = started.elapsed().as_millis() as u64,
            "Saved document content"
        );

        Ok(outcome)
    }
}

fn apply_plan(conn: &Connection, doc: &Document, plan: &SyncPlan, now: i64) -> rusqlite::Result<()> {
    for op in &plan.ops {
        match op {
            TaskOp::Insert(task) => {
                insert_task_internal(conn, &doc.id, doc.project_id.as_deref(), task, now)?;
            }
            TaskOp::Patch {
                record_id, patch, ..
            } => {
                patch_task_internal(conn, record_id, patch, now)?;
            }
            TaskOp::Delete { record_id, .. } => {
                delete_task_internal(conn, record_id)?;
            }
        }
    }
    Ok(())
}

/// Store the submitted content and counts taken from the extraction itself.
fn update_aggregates(
    conn: &Connection,
    doc: &Document,
    content: &str,
    extracted: &[ExtractedTask],
    plan: &SyncPlan,
    now: i64,
) -> rusqlite::Result<SyncOutcome> {
    let todo_count = extracted.len() as i64;
    let completed_count = extracted.iter().filter(|t| t.is_completed).count() as i64;

    conn.execute(
        "UPDATE documents
         SET content = ?1, todo_count = ?2, completed_count = ?3, updated_at = ?4
         WHERE id = ?5",
        params![content, todo_count, completed_count, now, &doc.id],
    )?;

    Ok(SyncOutcome {
        todo_count,
        completed_count,
        changes: plan.changes(),
    })
}
