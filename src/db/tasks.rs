//! Task record storage.
//!
//! Task records are only ever written by the content sync in
//! [`crate::sync`]; this module holds the row-level helpers it uses and the
//! read-side queries for display.

use super::{Database, new_record_id};
use crate::sync::plan::{NewTask, TaskPatch};
use crate::types::TaskRecord;
use anyhow::Result;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, Row, params, params_from_iter};

pub fn parse_task_row(row: &Row) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get("id")?,
        document_id: row.get("document_id")?,
        project_id: row.get("project_id")?,
        node_id: row.get("node_id")?,
        text: row.get("text")?,
        is_completed: row.get("is_completed")?,
        order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        completed_at: row.get("completed_at")?,
    })
}

/// All task records of a document, by position.
pub(crate) fn load_document_tasks_internal(
    conn: &Connection,
    document_id: &str,
) -> rusqlite::Result<Vec<TaskRecord>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM document_tasks WHERE document_id = ?1
         ORDER BY sort_order, created_at",
    )?;
    let tasks = stmt
        .query_map(params![document_id], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

pub(crate) fn insert_task_internal(
    conn: &Connection,
    document_id: &str,
    project_id: Option<&str>,
    task: &NewTask,
    now: i64,
) -> rusqlite::Result<String> {
    let id = new_record_id();
    conn.execute(
        "INSERT INTO document_tasks (
            id, document_id, project_id, node_id, text, is_completed, sort_order,
            created_at, updated_at, completed_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            &id,
            document_id,
            project_id,
            &task.node_id,
            &task.text,
            task.is_completed,
            task.order,
            now,
            now,
            task.completed_at,
        ],
    )?;
    Ok(id)
}

/// Write the fields present in `patch` plus `updated_at`. Nothing else is touched.
pub(crate) fn patch_task_internal(
    conn: &Connection,
    record_id: &str,
    patch: &TaskPatch,
    now: i64,
) -> rusqlite::Result<usize> {
    let mut sets: Vec<&str> = Vec::with_capacity(5);
    let mut values: Vec<SqlValue> = Vec::with_capacity(6);

    if let Some(text) = &patch.text {
        sets.push("text = ?");
        values.push(SqlValue::Text(text.clone()));
    }
    if let Some(done) = patch.is_completed {
        sets.push("is_completed = ?");
        values.push(SqlValue::Integer(i64::from(done)));
    }
    if let Some(order) = patch.order {
        sets.push("sort_order = ?");
        values.push(SqlValue::Integer(order));
    }
    if let Some(completed_at) = patch.completed_at {
        sets.push("completed_at = ?");
        values.push(completed_at.map_or(SqlValue::Null, SqlValue::Integer));
    }
    sets.push("updated_at = ?");
    values.push(SqlValue::Integer(now));
    values.push(SqlValue::Text(record_id.to_string()));

    let sql = format!("UPDATE document_tasks SET {} WHERE id = ?", sets.join(", "));
    conn.execute(&sql, params_from_iter(values))
}

pub(crate) fn delete_task_internal(conn: &Connection, record_id: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM document_tasks WHERE id = ?1", params![record_id])
}

impl Database {
    /// Task records of a document in checklist order.
    pub fn list_document_tasks(&self, document_id: &str) -> Result<Vec<TaskRecord>> {
        self.with_conn(|conn| Ok(load_document_tasks_internal(conn, document_id)?))
    }

    /// Task records of every document in a project, grouped by document and
    /// in checklist order. With `open_only`, completed tasks are skipped.
    pub fn list_project_tasks(&self, project_id: &str, open_only: bool) -> Result<Vec<TaskRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.* FROM document_tasks t
                 INNER JOIN documents d ON d.id = t.document_id
                 WHERE t.project_id = ?1 AND (?2 = 0 OR t.is_completed = 0)
                 ORDER BY d.updated_at DESC, t.document_id, t.sort_order",
            )?;
            let tasks = stmt
                .query_map(params![project_id, open_only], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Look up the record for one checklist node of a document.
    pub fn get_task_by_node(&self, document_id: &str, node_id: &str) -> Result<Option<TaskRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM document_tasks WHERE document_id = ?1 AND node_id = ?2",
            )?;

            match stmt.query_row(params![document_id, node_id], parse_task_row) {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}
