//! Document CRUD.

use super::{Database, new_record_id, now_ms};
use crate::types::{Document, DocumentSummary, EMPTY_DOCUMENT_CONTENT};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, Row, params};

pub fn parse_document_row(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get("id")?,
        title: row.get("title")?,
        project_id: row.get("project_id")?,
        content: row.get("content")?,
        todo_count: row.get("todo_count")?,
        completed_count: row.get("completed_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_summary_row(row: &Row) -> rusqlite::Result<DocumentSummary> {
    Ok(DocumentSummary {
        id: row.get("id")?,
        title: row.get("title")?,
        project_id: row.get("project_id")?,
        todo_count: row.get("todo_count")?,
        completed_count: row.get("completed_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Load a document using an existing connection or transaction.
pub(crate) fn get_document_internal(
    conn: &Connection,
    document_id: &str,
) -> rusqlite::Result<Option<Document>> {
    let mut stmt = conn.prepare("SELECT * FROM documents WHERE id = ?1")?;

    match stmt.query_row(params![document_id], parse_document_row) {
        Ok(doc) => Ok(Some(doc)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Database {
    /// Create an empty document: one empty paragraph, zero counts.
    pub fn create_document(&self, title: &str, project_id: Option<&str>) -> Result<Document> {
        let title = title.trim();
        if title.is_empty() {
            return Err(anyhow!("Document title must not be empty"));
        }

        let now = now_ms();
        let doc = Document {
            id: new_record_id(),
            title: title.to_string(),
            project_id: project_id.map(String::from),
            content: EMPTY_DOCUMENT_CONTENT.to_string(),
            todo_count: 0,
            completed_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (
                    id, title, project_id, content, todo_count, completed_count, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?6)",
                params![
                    &doc.id,
                    &doc.title,
                    &doc.project_id,
                    &doc.content,
                    doc.created_at,
                    doc.updated_at,
                ],
            )?;
            Ok::<_, anyhow::Error>(())
        })?;

        tracing::info!(document_id = %doc.id, title = %doc.title, "Created document");
        Ok(doc)
    }

    /// Get a document by ID.
    pub fn get_document(&self, document_id: &str) -> Result<Option<Document>> {
        self.with_conn(|conn| Ok(get_document_internal(conn, document_id)?))
    }

    /// List documents, most recently updated first.
    pub fn list_documents(&self, project_id: Option<&str>) -> Result<Vec<DocumentSummary>> {
        self.with_conn(|conn| {
            let docs = match project_id {
                Some(pid) => {
                    let mut stmt = conn.prepare(
                        "SELECT * FROM documents WHERE project_id = ?1
                         ORDER BY updated_at DESC, id DESC",
                    )?;
                    stmt.query_map(params![pid], parse_summary_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?
                }
                None => {
                    let mut stmt = conn
                        .prepare("SELECT * FROM documents ORDER BY updated_at DESC, id DESC")?;
                    stmt.query_map([], parse_summary_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?
                }
            };
            Ok(docs)
        })
    }

    /// Change a document's title. Returns None if the document does not exist.
    pub fn rename_document(&self, document_id: &str, title: &str) -> Result<Option<Document>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(anyhow!("Document title must not be empty"));
        }

        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE documents SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![title, now_ms(), document_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            Ok(get_document_internal(conn, document_id)?)
        })
    }

    /// Reassign a document to a project (or none).
    ///
    /// The denormalized `project_id` on every task record of the document is
    /// rewritten in the same transaction. Returns None if the document does
    /// not exist.
    pub fn set_document_project(
        &self,
        document_id: &str,
        project_id: Option<&str>,
    ) -> Result<Option<Document>> {
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE documents SET project_id = ?1, updated_at = ?2 WHERE id = ?3",
                params![project_id, now, document_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            let retagged = tx.execute(
                "UPDATE document_tasks SET project_id = ?1 WHERE document_id = ?2",
                params![project_id, document_id],
            )?;

            let doc = get_document_internal(&tx, document_id)?;

            tx.commit()?;

            tracing::info!(
                document_id = %document_id,
                project_id = ?project_id,
                tasks = retagged,
                "Moved document to project"
            );
            Ok(doc)
        })
    }

    /// Delete a document together with all its task records.
    /// Returns false if the document did not exist.
    pub fn delete_document(&self, document_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let tasks = tx.execute(
                "DELETE FROM document_tasks WHERE document_id = ?1",
                params![document_id],
            )?;
            let deleted = tx.execute("DELETE FROM documents WHERE id = ?1", params![document_id])?;

            tx.commit()?;

            if deleted > 0 {
                tracing::info!(document_id = %document_id, tasks, "Deleted document");
            }
            Ok(deleted > 0)
        })
    }
}
