//! Document tools, including the content save that syncs checklist tasks.

use super::{ToolContext, get_string, make_tool, require_string};
use crate::config::IdsConfig;
use crate::db::Database;
use crate::error::{SyncError, ToolError};
use crate::format::{
    OutputFormat, format_document_markdown, format_documents_markdown, markdown_to_json,
};
use crate::types::DocumentSummary;
use anyhow::Result;
use rmcp::model::Tool;
use serde_json::{Value, json};

pub fn get_tools() -> Vec<Tool> {
    vec![
        make_tool(
            "create_document",
            "Create an empty document (one empty paragraph, no tasks).",
            json!({
                "title": { "type": "string", "description": "Document title" },
                "project": { "type": "string", "description": "Optional project ID" }
            }),
            vec!["title"],
        ),
        make_tool(
            "get_document",
            "Get a document with its content and checklist tasks.",
            json!({
                "document": { "type": "string", "description": "Document ID" },
                "format": {
                    "type": "string",
                    "enum": ["json", "markdown"],
                    "description": "Output format (default: json)"
                }
            }),
            vec!["document"],
        ),
        make_tool(
            "list_documents",
            "List documents, most recently updated first.",
            json!({
                "project": { "type": "string", "description": "Only documents in this project" },
                "format": {
                    "type": "string",
                    "enum": ["json", "markdown"],
                    "description": "Output format (default: json)"
                }
            }),
            vec![],
        ),
        make_tool(
            "rename_document",
            "Change a document's title.",
            json!({
                "document": { "type": "string", "description": "Document ID" },
                "title": { "type": "string", "description": "New title" }
            }),
            vec!["document", "title"],
        ),
        make_tool(
            "move_document",
            "Assign a document (and its tasks) to a project. Omit project to clear it.",
            json!({
                "document": { "type": "string", "description": "Document ID" },
                "project": { "type": "string", "description": "Target project ID" }
            }),
            vec!["document"],
        ),
        make_tool(
            "delete_document",
            "Delete a document and all of its tasks.",
            json!({
                "document": { "type": "string", "description": "Document ID" }
            }),
            vec!["document"],
        ),
        make_tool(
            "save_document_content",
            "Save a document's rich-text JSON tree. Checklist items (taskItem nodes) are synced to task records: new items inserted, changed ones patched, removed ones deleted. Returns todo_count and completed_count.",
            json!({
                "document": { "type": "string", "description": "Document ID" },
                "content": {
                    "type": "string",
                    "description": "Serialized document tree, e.g. {\"type\":\"doc\",\"content\":[...]}"
                }
            }),
            vec!["document", "content"],
        ),
    ]
}

fn output_format(args: &Value) -> Result<OutputFormat, ToolError> {
    match get_string(args, "format") {
        None => Ok(OutputFormat::Json),
        Some(s) => OutputFormat::parse(&s)
            .ok_or_else(|| ToolError::invalid_value("format", "format must be json or markdown")),
    }
}

pub fn create_document(db: &Database, args: Value) -> Result<Value> {
    let title = require_string(&args, "title")?;
    let project = get_string(&args, "project");

    let doc = db.create_document(&title, project.as_deref())?;

    Ok(json!({
        "document_id": &doc.id,
        "title": doc.title,
        "project_id": doc.project_id,
        "created_at": doc.created_at
    }))
}

pub fn get_document(db: &Database, args: Value) -> Result<Value> {
    let document_id = require_string(&args, "document")?;
    let format = output_format(&args)?;

    let doc = db
        .get_document(&document_id)?
        .ok_or_else(|| ToolError::document_not_found(&document_id))?;
    let tasks = db.list_document_tasks(&document_id)?;

    match format {
        OutputFormat::Markdown => Ok(markdown_to_json(format_document_markdown(&doc, &tasks))),
        OutputFormat::Json => {
            let mut doc_json = serde_json::to_value(&doc)?;
            if let Some(obj) = doc_json.as_object_mut() {
                obj.insert("tasks".to_string(), serde_json::to_value(&tasks)?);
            }
            Ok(doc_json)
        }
    }
}

pub fn list_documents(db: &Database, args: Value) -> Result<Value> {
    let project = get_string(&args, "project");
    let format = output_format(&args)?;

    let docs: Vec<DocumentSummary> = db.list_documents(project.as_deref())?;

    match format {
        OutputFormat::Markdown => Ok(markdown_to_json(format_documents_markdown(&docs))),
        OutputFormat::Json => Ok(json!({ "documents": docs })),
    }
}

pub fn rename_document(db: &Database, args: Value) -> Result<Value> {
    let document_id = require_string(&args, "document")?;
    let title = require_string(&args, "title")?;

    let doc = db
        .rename_document(&document_id, &title)?
        .ok_or_else(|| ToolError::document_not_found(&document_id))?;

    Ok(json!({
        "document_id": doc.id,
        "title": doc.title,
        "updated_at": doc.updated_at
    }))
}

pub fn move_document(db: &Database, args: Value) -> Result<Value> {
    let document_id = require_string(&args, "document")?;
    let project = get_string(&args, "project").filter(|p| !p.is_empty());

    let doc = db
        .set_document_project(&document_id, project.as_deref())?
        .ok_or_else(|| ToolError::document_not_found(&document_id))?;

    Ok(json!({
        "document_id": doc.id,
        "project_id": doc.project_id,
        "updated_at": doc.updated_at
    }))
}

pub fn delete_document(db: &Database, args: Value) -> Result<Value> {
    let document_id = require_string(&args, "document")?;

    if !db.delete_document(&document_id)? {
        return Err(ToolError::document_not_found(&document_id).into());
    }

    Ok(json!({ "document_id": document_id, "deleted": true }))
}

pub fn save_document_content(
    db: &Database,
    ids: &IdsConfig,
    args: Value,
    ctx: &ToolContext,
) -> Result<Value> {
    let document_id = require_string(&args, "document")?;
    // An empty string reaches the parser and is reported as invalid content.
    let content = get_string(&args, "content").ok_or_else(|| ToolError::missing_field("content"))?;

    let mut rng = rand::thread_rng();
    let outcome = match db.save_document_content(&document_id, &content, ids, &mut rng) {
        Ok(outcome) => outcome,
        Err(e @ SyncError::InvalidContent(_)) => {
            ctx.logger
                .warning(&format!("Rejected content for document {}: {}", document_id, e));
            return Err(ToolError::from(e).into());
        }
        Err(e) => return Err(ToolError::from(e).into()),
    };

    let changes = outcome.changes;
    ctx.logger.debug(&format!(
        "Synced document {}: +{} ~{} -{} ={}",
        document_id, changes.inserted, changes.updated, changes.deleted, changes.unchanged
    ));

    Ok(json!({
        "document_id": document_id,
        "todo_count": outcome.todo_count,
        "completed_count": outcome.completed_count,
        "changes": changes
    }))
}
