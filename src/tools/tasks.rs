//! Task listing tools. Task records are written only by `save_document_content`.

use super::{get_bool, get_string, make_tool};
use crate::db::Database;
use crate::error::{ErrorCode, ToolError};
use crate::format::{OutputFormat, format_tasks_markdown, markdown_to_json};
use anyhow::Result;
use rmcp::model::Tool;
use serde_json::{Value, json};

pub fn get_tools() -> Vec<Tool> {
    vec![make_tool(
        "list_tasks",
        "List checklist tasks of one document (in checklist order) or of a whole project.",
        json!({
            "document": { "type": "string", "description": "Document ID" },
            "project": { "type": "string", "description": "Project ID (used when document is omitted)" },
            "open_only": { "type": "boolean", "description": "Skip completed tasks" },
            "format": {
                "type": "string",
                "enum": ["json", "markdown"],
                "description": "Output format (default: json)"
            }
        }),
        vec![],
    )]
}

pub fn list_tasks(db: &Database, args: Value) -> Result<Value> {
    let open_only = get_bool(&args, "open_only").unwrap_or(false);
    let format = match get_string(&args, "format") {
        None => OutputFormat::Json,
        Some(s) => OutputFormat::parse(&s)
            .ok_or_else(|| ToolError::invalid_value("format", "format must be json or markdown"))?,
    };

    let mut tasks = match (get_string(&args, "document"), get_string(&args, "project")) {
        (Some(document_id), _) => {
            if db.get_document(&document_id)?.is_none() {
                return Err(ToolError::document_not_found(&document_id).into());
            }
            db.list_document_tasks(&document_id)?
        }
        (None, Some(project_id)) => db.list_project_tasks(&project_id, open_only)?,
        (None, None) => {
            return Err(ToolError::new(
                ErrorCode::MissingRequiredField,
                "document or project is required",
            )
            .with_field("document")
            .into());
        }
    };

    if open_only {
        tasks.retain(|t| !t.is_completed);
    }

    match format {
        OutputFormat::Markdown => Ok(markdown_to_json(format_tasks_markdown(&tasks))),
        OutputFormat::Json => Ok(json!({ "tasks": tasks, "count": tasks.len() })),
    }
}
