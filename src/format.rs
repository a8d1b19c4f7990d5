//! Output formatting utilities for markdown and JSON.

use crate::types::{Document, DocumentSummary, TaskRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

fn format_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn checkbox(task: &TaskRecord) -> &'static str {
    if task.is_completed { "[x]" } else { "[ ]" }
}

/// Format a document header and its checklist as markdown.
pub fn format_document_markdown(doc: &Document, tasks: &[TaskRecord]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n", doc.title));
    md.push_str(&format!("- **id**: `{}`\n", doc.id));
    if let Some(ref project) = doc.project_id {
        md.push_str(&format!("- **project**: {}\n", project));
    }
    md.push_str(&format!(
        "- **tasks**: {}/{} done\n",
        doc.completed_count, doc.todo_count
    ));
    md.push_str(&format!("- **updated**: {}\n", format_ms(doc.updated_at)));

    if !tasks.is_empty() {
        md.push_str("\n## Tasks\n");
        md.push_str(&format_tasks_markdown(tasks));
    }

    md
}

/// Format task records as a markdown checklist.
pub fn format_tasks_markdown(tasks: &[TaskRecord]) -> String {
    let mut md = String::new();
    for task in tasks {
        md.push_str(&format!("- {} {}", checkbox(task), task.text));
        if let Some(done) = task.completed_at {
            md.push_str(&format!(" _(done {})_", format_ms(done)));
        }
        md.push('\n');
    }
    md
}

/// Format a document listing as markdown.
pub fn format_documents_markdown(docs: &[DocumentSummary]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Documents ({})\n\n", docs.len()));
    for doc in docs {
        md.push_str(&format!(
            "- **{}** `{}` {}/{} done",
            doc.title, doc.id, doc.completed_count, doc.todo_count
        ));
        if let Some(ref project) = doc.project_id {
            md.push_str(&format!(" [{}]", project));
        }
        md.push('\n');
    }

    md
}

pub fn markdown_to_json(md: String) -> Value {
    serde_json::json!({
        "format": "markdown",
        "content": md
    })
}
