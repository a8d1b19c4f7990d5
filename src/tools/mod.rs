//! MCP tool implementations.

pub mod context;
pub mod documents;
pub mod tasks;

pub use context::ToolContext;

use crate::config::IdsConfig;
use crate::db::Database;
use crate::error::ToolError;
use anyhow::Result;
use rmcp::model::Tool;
use serde_json::Value;
use std::sync::Arc;

/// Tool handler that processes MCP tool calls.
pub struct ToolHandler {
    pub db: Arc<Database>,
    pub ids: IdsConfig,
}

impl ToolHandler {
    pub fn new(db: Arc<Database>, ids: IdsConfig) -> Self {
        Self { db, ids }
    }

    /// Get all available tools.
    pub fn get_tools(&self) -> Vec<Tool> {
        let mut tools = Vec::new();
        tools.extend(documents::get_tools());
        tools.extend(tasks::get_tools());
        tools
    }

    /// Call a tool by name.
    pub async fn call_tool(&self, name: &str, arguments: Value, ctx: &ToolContext) -> Result<Value> {
        match name {
            // Document tools
            "create_document" => documents::create_document(&self.db, arguments),
            "get_document" => documents::get_document(&self.db, arguments),
            "list_documents" => documents::list_documents(&self.db, arguments),
            "rename_document" => documents::rename_document(&self.db, arguments),
            "move_document" => documents::move_document(&self.db, arguments),
            "delete_document" => documents::delete_document(&self.db, arguments),
            "save_document_content" => {
                documents::save_document_content(&self.db, &self.ids, arguments, ctx)
            }

            // Task tools
            "list_tasks" => tasks::list_tasks(&self.db, arguments),

            _ => Err(ToolError::unknown_tool(name).into()),
        }
    }
}

/// Helper to create a tool definition.
pub fn make_tool(name: &str, description: &str, properties: Value, required: Vec<&str>) -> Tool {
    let input_schema = rmcp::model::JsonObject::from_iter([
        ("type".to_string(), serde_json::json!("object")),
        ("properties".to_string(), properties),
        ("required".to_string(), serde_json::json!(required)),
    ]);

    Tool::new(name.to_string(), description.to_string(), input_schema)
}

/// Helper to get a string from arguments.
pub fn get_string(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(|v| v.as_str().map(String::from))
}

/// Helper to get a required, non-empty string from arguments.
pub fn require_string(args: &Value, key: &str) -> Result<String, ToolError> {
    get_string(args, key)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::missing_field(key))
}

/// Helper to get a bool from arguments.
pub fn get_bool(args: &Value, key: &str) -> Option<bool> {
    args.get(key).and_then(|v| v.as_bool())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn argument_helpers() {
        let args = json!({ "a": "x", "empty": "", "flag": true, "n": 3 });
        assert_eq!(get_string(&args, "a").as_deref(), Some("x"));
        assert_eq!(get_string(&args, "n"), None);
        assert_eq!(get_bool(&args, "flag"), Some(true));
        assert!(require_string(&args, "empty").is_err());
        assert!(require_string(&args, "missing").is_err());
    }

    #[test]
    fn every_tool_has_an_object_schema() {
        let handler = ToolHandler::new(
            Arc::new(Database::open_in_memory().unwrap()),
            IdsConfig::default(),
        );
        let tools = handler.get_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        assert!(names.contains(&"save_document_content".to_string()));
        assert!(names.contains(&"list_tasks".to_string()));
        for tool in &tools {
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
        }
    }
}
