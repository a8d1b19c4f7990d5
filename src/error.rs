//! Error types: the sync engine's error and structured tool errors.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure of a document content save.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("invalid content: {0}")]
    InvalidContent(#[from] serde_json::Error),

    #[error("store failure: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,
    InvalidContent,

    // Not found errors
    DocumentNotFound,

    // Internal errors
    DatabaseError,
    InternalError,
    UnknownTool,
}

/// Structured error for tool responses.
#[derive(Debug, Serialize)]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn document_not_found(document_id: &str) -> Self {
        Self::new(
            ErrorCode::DocumentNotFound,
            format!("Document not found: {}", document_id),
        )
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorCode::UnknownTool, format!("Unknown tool: {}", name))
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ToolError {}

impl From<SyncError> for ToolError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::DocumentNotFound(id) => ToolError::document_not_found(&id),
            SyncError::InvalidContent(e) => {
                ToolError::new(ErrorCode::InvalidContent, format!("Invalid content: {}", e))
                    .with_field("content")
            }
            SyncError::Store(e) => ToolError::database(e),
        }
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ToolError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ToolError>() {
            Ok(tool_err) => tool_err,
            Err(err) => match err.downcast::<SyncError>() {
                Ok(sync_err) => sync_err.into(),
                Err(err) => match err.downcast::<rusqlite::Error>() {
                    Ok(db_err) => ToolError::database(db_err),
                    Err(err) => ToolError::internal(err),
                },
            },
        }
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = std::result::Result<T, ToolError>;
