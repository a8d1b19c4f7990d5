//! taskdoc-mcp library
//!
//! Rich-text documents whose checklist items are mirrored into a task table.
//! The entry point of interest is
//! [`Database::save_document_content`](db::Database::save_document_content).

pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod sync;
pub mod tools;
pub mod types;
