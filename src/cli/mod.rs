//! CLI command definitions for taskdoc-mcp
//!
//! This module defines the CLI structure using clap's derive macros.
//! Without a subcommand the binary runs the MCP server on stdio.

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rich-text documents with synced checklist tasks: MCP server and CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the MCP server (default if no subcommand given)
    Serve,

    /// Create an empty document
    New(NewArgs),

    /// List documents
    List(ListArgs),

    /// Show a document and its tasks
    Show(ShowArgs),

    /// Rename a document
    Rename(RenameArgs),

    /// Assign a document and its tasks to a project
    Move(MoveArgs),

    /// Delete a document and its tasks
    Delete(DeleteArgs),

    /// Save document content and sync its checklist tasks
    Save(SaveArgs),

    /// List checklist tasks of a document or project
    Tasks(TasksArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Document title
    pub title: String,

    /// Project the document belongs to
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only documents in this project
    #[arg(short, long)]
    pub project: Option<String>,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Document ID
    pub document: String,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Document ID
    pub document: String,

    /// New title
    pub title: String,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Document ID
    pub document: String,

    /// Target project; omit to clear the project
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document ID
    pub document: String,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Document ID
    pub document: String,

    /// File holding the serialized document tree (default: stdin)
    #[arg(short = 'i', long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TasksArgs {
    /// Document ID
    #[arg(required_unless_present = "project", conflicts_with = "project")]
    pub document: Option<String>,

    /// List tasks across a project instead of one document
    #[arg(short, long)]
    pub project: Option<String>,

    /// Skip completed tasks
    #[arg(long)]
    pub open: bool,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
