//! taskdoc-mcp
//!
//! MCP server and CLI for rich-text documents whose checklist items are kept
//! in sync with a task table.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rmcp::{
    ErrorData, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParams, CallToolResult, Content, InitializeResult, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities,
    },
    service::RequestContext,
    transport::io::stdio,
};
use serde_json::{Value, json};
use std::io::Read;
use std::sync::Arc;
use taskdoc_mcp::cli::{
    Cli, Command, DeleteArgs, ListArgs, MoveArgs, NewArgs, RenameArgs, SaveArgs, ShowArgs,
    TasksArgs,
};
use taskdoc_mcp::config::Config;
use taskdoc_mcp::db::Database;
use taskdoc_mcp::error::ToolError;
use taskdoc_mcp::format::{
    OutputFormat, format_document_markdown, format_documents_markdown, format_tasks_markdown,
};
use taskdoc_mcp::logging::{LogLevelFilter, Logger, init_tracing};
use taskdoc_mcp::tools::{ToolContext, ToolHandler};
use tracing::{debug, info, warn};

/// MCP server handler.
#[derive(Clone)]
struct TaskdocServer {
    tool_handler: Arc<ToolHandler>,
    /// Atomic level filter for logging (client can adjust via logging/setLevel).
    level_filter: Arc<LogLevelFilter>,
}

const INSTRUCTIONS: &str = "\
Rich-text documents with checklist tasks. create_document \u{2192} save_document_content(content=<editor JSON>) \u{2192} list_tasks(document=...).
Checklist items are taskItem nodes; give them a stable attrs.id so their task history survives edits.";

impl ServerHandler for TaskdocServer {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: Default::default(),
            server_info: rmcp::model::Implementation {
                name: "taskdoc-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                logging: Some(Default::default()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn set_level(
        &self,
        request: rmcp::model::SetLevelRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<(), ErrorData> {
        self.level_filter.set(request.level);
        info!(level = ?request.level, "Logging level updated via MCP");
        Ok(())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tool_handler.get_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let tool_name = request.name.clone();
        let start = std::time::Instant::now();

        let logger = Logger::new()
            .with_peer(context.peer.clone())
            .with_level_filter(Arc::clone(&self.level_filter))
            .with_name(format!("tool:{}", tool_name));
        let tool_ctx = ToolContext::new(logger);

        let args = Value::Object(request.arguments.unwrap_or_default());
        match self.tool_handler.call_tool(&tool_name, args, &tool_ctx).await {
            Ok(result) => {
                debug!(
                    tool = %tool_name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool call succeeded"
                );
                let text = serde_json::to_string_pretty(&result)
                    .unwrap_or_else(|_| result.to_string());
                Ok(CallToolResult {
                    content: vec![Content::text(text)],
                    is_error: None,
                    meta: None,
                    structured_content: None,
                })
            }
            Err(e) => {
                let tool_err = ToolError::from(e);
                warn!(
                    tool = %tool_name,
                    error_code = ?tool_err.code,
                    error_message = %tool_err.message,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool call failed"
                );
                let error_json = serde_json::to_string(&tool_err)
                    .unwrap_or_else(|_| json!({ "error": tool_err.to_string() }).to_string());
                Ok(CallToolResult {
                    content: vec![Content::text(error_json)],
                    is_error: Some(true),
                    meta: None,
                    structured_content: None,
                })
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log, cli.verbose)?;

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(db_path) = cli.database {
        config.server.db_path = db_path;
    }
    config.ensure_db_dir()?;

    match cli.command {
        Some(Command::New(args)) => run_new(&config, args),
        Some(Command::List(args)) => run_list(&config, args),
        Some(Command::Show(args)) => run_show(&config, args),
        Some(Command::Rename(args)) => run_rename(&config, args),
        Some(Command::Move(args)) => run_move(&config, args),
        Some(Command::Delete(args)) => run_delete(&config, args),
        Some(Command::Save(args)) => run_save(&config, args),
        Some(Command::Tasks(args)) => run_tasks(&config, args),
        Some(Command::Serve) | None => run_server(config).await,
    }
}

async fn run_server(config: Config) -> Result<()> {
    info!("Database: {:?}", config.server.db_path);

    let db = Arc::new(Database::open(&config.server.db_path)?);
    let server = TaskdocServer {
        tool_handler: Arc::new(ToolHandler::new(db, config.ids.clone())),
        level_filter: Arc::new(LogLevelFilter::default()),
    };

    info!("Server ready, listening on stdio");
    let transport = stdio();
    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}

fn open_db(config: &Config) -> Result<Database> {
    Database::open(&config.server.db_path)
        .with_context(|| format!("opening database {}", config.server.db_path.display()))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_new(config: &Config, args: NewArgs) -> Result<()> {
    let db = open_db(config)?;
    let doc = db.create_document(&args.title, args.project.as_deref())?;
    println!("{}", doc.id);
    Ok(())
}

fn run_list(config: &Config, args: ListArgs) -> Result<()> {
    let db = open_db(config)?;
    let docs = db.list_documents(args.project.as_deref())?;
    match args.format {
        OutputFormat::Json => print_json(&docs),
        OutputFormat::Markdown => {
            print!("{}", format_documents_markdown(&docs));
            Ok(())
        }
    }
}

fn run_show(config: &Config, args: ShowArgs) -> Result<()> {
    let db = open_db(config)?;
    let doc = db
        .get_document(&args.document)?
        .ok_or_else(|| anyhow!("Document not found: {}", args.document))?;
    let tasks = db.list_document_tasks(&doc.id)?;
    match args.format {
        OutputFormat::Json => print_json(&json!({ "document": doc, "tasks": tasks })),
        OutputFormat::Markdown => {
            print!("{}", format_document_markdown(&doc, &tasks));
            Ok(())
        }
    }
}

fn run_rename(config: &Config, args: RenameArgs) -> Result<()> {
    let db = open_db(config)?;
    db.rename_document(&args.document, &args.title)?
        .ok_or_else(|| anyhow!("Document not found: {}", args.document))?;
    Ok(())
}

fn run_move(config: &Config, args: MoveArgs) -> Result<()> {
    let db = open_db(config)?;
    db.set_document_project(&args.document, args.project.as_deref())?
        .ok_or_else(|| anyhow!("Document not found: {}", args.document))?;
    Ok(())
}

fn run_delete(config: &Config, args: DeleteArgs) -> Result<()> {
    let db = open_db(config)?;
    if !db.delete_document(&args.document)? {
        return Err(anyhow!("Document not found: {}", args.document));
    }
    Ok(())
}

fn run_save(config: &Config, args: SaveArgs) -> Result<()> {
    let content = match args.file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let db = open_db(config)?;
    let outcome =
        db.save_document_content(&args.document, &content, &config.ids, &mut rand::thread_rng())?;
    print_json(&outcome)
}

fn run_tasks(config: &Config, args: TasksArgs) -> Result<()> {
    let db = open_db(config)?;
    let mut tasks = match (&args.document, &args.project) {
        (Some(document_id), _) => {
            if db.get_document(document_id)?.is_none() {
                return Err(anyhow!("Document not found: {}", document_id));
            }
            db.list_document_tasks(document_id)?
        }
        (None, Some(project_id)) => db.list_project_tasks(project_id, args.open)?,
        (None, None) => return Err(anyhow!("either a document or --project is required")),
    };
    if args.open {
        tasks.retain(|t| !t.is_completed);
    }

    match args.format {
        OutputFormat::Json => print_json(&tasks),
        OutputFormat::Markdown => {
            print!("{}", format_tasks_markdown(&tasks));
            Ok(())
        }
    }
}
