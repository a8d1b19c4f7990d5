//! Per-request context passed to tool functions.

use crate::logging::Logger;

/// Per-request context passed to all tools.
#[derive(Clone, Default)]
pub struct ToolContext {
    /// Logger for this call; mirrors to the MCP client when one is attached.
    pub logger: Logger,
}

impl ToolContext {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}
