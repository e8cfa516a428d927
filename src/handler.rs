use std::sync::Arc;

use async_trait::async_trait;
use rust_mcp_sdk::schema::{
    CallToolRequest, CallToolResult, ListToolsRequest, ListToolsResult, RpcError,
    schema_utils::CallToolError,
};
use rust_mcp_sdk::{McpServer, mcp_server::ServerHandler};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::tools::BlockSearchTools;

/// MCP handler serving the `search` and `list_files` tools
///
/// Paths in tool arguments are resolved against the process working
/// directory, which the server binary sets at startup.
pub struct BlockSearchServerHandler {
    config: Arc<Config>,
}

impl BlockSearchServerHandler {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl ServerHandler for BlockSearchServerHandler {
    async fn handle_list_tools_request(
        &self,
        _request: ListToolsRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<ListToolsResult, RpcError> {
        let tools = BlockSearchTools::tools();
        debug!("listing {} tools", tools.len());

        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools,
        })
    }

    async fn handle_call_tool_request(
        &self,
        request: CallToolRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        debug!("calling tool: {}", request.params.name);

        let tool = BlockSearchTools::try_from(request.params).map_err(|e| {
            error!("invalid tool parameters: {}", e);
            CallToolError::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid tool parameters: {}", e),
            ))
        })?;

        let result = match &tool {
            BlockSearchTools::SearchBlocksTool(tool) => {
                info!("search '{}' in {}", tool.query, tool.path.as_deref().unwrap_or("."));
                tool.call_tool(&self.config).await
            }
            BlockSearchTools::ListFilesTool(tool) => {
                info!("list_files in {}", tool.path.as_deref().unwrap_or("."));
                tool.call_tool(&self.config).await
            }
        };

        result.map_err(|e| {
            error!("tool failed: {:#}", e);
            CallToolError::new(std::io::Error::other(format!("{:#}", e)))
        })
    }
}
