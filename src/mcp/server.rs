//! MCP server exposing the Needle tool catalog over any rmcp transport (stdio in production)

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;
use tracing::debug;

use crate::gateway::ToolGateway;
use crate::tools::{NeedleTool, ToolArguments};

const INSTRUCTIONS: &str = "Manage Needle document collections and run semantic search over them. \
Create a collection, add files to it by public URL, then search it with natural-language queries.";

/// MCP handler that forwards every tool call to the Needle gateway
#[derive(Clone)]
pub struct NeedleServer {
    gateway: Arc<ToolGateway>,
}

impl NeedleServer {
    pub fn new(gateway: ToolGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    /// The advertised tool list, in catalog order
    pub fn tools() -> Vec<Tool> {
        NeedleTool::catalog()
            .into_iter()
            .map(|t| Tool {
                name: t.name.into(),
                title: None,
                description: Some(t.description.into()),
                input_schema: Arc::new(t.input_schema),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Invoke a tool and convert the outcome into an MCP tool result
    pub async fn handle_call(
        &self,
        params: CallToolRequestParams,
    ) -> Result<CallToolResult, McpError> {
        let arguments = ToolArguments::from(params.arguments);

        match self.gateway.invoke(&params.name, arguments).await {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value).map_err(|e| {
                    McpError::internal_error(format!("Failed to encode tool result: {}", e), None)
                })?;
                Ok(CallToolResult {
                    meta: None,
                    content: vec![Content::text(text)],
                    structured_content: Some(value),
                    is_error: Some(false),
                })
            }
            Err(e) => e.into_tool_outcome(),
        }
    }
}

impl ServerHandler for NeedleServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        debug!("Listing Needle tools");
        Ok(ListToolsResult {
            meta: None,
            tools: Self::tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Calling tool: {}", params.name);
        self.handle_call(params).await
    }
}
