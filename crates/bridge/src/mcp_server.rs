//! MCP adapter: advertises the weather operations as tools over streamable
//! HTTP and relays tool calls into the operation layer.
//!
//! Tool failures are reported as error-marked tool results, not protocol
//! errors, so MCP clients always receive a well-formed `tools/call` response
//! they can surface to the model.

use std::time::Duration;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    },
};
use serde_json::{Value, json};
use skybridge_weather_tools::{WeatherOp, WeatherToolSource};
use tracing::warn;

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct WeatherMcpServer {
    source: WeatherToolSource,
}

impl WeatherMcpServer {
    pub fn new(source: WeatherToolSource) -> Self {
        Self { source }
    }
}

/// Builds the streamable HTTP service for mounting under the bridge router.
pub fn streamable_http_service(
    source: WeatherToolSource,
) -> StreamableHttpService<WeatherMcpServer, LocalSessionManager> {
    StreamableHttpService::new(
        move || Ok(WeatherMcpServer::new(source.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(SSE_KEEP_ALIVE),
            sse_retry: None,
            cancellation_token: Default::default(),
        },
    )
}

impl ServerHandler for WeatherMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Weather data tools backed by WeatherAPI.com. All tools are read-only \
                 lookups; use search_locations to resolve an ambiguous place name before \
                 requesting weather for it."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.source.tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(Value::Object)
            .unwrap_or_else(|| json!({}));
        Ok(dispatch(&self.source, &request.name, args).await)
    }
}

async fn dispatch(source: &WeatherToolSource, name: &str, args: Value) -> CallToolResult {
    let Some(op) = WeatherOp::from_tool_name(name) else {
        return error_result(format!("Unknown tool: {name}"));
    };

    match source.call(op, &args).await {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => {
            warn!(tool = name, error = %e, "tool call failed");
            error_result(format!("Error: {e}"))
        }
    }
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(message)],
        structured_content: None,
        is_error: Some(true),
        meta: None,
    }
}
