//! # MCP Server
//!
//! Implements the rmcp `ServerHandler` for the Paper Invest tools.
//! Tool listing and calls are both driven by the catalog, so no per-tool routing lives here.

use rmcp::ServiceExt;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::Value;
use std::sync::Arc;

use crate::application::catalog::ToolSpec;
use crate::application::dispatch::Dispatcher;
use crate::domain::error::ToolError;
use crate::strings::{logs, messages};

/// MCP server exposing the trading API as tools
#[derive(Clone)]
pub struct PaperInvestServer {
    dispatcher: Arc<Dispatcher>,
}

impl PaperInvestServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Catalog entries in the form the host expects
    pub fn tool_list(&self) -> Vec<Tool> {
        self.dispatcher.tools().iter().map(to_tool).collect()
    }

    /// Run a call through the dispatcher and wrap the outcome.
    pub async fn invoke(&self, request: CallToolRequestParam) -> CallToolResult {
        let result = self
            .dispatcher
            .call(&request.name, request.arguments.as_ref())
            .await;
        into_call_result(&request.name, result)
    }

    /// Serve over stdin/stdout until the host disconnects.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(rmcp::transport::stdio()).await?;
        tracing::info!("{}", logs::SERVER_READY);

        service.waiting().await?;
        tracing::info!("{}", logs::SERVER_SHUTDOWN);
        Ok(())
    }
}

fn to_tool(entry: &ToolSpec) -> Tool {
    Tool::new(entry.name, entry.description, Arc::new(entry.input_schema()))
}

/// Success carries the pretty-printed response body; failures become an
/// error-flagged result rather than a protocol error.
fn into_call_result(name: &str, result: Result<Value, ToolError>) -> CallToolResult {
    match result {
        Ok(body) => {
            let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(err) => {
            tracing::warn!("{}", logs::tool_failed(name, &err.to_string()));
            let payload = err.payload().map(Value::to_string);
            CallToolResult::error(vec![Content::text(messages::tool_error(
                &err.to_string(),
                payload.as_deref(),
            ))])
        }
    }
}

impl ServerHandler for PaperInvestServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: messages::SERVER_NAME.to_string(),
                title: Some(messages::SERVER_TITLE.to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(messages::SERVER_INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.invoke(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ApiError;
    use crate::domain::traits::ApiClient;
    use crate::domain::types::ApiRequest;
    use async_trait::async_trait;
    use serde_json::json;
    use std::borrow::Cow;

    struct StaticClient(fn() -> Result<Value, ApiError>);

    #[async_trait]
    impl ApiClient for StaticClient {
        async fn send(&self, _request: ApiRequest) -> Result<Value, ApiError> {
            (self.0)()
        }
    }

    fn server(reply: fn() -> Result<Value, ApiError>) -> PaperInvestServer {
        PaperInvestServer::new(Dispatcher::new(Arc::new(StaticClient(reply))))
    }

    fn call(name: &str, arguments: Option<Value>) -> CallToolRequestParam {
        CallToolRequestParam {
            name: Cow::Owned(name.to_string()),
            arguments: arguments.and_then(|v| v.as_object().cloned()),
        }
    }

    /// (text of the first content block, isError flag) as seen on the wire
    fn wire(result: &CallToolResult) -> (String, bool) {
        let value = serde_json::to_value(result).unwrap();
        let text = value["content"][0]["text"].as_str().unwrap().to_string();
        let is_error = value["isError"].as_bool().unwrap_or(false);
        (text, is_error)
    }

    fn ok_reply() -> Result<Value, ApiError> {
        Ok(json!({"id": "123"}))
    }

    fn funds_reply() -> Result<Value, ApiError> {
        Err(ApiError::Remote {
            status: 400,
            payload: Some(json!({"error": "insufficient funds"})),
        })
    }

    #[tokio::test]
    async fn test_success_body_passed_through() {
        let result = server(ok_reply)
            .invoke(call("get_order", Some(json!({"orderId": "o1"}))))
            .await;

        let (text, is_error) = wire(&result);
        assert!(!is_error);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"id": "123"}));
    }

    #[tokio::test]
    async fn test_remote_error_includes_payload() {
        let result = server(funds_reply)
            .invoke(call("create_order", Some(json!({"symbol": "AAPL"}))))
            .await;

        let (text, is_error) = wire(&result);
        assert!(is_error);
        assert!(text.starts_with("Error: Request failed with status code 400"));
        assert!(text.contains(r#"{"error":"insufficient funds"}"#));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let result = server(ok_reply)
            .invoke(call("transfer_funds", Some(json!({}))))
            .await;

        let (text, is_error) = wire(&result);
        assert!(is_error);
        assert!(text.contains("Unknown tool: transfer_funds"));
    }

    #[tokio::test]
    async fn test_missing_arguments_is_error_result() {
        let result = server(ok_reply).invoke(call("get_quote", None)).await;

        let (text, is_error) = wire(&result);
        assert!(is_error);
        assert_eq!(text, "Error: No arguments provided\n");
    }

    #[test]
    fn test_tool_list_matches_catalog() {
        let tools = server(ok_reply).tool_list();
        assert_eq!(tools.len(), crate::application::catalog::TOOLS.len());

        let order = tools.iter().find(|t| t.name == "create_order").unwrap();
        assert_eq!(order.description.as_deref(), Some("Create a new trading order"));
        assert_eq!(order.input_schema["type"], "object");
        assert!(order.input_schema["properties"].get("timeInForce").is_some());
    }

    #[test]
    fn test_server_info() {
        let info = server(ok_reply).get_info();
        assert_eq!(info.server_info.name, "paper-invest");
        assert!(info.capabilities.tools.is_some());
    }
}
