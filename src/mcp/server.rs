//! MCP Server implementation
//!
//! Line-delimited JSON-RPC over stdio. One request is read, dispatched and
//! answered before the next line is read.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;
use crate::weather::WeatherLookup;

/// MCP Server info
const SERVER_NAME: &str = "weather-mcp-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Methods the dispatcher knows how to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    Ping,
    ListTools,
    CallTool,
}

const METHOD_TABLE: &[(&str, Method)] = &[
    (methods::INITIALIZE, Method::Initialize),
    (methods::INITIALIZED, Method::Initialized),
    (methods::PING, Method::Ping),
    (methods::LIST_TOOLS, Method::ListTools),
    (methods::CALL_TOOL, Method::CallTool),
];

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        METHOD_TABLE
            .iter()
            .find(|(method, _)| *method == name)
            .map(|(_, handler)| *handler)
    }
}

/// Routes parsed requests to their handlers
pub struct Dispatcher {
    /// Tool handler
    tool_handler: ToolHandler,
}

impl Dispatcher {
    pub fn new(lookup: Arc<dyn WeatherLookup>) -> Self {
        Self {
            tool_handler: ToolHandler::new(lookup),
        }
    }

    /// Produce the result payload for a request, or the error to send back
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> std::result::Result<Value, JsonRpcError> {
        let method = Method::from_name(&request.method)
            .ok_or_else(|| JsonRpcError::method_not_found(&request.method))?;

        match method {
            Method::Initialize => self.handle_initialize(),
            Method::Initialized | Method::Ping => Ok(Value::Object(Default::default())),
            Method::ListTools => self.handle_list_tools(),
            Method::CallTool => self.handle_call_tool(request).await,
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> std::result::Result<Value, JsonRpcError> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> std::result::Result<Value, JsonRpcError> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, request: &JsonRpcRequest) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = match request.params.as_ref() {
            Some(p) => serde_json::from_value(p.clone())
                .map_err(|e| JsonRpcError::internal_error(format!("invalid tools/call params: {}", e)))?,
            None => return Err(JsonRpcError::internal_error("tools/call requires a tool name")),
        };

        tracing::debug!("Calling tool {}", params.name);
        let result = self
            .tool_handler
            .call_tool(&params.name, params.arguments)
            .await?;

        Ok(serde_json::to_value(result)?)
    }
}

/// MCP Server for weather lookups
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(lookup: Arc<dyn WeatherLookup>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(lookup)),
        }
    }

    /// Run the server on stdio
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader` until end of input, answering on `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("MCP server ready, waiting for JSON-RPC requests");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    tracing::info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Failed to read from stdin: {}", e);
                    break;
                }
            }

            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle an incoming JSON-RPC message.
    ///
    /// Returns `None` only for client notifications, which get no reply.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(message.trim()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Rejected malformed JSON: {}", e);
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };

        let id = RequestId::from_message(&raw);

        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error(format!("not a JSON-RPC request: {}", e)),
                ));
            }
        };

        let silent = request.is_notification()
            && request.method.starts_with(methods::NOTIFICATION_PREFIX);

        tracing::debug!("Dispatching {}", request.method);
        let outcome = self.dispatch_isolated(request).await;

        if silent {
            if let Err(e) = outcome {
                tracing::debug!("Ignoring failed notification: {}", e);
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    /// Dispatch on its own task so a panicking handler becomes an internal error
    async fn dispatch_isolated(&self, request: JsonRpcRequest) -> std::result::Result<Value, JsonRpcError> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let method = request.method.clone();

        match tokio::spawn(async move { dispatcher.dispatch(&request).await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Handler for {} failed: {}", method, e);
                Err(JsonRpcError::internal_error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{CityRegistry, WeatherReport};
    use async_trait::async_trait;

    struct PanickingLookup {
        cities: CityRegistry,
    }

    #[async_trait]
    impl WeatherLookup for PanickingLookup {
        async fn lookup(&self, _city: &str) -> WeatherReport {
            panic!("lookup exploded");
        }

        fn cities(&self) -> &CityRegistry {
            &self.cities
        }
    }

    fn server() -> McpServer {
        McpServer::new(Arc::new(PanickingLookup {
            cities: CityRegistry::default(),
        }))
    }

    #[test]
    fn test_server_info() {
        assert_eq!(SERVER_NAME, "weather-mcp-server");
    }

    #[test]
    fn test_method_table() {
        assert_eq!(Method::from_name("tools/list"), Some(Method::ListTools));
        assert_eq!(Method::from_name("tools/call"), Some(Method::CallTool));
        assert_eq!(Method::from_name("resources/list"), None);
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_internal_error() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"get_temperature","arguments":{"city":"delhi"}}}"#)
            .await
            .unwrap();

        assert_eq!(response.id, Some(RequestId::Number(9.into())));
        assert_eq!(response.error.unwrap().code, codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_initialized_notification_is_silent() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_request_without_method_echoes_id() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":"a1","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Some(RequestId::String("a1".to_string())));
        assert_eq!(response.error.unwrap().code, codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_call_without_params() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call"}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_missing_city_is_internal_error() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_temperature","arguments":{}}}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Some(RequestId::Number(1.into())));
        let error = response.error.unwrap();
        assert_eq!(error.code, codes::INTERNAL_ERROR);
        assert!(error.message.contains("city"));
    }

    #[tokio::test]
    async fn test_non_object_is_internal_error() {
        let response = server().handle_message("42").await.unwrap();
        assert_eq!(response.id, None);
        assert_eq!(response.error.unwrap().code, codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_fractional_and_wide_ids_are_echoed() {
        for raw in [
            r#"{"jsonrpc":"2.0","id":1.5,"method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","id":18446744073709551615,"method":"tools/list"}"#,
        ] {
            let response = server().handle_message(raw).await.unwrap();
            let echoed = serde_json::to_value(&response).unwrap();
            let request: Value = serde_json::from_str(raw).unwrap();
            assert_eq!(echoed["id"], request["id"]);
            assert!(echoed["result"]["tools"].is_array());
        }
    }
}
