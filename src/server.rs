//! MCP tool server over stdio.
//!
//! Speaks newline-delimited JSON-RPC 2.0: one request per line in, one
//! response per line out. Only the tool subset of the protocol is served
//! (`initialize`, `ping`, `tools/list`, `tools/call`). Notifications are
//! accepted and never answered.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::tools::LastFmTools;

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "Last.fm (Unofficial) MCP Server";

/// Protocol revision offered when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Serves [`LastFmTools`] to a single client.
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: LastFmTools,
}

impl McpServer {
    pub fn new(tools: LastFmTools) -> Self {
        Self { tools }
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Answer requests from `reader` on `writer` until end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("{} v{} ready", SERVER_NAME, env!("CARGO_PKG_VERSION"));

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        info!("input closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("unparseable message: {}", e);
                return Some(Response::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let Some(id) = request.id else {
            debug!("notification {}", request.method);
            return None;
        };

        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        debug!("request {}", method);

        match method {
            "initialize" => Ok(self.initialize(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.definitions() })),
            "tools/call" => self.call_tool(params).await,
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        json!({
            "protocolVersion": version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    /// Tool failures are results with `isError` set, not protocol errors.
    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let call: CallParams = serde_json::from_value(params)
            .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))?;

        if !LastFmTools::has_tool(&call.name) {
            return Err(RpcError::new(
                INVALID_PARAMS,
                format!("Unknown tool: {}", call.name),
            ));
        }

        let (text, is_error) = match self.tools.call(&call.name, call.arguments).await {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("{} failed: {}", call.name, e);
                (e.to_string(), true)
            }
        };

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "isError": is_error
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn server() -> McpServer {
        let config = Config::new("test-key")
            .unwrap()
            .with_base_url("http://127.0.0.1:9/");
        McpServer::new(LastFmTools::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = server().handle_line("{not json").await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let line = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(server().handle_line(line).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let line = r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#;
        let response = server().handle_line(line).await.unwrap();
        assert_eq!(response.id, json!(7));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_echoes_requested_version() {
        let line = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#;
        let result = server().handle_line(line).await.unwrap().result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn test_call_with_bad_params() {
        let line = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{}}"#;
        let response = server().handle_line(line).await.unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

        let line = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_weather"}}"#;
        let response = server().handle_line(line).await.unwrap();
        assert_eq!(response.error.unwrap().message, "Unknown tool: get_weather");
    }

    #[tokio::test]
    async fn test_tool_failure_is_flagged() {
        let line = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_now_playing"}}"#;
        let result = server().handle_line(line).await.unwrap().result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Username is required (no default username configured)"
        );
    }
}
