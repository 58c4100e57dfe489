//! Remote keyword server
//!
//! Serves the remote keyword protocol over JSON-RPC 2.0 on two transports:
//! a line-oriented stdio loop and an HTTP endpoint (`POST /rpc`) with
//! monitoring routes (`GET /health`, `GET /status`).
//!
//! # Security
//!
//! Optional token authentication via the `KEYWORD_WEB_TOKEN` environment
//! variable. When set, every request must carry a matching `auth_token`
//! field in its params or it is rejected. When unset, authentication is
//! disabled. Token comparison is constant-time.

use crate::cors::cors_layer;
use crate::error::Result;
use crate::handlers::{health_handler, status_handler, AppState};
use crate::keyword::registry::{spec, KeywordRegistry};
use crate::keyword::types::{
    JsonRpcRequest, JsonRpcResponse, KeywordQueryParams, RunKeywordParams, RunStatus, ServerInfo,
};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Notify;
use tracing::{debug, error, info, instrument, warn};

/// Environment variable holding the authentication token
const TOKEN_ENV_VAR: &str = "KEYWORD_WEB_TOKEN";

/// JSON-RPC error code for authentication failure (server error range)
const AUTH_ERROR_CODE: i32 = -32001;

/// Remote keyword server state
pub struct KeywordServer {
    /// Keyword registry the server dispatches into
    registry: KeywordRegistry,
    /// Server identity
    info: ServerInfo,
    /// Monitoring state shared with the HTTP handlers
    state: Arc<AppState>,
    /// Set by `stop_remote_server`
    stopping: AtomicBool,
    /// Wakes the HTTP transport for graceful shutdown
    shutdown: Notify,
    /// Optional authentication token (from `KEYWORD_WEB_TOKEN`)
    auth_token: Option<String>,
}

impl KeywordServer {
    /// Create a server over the given registry.
    ///
    /// Loads the authentication token from `KEYWORD_WEB_TOKEN` if set.
    pub fn new(registry: KeywordRegistry) -> Self {
        let auth_token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());

        if auth_token.is_some() {
            info!("Keyword server authentication enabled via {}", TOKEN_ENV_VAR);
        } else {
            warn!(
                "Keyword server running without authentication. Set {} to enable.",
                TOKEN_ENV_VAR
            );
        }

        Self {
            registry,
            info: ServerInfo::default(),
            state: Arc::new(AppState::new()),
            stopping: AtomicBool::new(false),
            shutdown: Notify::new(),
            auth_token,
        }
    }

    /// Create a server with a specific authentication token (primarily for
    /// tests; production loads the token from the environment).
    pub fn with_auth_token(registry: KeywordRegistry, token: impl Into<String>) -> Self {
        let token = token.into();
        let mut server = Self::new(registry);
        server.auth_token = if token.is_empty() { None } else { Some(token) };
        server
    }

    /// Whether authentication is enabled.
    pub fn is_auth_enabled(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Whether `stop_remote_server` has been requested.
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Relaxed)
    }

    /// Monitoring state shared with the HTTP handlers.
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Validate authentication for an incoming request.
    fn validate_auth(&self, request: &JsonRpcRequest) -> std::result::Result<(), JsonRpcResponse> {
        let expected = match &self.auth_token {
            Some(token) => token,
            None => return Ok(()),
        };

        let provided = request
            .params
            .as_ref()
            .and_then(|p| p.get("auth_token"))
            .and_then(|v| v.as_str());

        match provided {
            Some(token) if constant_time_eq(token, expected) => {
                debug!("Authentication successful for method: {}", request.method);
                Ok(())
            }
            Some(_) => {
                warn!(method = %request.method, "Authentication failed: invalid token");
                Err(JsonRpcResponse::error(
                    request.id.clone(),
                    AUTH_ERROR_CODE,
                    "Authentication failed: invalid token",
                ))
            }
            None => {
                warn!(method = %request.method, "Authentication failed: missing auth_token");
                Err(JsonRpcResponse::error(
                    request.id.clone(),
                    AUTH_ERROR_CODE,
                    "Authentication required: missing auth_token in params",
                ))
            }
        }
    }

    /// Run the stdio transport until EOF or `stop_remote_server`.
    #[instrument(skip(self))]
    pub async fn run_stdio(&self) -> Result<()> {
        info!(
            "Starting keyword server (stdio): {} v{}",
            self.info.name, self.info.version
        );

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            if let Some(resp) = self.handle_line(&line).await {
                let json = serde_json::to_string(&resp).unwrap_or_else(|e| {
                    error!("Failed to serialize response: {}", e);
                    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#
                        .to_string()
                });

                debug!("Sending: {}", json);

                if let Err(e) = writeln!(stdout, "{}", json) {
                    error!("Failed to write response: {}", e);
                }
                if let Err(e) = stdout.flush() {
                    error!("Failed to flush stdout: {}", e);
                }
            }

            if self.is_stopping() {
                break;
            }
        }

        info!("Keyword server shutting down");
        Ok(())
    }

    /// Build the HTTP router: `POST /rpc` plus the monitoring routes.
    pub fn router(self: &Arc<Self>) -> Router {
        let monitor = Router::new()
            .route("/health", get(health_handler))
            .route("/status", get(status_handler))
            .with_state(self.state.clone());

        let rpc = Router::new()
            .route("/rpc", post(rpc_handler))
            .with_state(self.clone());

        monitor.merge(rpc).layer(cors_layer())
    }

    /// Run the HTTP transport on `host:port` until `stop_remote_server`.
    #[instrument(skip(self))]
    pub async fn serve_http(self: Arc<Self>, host: &str, port: u16) -> Result<()> {
        info!(
            "Starting keyword server (http): {} v{} on {}:{}",
            self.info.name, self.info.version, host, port
        );

        let app = self.router();

        let listener = tokio::net::TcpListener::bind((host, port)).await?;

        let server = self.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                server.shutdown.notified().await;
                info!("Keyword server shutting down");
            })
            .await?;

        Ok(())
    }

    /// Handle a single line of stdio input.
    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::parse_error());
            }
        };

        self.handle_request(request).await
    }

    /// Handle one JSON-RPC request.
    #[instrument(skip(self, request))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();
        let method = request.method.as_str();

        info!("Handling method: {}", method);

        if let Err(auth_error) = self.validate_auth(&request) {
            return Some(auth_error);
        }

        let result = match method {
            "get_keyword_names" => json!(self.registry.names()),

            "run_keyword" => {
                let params: RunKeywordParams = match request
                    .params
                    .clone()
                    .map(serde_json::from_value)
                    .transpose()
                {
                    Ok(Some(p)) => p,
                    Ok(None) => {
                        return Some(JsonRpcResponse::invalid_params(id, "missing params"))
                    }
                    Err(e) => {
                        return Some(JsonRpcResponse::invalid_params(id, &e.to_string()))
                    }
                };

                let start = Instant::now();
                let result = self.registry.run(&params.name, &params.args).await;
                self.state
                    .record_keyword(start.elapsed(), result.status == RunStatus::Fail);

                match serde_json::to_value(&result) {
                    Ok(v) => v,
                    Err(e) => return Some(JsonRpcResponse::internal_error(id, &e.to_string())),
                }
            }

            "get_keyword_arguments" => match self.keyword_query(&request) {
                Ok(s) => json!(s.args),
                Err(msg) => return Some(JsonRpcResponse::invalid_params(id, &msg)),
            },

            "get_keyword_documentation" => match self.keyword_query(&request) {
                Ok(s) => json!(s.doc),
                Err(msg) => return Some(JsonRpcResponse::invalid_params(id, &msg)),
            },

            "stop_remote_server" => {
                info!("Stop requested by client");
                self.stopping.store(true, Ordering::Relaxed);
                self.shutdown.notify_waiters();
                json!(true)
            }

            "ping" => json!({ "pong": true }),

            _ => {
                warn!("Unknown method: {}", method);
                return Some(JsonRpcResponse::method_not_found(id, method));
            }
        };

        Some(JsonRpcResponse::success(id, result))
    }

    /// Parse the keyword-introspection params and look the keyword up.
    fn keyword_query(
        &self,
        request: &JsonRpcRequest,
    ) -> std::result::Result<&'static crate::keyword::registry::KeywordSpec, String> {
        let params: KeywordQueryParams = request
            .params
            .clone()
            .ok_or_else(|| "missing params".to_string())
            .and_then(|p| serde_json::from_value(p).map_err(|e| e.to_string()))?;

        spec(&params.name).ok_or_else(|| format!("unknown keyword: {}", params.name))
    }
}

/// HTTP handler for `POST /rpc`.
async fn rpc_handler(
    State(server): State<Arc<KeywordServer>>,
    body: String,
) -> Json<Value> {
    let response = server.handle_line(&body).await;
    Json(serde_json::to_value(response).unwrap_or(Value::Null))
}

/// Constant-time string comparison.
///
/// Compares every byte position regardless of where the strings differ, so
/// response timing does not reveal how much of a token prefix was correct.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();

    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= (x ^ y) as usize;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserConfig;

    fn server() -> KeywordServer {
        std::env::remove_var(TOKEN_ENV_VAR);
        KeywordServer::new(KeywordRegistry::new(BrowserConfig::default()))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(json!(1)),
        }
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret123", "secret123"));
        assert!(constant_time_eq("", ""));
        assert!(!constant_time_eq("secret123", "secret124"));
        assert!(!constant_time_eq("secret123", "Secret123"));
        assert!(!constant_time_eq("short", "longer"));
        assert!(!constant_time_eq("abc", ""));
    }

    #[tokio::test]
    async fn test_server_new_without_auth() {
        let server = server();
        assert_eq!(server.info.name, "keyword-web");
        assert!(!server.is_auth_enabled());
        assert!(!server.is_stopping());
    }

    #[tokio::test]
    async fn test_with_auth_token() {
        let registry = KeywordRegistry::new(BrowserConfig::default());
        let server = KeywordServer::with_auth_token(registry, "test-secret");
        assert!(server.is_auth_enabled());

        let registry = KeywordRegistry::new(BrowserConfig::default());
        let server = KeywordServer::with_auth_token(registry, "");
        assert!(!server.is_auth_enabled());
    }

    #[tokio::test]
    async fn test_ping() {
        let server = server();
        let response = server.handle_request(request("ping", None)).await.unwrap();
        assert!(response.result.unwrap()["pong"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn test_get_keyword_names() {
        let server = server();
        let response = server
            .handle_request(request("get_keyword_names", None))
            .await
            .unwrap();
        let names = response.result.unwrap();
        let names = names.as_array().unwrap();
        assert_eq!(names.len(), 14);
        assert!(names.contains(&json!("select_checkbox")));
    }

    #[tokio::test]
    async fn test_get_keyword_arguments() {
        let server = server();
        let response = server
            .handle_request(request(
                "get_keyword_arguments",
                Some(json!({ "name": "open_browser" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap(), json!(["url", "browser_type"]));
    }

    #[tokio::test]
    async fn test_get_keyword_documentation() {
        let server = server();
        let response = server
            .handle_request(request(
                "get_keyword_documentation",
                Some(json!({ "name": "go_to" })),
            ))
            .await
            .unwrap();
        assert!(response
            .result
            .unwrap()
            .as_str()
            .unwrap()
            .contains("Navigates"));
    }

    #[tokio::test]
    async fn test_keyword_query_unknown_keyword() {
        let server = server();
        let response = server
            .handle_request(request(
                "get_keyword_arguments",
                Some(json!({ "name": "warp_drive" })),
            ))
            .await
            .unwrap();
        assert!(response.error.is_some());
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_run_keyword_missing_params() {
        let server = server();
        let response = server
            .handle_request(request("run_keyword", None))
            .await
            .unwrap();
        assert!(response.error.is_some());
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_run_keyword_unknown_keyword_is_fail_result() {
        let server = server();
        let response = server
            .handle_request(request(
                "run_keyword",
                Some(json!({ "name": "no_such_keyword", "args": [] })),
            ))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["status"], "FAIL");
        assert!(result["error"].as_str().unwrap().contains("no_such_keyword"));
    }

    #[tokio::test]
    async fn test_run_keyword_records_metrics() {
        let server = server();
        let before = server.state().keywords_executed();
        let _ = server
            .handle_request(request(
                "run_keyword",
                Some(json!({ "name": "set_browser_type", "args": ["firefox"] })),
            ))
            .await;
        assert_eq!(server.state().keywords_executed(), before + 1);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server();
        let response = server
            .handle_request(request("tools/call", None))
            .await
            .unwrap();
        assert!(response.error.is_some());
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_stop_remote_server() {
        let server = server();
        let response = server
            .handle_request(request("stop_remote_server", None))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap(), json!(true));
        assert!(server.is_stopping());
    }

    #[tokio::test]
    async fn test_auth_required_missing_token() {
        let registry = KeywordRegistry::new(BrowserConfig::default());
        let server = KeywordServer::with_auth_token(registry, "secret");
        let response = server.handle_request(request("ping", None)).await.unwrap();
        assert!(response.error.is_some());
        assert_eq!(response.error.unwrap().code, AUTH_ERROR_CODE);
    }

    #[tokio::test]
    async fn test_auth_invalid_token() {
        let registry = KeywordRegistry::new(BrowserConfig::default());
        let server = KeywordServer::with_auth_token(registry, "secret");
        let response = server
            .handle_request(request("ping", Some(json!({ "auth_token": "wrong" }))))
            .await
            .unwrap();
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_auth_valid_token() {
        let registry = KeywordRegistry::new(BrowserConfig::default());
        let server = KeywordServer::with_auth_token(registry, "secret");
        let response = server
            .handle_request(request("ping", Some(json!({ "auth_token": "secret" }))))
            .await
            .unwrap();
        assert!(response.result.is_some());
    }

    #[tokio::test]
    async fn test_handle_line_parse_error() {
        let server = server();
        let response = server.handle_line("this is not json").await.unwrap();
        assert!(response.error.is_some());
        assert_eq!(response.error.unwrap().code, -32700);
    }
}
