//! Remote keyword protocol types
//!
//! JSON-RPC 2.0 framing plus the keyword-runner result contract: every
//! executed keyword reports PASS or FAIL, an optional return value, captured
//! output for the runner's log, and an error message on failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Optional parameters
    #[serde(default)]
    pub params: Option<Value>,
    /// Request ID (None for notifications)
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Success result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Create a parse error response
    pub fn parse_error() -> Self {
        Self::error(None, -32700, "Parse error")
    }

    /// Create an invalid request error
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Create a method not found error
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, -32601, format!("Method not found: {}", method))
    }

    /// Create an invalid params error
    pub fn invalid_params(id: Option<Value>, msg: &str) -> Self {
        Self::error(id, -32602, format!("Invalid params: {}", msg))
    }

    /// Create an internal error
    pub fn internal_error(id: Option<Value>, msg: &str) -> Self {
        Self::error(id, -32603, format!("Internal error: {}", msg))
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Server identity reported to the runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "keyword-web".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters for the `run_keyword` method
#[derive(Debug, Clone, Deserialize)]
pub struct RunKeywordParams {
    /// Keyword name
    pub name: String,
    /// Positional keyword arguments
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Parameters for the keyword introspection methods
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordQueryParams {
    /// Keyword name
    pub name: String,
}

/// Execution status of a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Keyword completed successfully
    #[serde(rename = "PASS")]
    Pass,
    /// Keyword failed; the requested action was not performed
    #[serde(rename = "FAIL")]
    Fail,
}

/// Result of executing one keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// PASS or FAIL
    pub status: RunStatus,
    /// Keyword return value
    #[serde(rename = "return", default, skip_serializing_if = "Value::is_null")]
    pub ret: Value,
    /// Output captured for the runner's log
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    /// Error message on failure
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl RunResult {
    /// A passing result with a return value
    pub fn pass(ret: Value) -> Self {
        Self {
            status: RunStatus::Pass,
            ret,
            output: String::new(),
            error: String::new(),
        }
    }

    /// A passing result with a return value and log output
    pub fn pass_with_output(ret: Value, output: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Pass,
            ret,
            output: output.into(),
            error: String::new(),
        }
    }

    /// A failing result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Fail,
            ret: Value::Null,
            output: String::new(),
            error: error.into(),
        }
    }
}
