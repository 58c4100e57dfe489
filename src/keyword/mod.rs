//! Remote keyword protocol module
//!
//! The keyword surface served to remote test runners: keyword specs and
//! dispatch, the JSON-RPC protocol types, and the server transports.

pub mod registry;
mod server;
/// Remote keyword protocol types
pub mod types;

pub use registry::{spec, KeywordRegistry, KeywordSpec, KEYWORDS};
pub use server::KeywordServer;
pub use types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, RunKeywordParams, RunResult, RunStatus,
    ServerInfo,
};
