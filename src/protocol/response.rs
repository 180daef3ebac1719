use serde::{Deserialize, Serialize};

use super::request::RpcId;
use crate::service::SolveError;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RpcStatus>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self { code: -32603, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// Method results (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// Result of `solve`.
///
/// `success = false` is reserved for malformed requests; every other failure
/// travels as a JSON-RPC error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub solving_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfiable: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Result of `ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub version: String,
    pub available_solvers: Vec<String>,
}

// ---------------------------------------------------------------------------
// Status taxonomy for failed calls
// ---------------------------------------------------------------------------

/// Failure class of a call, independent of the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    InvalidArgument,
    Unimplemented,
    Internal,
}

impl StatusCode {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Request mistakes        → -32602 (Invalid params)
    /// Missing backend         → -32001 (server-defined)
    /// Server-side failures    → -32603 (Internal error)
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidArgument => -32602,
            Self::Unimplemented => -32001,
            Self::Internal => -32603,
        }
    }
}

/// Structured status carried in `error.data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    pub status: StatusCode,
    pub message: String,
}

impl RpcStatus {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// The JSON-RPC `code` is derived from the status, the `message` is the
/// human-readable detail, and `data` repeats both for structured clients.
impl From<RpcStatus> for JsonRpcError {
    fn from(status: RpcStatus) -> Self {
        Self {
            code: status.status.json_rpc_code(),
            message: status.message.clone(),
            data: Some(status),
        }
    }
}

impl From<&SolveError> for RpcStatus {
    fn from(err: &SolveError) -> Self {
        Self::new(err.status(), err.to_string())
    }
}

impl From<SolveError> for JsonRpcError {
    fn from(err: SolveError) -> Self {
        RpcStatus::from(&err).into()
    }
}
