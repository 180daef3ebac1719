use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::OutputFormat;

/// JSON-RPC 2.0 request ID, either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// Parameters for `solve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Missing content is rejected in-band like blank content.
    #[serde(default)]
    pub model_content: String,
    /// Command label; empty selects the first declared command.
    #[serde(default)]
    pub command: String,
    /// Backend identifier; empty selects the first registered backend.
    #[serde(default)]
    pub solver_type: String,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub solver_options: BTreeMap<String, String>,
}

/// Parameters for `ping`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PingRequest {
    #[serde(default)]
    pub message: String,
}
