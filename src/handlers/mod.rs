pub mod ping;
pub mod solve;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::engine::{ModelParser, SolvingEngine};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::service::SolverService;

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch<P, E>(
    req: &JsonRpcRequest,
    service: &Arc<SolverService<P, E>>,
) -> Option<JsonRpcResponse>
where
    P: ModelParser,
    E: SolvingEngine<P::Module, P::Command>,
{
    if req.id.is_none() {
        tracing::debug!(method = %req.method, "ignoring notification");
        return None;
    }

    let outcome = match req.method.as_str() {
        "solve" => match parse_params(req) {
            Ok(params) => solve::handle(params, service).await,
            Err(err) => Err(err),
        },

        "ping" => match parse_params(req) {
            Ok(params) => ping::handle(params, service).await,
            Err(err) => Err(err),
        },

        _ => Err(JsonRpcError::method_not_found(&req.method)),
    };

    Some(match outcome {
        Ok(result) => JsonRpcResponse::success(req.id.clone(), result),
        Err(error) => JsonRpcResponse::error(req.id.clone(), error),
    })
}

/// Decode `params`, treating an absent object as all defaults.
fn parse_params<T: DeserializeOwned>(req: &JsonRpcRequest) -> Result<T, JsonRpcError> {
    let value = req
        .params
        .clone()
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| {
        JsonRpcError::invalid_params(format!("Invalid {} params: {e}", req.method))
    })
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("Serialization failed: {e}");
        JsonRpcError::internal_error(format!("Internal server error: {e}"))
    })
}
