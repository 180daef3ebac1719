use std::sync::Arc;

use super::to_result;
use crate::engine::{ModelParser, SolvingEngine};
use crate::protocol::{JsonRpcError, PingRequest};
use crate::service::SolverService;

/// Handle a `ping` call. Performs no model work.
pub async fn handle<P, E>(
    params: PingRequest,
    service: &Arc<SolverService<P, E>>,
) -> Result<serde_json::Value, JsonRpcError>
where
    P: ModelParser,
    E: SolvingEngine<P::Module, P::Command>,
{
    let response = service.ping(&params)?;
    to_result(&response)
}
