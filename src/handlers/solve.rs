use std::sync::Arc;

use tracing::error;

use super::to_result;
use crate::engine::{ModelParser, SolvingEngine};
use crate::protocol::{JsonRpcError, SolveRequest};
use crate::service::{SolveError, SolverService};

/// Handle a `solve` call.
///
/// Parsing and solving are synchronous and may run for a long time, so the
/// whole pipeline runs on the blocking pool; concurrent calls proceed in
/// parallel there.
pub async fn handle<P, E>(
    params: SolveRequest,
    service: &Arc<SolverService<P, E>>,
) -> Result<serde_json::Value, JsonRpcError>
where
    P: ModelParser,
    E: SolvingEngine<P::Module, P::Command>,
{
    let service = Arc::clone(service);
    let task = tokio::task::spawn_blocking(move || service.solve(&params));

    match task.await {
        Ok(Ok(response)) => to_result(&response),
        Ok(Err(solve_err)) => Err(solve_err.into()),
        Err(join_err) => {
            error!("Task join error: {join_err}");
            Err(SolveError::Internal(join_err.to_string()).into())
        }
    }
}
