use std::time::Duration;

use super::error::{SolveError, ValidationError};
use super::guard::Invocation;
use crate::engine::{Diagnostics, EngineSolution, ModelCommand, OutputFormat};
use crate::protocol::SolveResponse;

/// In-band failure for a request that never reached the parser.
pub fn rejected(reason: &ValidationError, elapsed: Duration) -> SolveResponse {
    SolveResponse {
        success: false,
        solution: None,
        solving_time_ms: millis(elapsed),
        command: None,
        satisfiable: None,
        warnings: Vec::new(),
        error_message: Some(reason.to_string()),
    }
}

/// Success reply for a solved command.
pub fn solved<S, C>(
    invocation: &Invocation<S>,
    format: OutputFormat,
    command: &C,
    diagnostics: &Diagnostics,
) -> Result<SolveResponse, SolveError>
where
    S: EngineSolution,
    C: ModelCommand,
{
    let solution = invocation
        .solution
        .encode(format)
        .map_err(|e| SolveError::Internal(format!("failed to encode solution as {format}: {e}")))?;

    Ok(SolveResponse {
        success: true,
        solution: Some(solution),
        solving_time_ms: millis(invocation.elapsed),
        command: Some(command.to_string()),
        satisfiable: Some(invocation.solution.is_satisfiable()),
        warnings: diagnostics.warnings().map(ToString::to_string).collect(),
        error_message: None,
    })
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
