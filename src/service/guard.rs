use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::error;

use super::error::SolveError;
use crate::engine::{Diagnostics, ParsedModel, SolverConfig, SolvingEngine};

/// A solution together with the end-to-end latency of the call.
#[derive(Debug)]
pub struct Invocation<S> {
    pub solution: S,
    pub elapsed: Duration,
}

/// Run `f`, turning a panic into an internal error.
///
/// `stage` names the step in the log line and the error detail.
pub fn fence<T>(stage: &str, f: impl FnOnce() -> Result<T, SolveError>) -> Result<T, SolveError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            error!(stage, panic = %detail, "collaborator panicked");
            Err(SolveError::Internal(format!("{stage} panicked: {detail}")))
        }
    }
}

/// Execute exactly one command. Engine faults and panics are reclassified
/// as internal errors; nothing is retried.
///
/// `started` marks the beginning of the call so the reported latency covers
/// validation and model loading as well as solving.
pub fn invoke<M, C, E>(
    engine: &E,
    model: &ParsedModel<M, C>,
    command: &C,
    config: &SolverConfig,
    diagnostics: &mut Diagnostics,
    started: Instant,
) -> Result<Invocation<E::Solution>, SolveError>
where
    E: SolvingEngine<M, C>,
{
    let solution = fence("solving", || {
        engine
            .execute(&model.module, command, config, diagnostics)
            .map_err(|err| {
                error!(backend = %config.backend, %err, "engine reported a fault");
                SolveError::Engine(err)
            })
    })?;

    Ok(Invocation {
        solution,
        elapsed: started.elapsed(),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
