//! Request-to-response translation for `solve` and `ping`.
//!
//! A `solve` call moves through validation, backend selection, model loading,
//! command lookup, option translation, invocation and encoding. Each stage
//! either hands its output to the next or ends the call with exactly one
//! outcome. Nothing is retained between calls.

pub mod encode;
pub mod error;
pub mod guard;
pub mod options;
pub mod resolve;
pub mod validate;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, warn};

pub use error::{SolveError, ValidationError};

use crate::engine::{BackendRegistry, Diagnostics, ModelParser, SolvingEngine};
use crate::protocol::{PingRequest, PingResponse, SolveRequest, SolveResponse, StatusCode};

/// Version reported by `ping`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reply message for a `ping` without one.
pub const DEFAULT_PING_MESSAGE: &str = "pong";

/// Stateless front for a parser, an engine and a backend registry.
///
/// Safe to share across threads; every call owns its model, command and
/// configuration.
pub struct SolverService<P, E> {
    parser: P,
    engine: E,
    registry: Arc<dyn BackendRegistry>,
}

impl<P, E> SolverService<P, E>
where
    P: ModelParser,
    E: SolvingEngine<P::Module, P::Command>,
{
    pub fn new(parser: P, engine: E, registry: Arc<dyn BackendRegistry>) -> Self {
        Self {
            parser,
            engine,
            registry,
        }
    }

    /// Run one solve request to a single terminal outcome.
    ///
    /// `Ok` with `success = false` means the request was malformed; every
    /// other failure is a classified `SolveError`.
    pub fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        let started = Instant::now();

        if let Err(reason) = validate::validate(request) {
            debug!(%reason, "rejecting solve request");
            return Ok(encode::rejected(&reason, started.elapsed()));
        }

        let backend = options::select_backend(self.registry.as_ref(), &request.solver_type)
            .map_err(log_failure)?;

        let mut diagnostics = Diagnostics::new();
        let model = guard::fence("model parsing", || {
            resolve::load_model(&self.parser, &request.model_content, &mut diagnostics)
        })
        .map_err(log_failure)?;

        let command =
            resolve::find_command(&model.commands, &request.command).map_err(log_failure)?;

        let config = options::translate(backend, &request.solver_options, request.output_format)
            .map_err(log_failure)?;
        debug!(command = %command, backend = %config.backend, "invoking engine");

        let invocation =
            guard::invoke(&self.engine, &model, command, &config, &mut diagnostics, started)?;

        let response = encode::solved(&invocation, config.output_format, command, &diagnostics)
            .map_err(log_failure)?;
        debug!(
            command = %command,
            elapsed_ms = response.solving_time_ms,
            satisfiable = ?response.satisfiable,
            "solve finished"
        );
        Ok(response)
    }

    /// Liveness reply listing the backends registered right now.
    pub fn ping(&self, request: &PingRequest) -> Result<PingResponse, SolveError> {
        guard::fence("ping", || {
            let message = if request.message.is_empty() {
                DEFAULT_PING_MESSAGE.to_string()
            } else {
                request.message.clone()
            };
            Ok(PingResponse {
                message,
                timestamp: Utc::now().timestamp_millis(),
                version: VERSION.to_string(),
                available_solvers: self.registry.list_available(),
            })
        })
    }

    pub fn registry(&self) -> &dyn BackendRegistry {
        self.registry.as_ref()
    }
}

fn log_failure(err: SolveError) -> SolveError {
    match err.status() {
        StatusCode::Internal => error!(%err, "solve request failed"),
        status => warn!(?status, %err, "solve request rejected"),
    }
    err
}
