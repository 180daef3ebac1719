use crate::engine::EngineError;
use crate::protocol::StatusCode;

/// Why a request was rejected before any model work started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Model content cannot be null or empty")]
    EmptyModel,
}

/// Classified failure of a `solve` or `ping` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("Solver {0} is not available on this system")]
    SolverUnavailable(String),
    #[error("No solver backends are registered on this system")]
    NoSolvers,
    #[error("{0}")]
    ModelLoad(String),
    #[error("Command not found: {0}")]
    CommandNotFound(String),
    #[error("Model declares no commands")]
    NoCommands,
    #[error("Invalid value {value:?} for solver option {name}: {reason}")]
    InvalidOption {
        name: String,
        value: String,
        reason: String,
    },
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl SolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SolverUnavailable(_) | Self::NoSolvers => StatusCode::Unimplemented,
            Self::ModelLoad(_)
            | Self::CommandNotFound(_)
            | Self::NoCommands
            | Self::InvalidOption { .. } => StatusCode::InvalidArgument,
            Self::Engine(_) | Self::Internal(_) => StatusCode::Internal,
        }
    }
}
