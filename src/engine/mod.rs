//! Collaborator seam between the RPC layer and a solving engine.
//!
//! The service never looks inside a parsed module, a command or a solution;
//! it only moves them between the parser, the engine and the encoder through
//! the traits defined here.

pub mod diagnostics;
pub mod registry;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use diagnostics::{Diagnostic, Diagnostics, Pos, Severity};
pub use registry::{BackendRegistry, StaticRegistry};

/// Fault raised by a parser or engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Type error: {0}")]
    Type(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Resource limit exceeded: {0}")]
    Resource(String),
}

/// Encoding requested for a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Engine-native solver configuration, derived once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub backend: String,
    pub output_format: OutputFormat,
    /// Scope used by commands that do not declare one.
    pub default_scope: Option<u32>,
    /// Upper bound on the number of candidate assignments examined.
    pub search_limit: Option<u64>,
    /// Options the translator does not recognize, forwarded untouched.
    pub extra: BTreeMap<String, String>,
}

/// A parsed module together with its commands in declaration order.
#[derive(Debug, Clone)]
pub struct ParsedModel<M, C> {
    pub module: M,
    pub commands: Vec<C>,
}

/// An executable command declared in a model.
///
/// `Display` must produce the canonical rendering returned to clients.
pub trait ModelCommand: fmt::Display {
    /// Name used to select the command in a solve request.
    fn label(&self) -> &str;
}

/// Result of executing one command.
pub trait EngineSolution {
    fn is_satisfiable(&self) -> bool;

    fn encode(&self, format: OutputFormat) -> Result<String, EngineError>;
}

/// Turns model source text into a module and its commands.
///
/// Implementations report every problem they find to `diagnostics`; the
/// returned error only needs to describe the first one.
pub trait ModelParser: Send + Sync + 'static {
    type Module: Send;
    type Command: ModelCommand + Send;

    fn parse(
        &self,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ParsedModel<Self::Module, Self::Command>, EngineError>;
}

/// Executes a single command of a parsed module.
pub trait SolvingEngine<M, C>: Send + Sync + 'static {
    type Solution: EngineSolution;

    fn execute(
        &self,
        module: &M,
        command: &C,
        config: &SolverConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self::Solution, EngineError>;
}
