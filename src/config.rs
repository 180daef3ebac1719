use crate::builtin;

/// Default maximum bytes per JSON-RPC message (1 MiB).
const DEFAULT_MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("SOLVER_RPC_SOLVERS names unknown solver {0:?} (supported: {1})")]
    UnknownSolver(String, String),
    #[error("SOLVER_RPC_SOLVERS must name at least one solver")]
    NoSolvers,
    #[error("SOLVER_RPC_MAX_MESSAGE_BYTES must be a positive integer")]
    InvalidMessageLimit,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Backends registered with the service, in preference order.
    pub solvers: Vec<String>,
    pub max_message_bytes: usize,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            solvers: builtin::BACKENDS.iter().map(|b| b.to_string()).collect(),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `SOLVER_RPC_SOLVERS` (optional, default all built-in): comma-separated backends to
    ///   register
    /// - `SOLVER_RPC_MAX_MESSAGE_BYTES` (optional, default 1 MiB): max bytes per request line
    /// - `SOLVER_RPC_LOG` (optional, default `info`): log filter used when `RUST_LOG` is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("SOLVER_RPC_SOLVERS") {
            config.solvers = parse_solvers(&raw)?;
        }

        if let Some(raw) = lookup("SOLVER_RPC_MAX_MESSAGE_BYTES") {
            config.max_message_bytes = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidMessageLimit)?;
        }

        if let Some(raw) = lookup("SOLVER_RPC_LOG") {
            if !raw.trim().is_empty() {
                config.log_filter = raw.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn parse_solvers(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut solvers: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !builtin::BACKENDS.contains(&id) {
            return Err(ConfigError::UnknownSolver(
                id.to_string(),
                builtin::BACKENDS.join(", "),
            ));
        }
        if !solvers.iter().any(|s| s == id) {
            solvers.push(id.to_string());
        }
    }
    if solvers.is_empty() {
        return Err(ConfigError::NoSolvers);
    }
    Ok(solvers)
}
