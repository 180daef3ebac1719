use std::collections::HashMap;

use solver_rpc_server::config::{ConfigError, ServerConfig};

fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_register_every_builtin_backend() {
    let config = load(&[]).unwrap();
    assert_eq!(config.solvers, vec!["exhaustive", "minimal"]);
    assert_eq!(config.max_message_bytes, 1024 * 1024);
    assert_eq!(config.log_filter, "info");
}

#[test]
fn solver_list_is_trimmed_and_deduplicated() {
    let config = load(&[("SOLVER_RPC_SOLVERS", " minimal , exhaustive,minimal,")]).unwrap();
    assert_eq!(config.solvers, vec!["minimal", "exhaustive"]);
}

#[test]
fn unknown_solver_is_rejected() {
    let err = load(&[("SOLVER_RPC_SOLVERS", "exhaustive,sat4j")]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownSolver("sat4j".into(), "exhaustive, minimal".into())
    );
}

#[test]
fn empty_solver_list_is_rejected() {
    assert_eq!(load(&[("SOLVER_RPC_SOLVERS", " , ")]).unwrap_err(), ConfigError::NoSolvers);
}

#[test]
fn message_limit_must_be_positive() {
    assert_eq!(
        load(&[("SOLVER_RPC_MAX_MESSAGE_BYTES", "0")]).unwrap_err(),
        ConfigError::InvalidMessageLimit
    );
    assert_eq!(
        load(&[("SOLVER_RPC_MAX_MESSAGE_BYTES", "lots")]).unwrap_err(),
        ConfigError::InvalidMessageLimit
    );
    let config = load(&[("SOLVER_RPC_MAX_MESSAGE_BYTES", "4096")]).unwrap();
    assert_eq!(config.max_message_bytes, 4096);
}

#[test]
fn log_filter_override() {
    let config = load(&[("SOLVER_RPC_LOG", "solver_rpc_server=debug")]).unwrap();
    assert_eq!(config.log_filter, "solver_rpc_server=debug");
    let config = load(&[("SOLVER_RPC_LOG", "  ")]).unwrap();
    assert_eq!(config.log_filter, "info");
}
