use std::sync::Arc;

use solver_rpc_server::builtin::{BuiltinEngine, BuiltinParser};
use solver_rpc_server::config::ServerConfig;
use solver_rpc_server::engine::StaticRegistry;
use solver_rpc_server::server::RpcServer;
use solver_rpc_server::service::SolverService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("solver-rpc-server: configuration error: {e}");
            std::process::exit(1);
        }
    };

    setup_tracing(&config.log_filter);
    tracing::info!(
        version = solver_rpc_server::service::VERSION,
        solvers = ?config.solvers,
        "starting solver RPC server"
    );

    let registry = Arc::new(StaticRegistry::new(config.solvers.iter().cloned()));
    let service = Arc::new(SolverService::new(BuiltinParser, BuiltinEngine, registry));

    let server = RpcServer::new(config, service);
    if let Err(e) = server.run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries the JSON-RPC stream.
fn setup_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
