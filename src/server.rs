use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::engine::{ModelParser, SolvingEngine};
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::service::SolverService;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Response writer failed: {0}")]
    Writer(String),
}

/// JSON-RPC 2.0 server speaking newline-delimited messages.
///
/// Requests are read in order but handled concurrently; a single writer
/// task emits each reply as one line once its call finishes.
pub struct RpcServer<P, E> {
    config: ServerConfig,
    service: Arc<SolverService<P, E>>,
}

impl<P, E> RpcServer<P, E>
where
    P: ModelParser,
    E: SolvingEngine<P::Module, P::Command>,
{
    pub fn new(config: ServerConfig, service: Arc<SolverService<P, E>>) -> Self {
        Self { config, service }
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<(), ServerError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
        Ok(())
    }

    /// Serve `input` until EOF, returning `output` once every in-flight call
    /// has replied.
    pub async fn serve<R, W>(&self, input: R, output: W) -> Result<W, ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_responses(output, rx));

        let mut reader = BufReader::new(input);
        let mut raw = Vec::new();
        let limit = self.config.max_message_bytes;

        loop {
            if tx.is_closed() {
                break;
            }
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                break;
            }

            if n > limit {
                warn!("Message too large: {n} bytes (limit {limit})");
                if tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error())).is_err() {
                    break;
                }
                continue;
            }

            let trimmed = match std::str::from_utf8(&raw) {
                Ok(s) => s.trim(),
                Err(_) => {
                    if tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error())).is_err() {
                        break;
                    }
                    continue;
                }
            };

            if trimmed.is_empty() {
                continue;
            }

            let req: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Parse error: {e}");
                    if tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error())).is_err() {
                        break;
                    }
                    continue;
                }
            };

            // Validate jsonrpc version
            if req.jsonrpc != "2.0" {
                let resp = JsonRpcResponse::error(req.id.clone(), JsonRpcError::invalid_request());
                if tx.send(resp).is_err() {
                    break;
                }
                continue;
            }

            debug!(method = %req.method, id = ?req.id, "request received");
            let service = Arc::clone(&self.service);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(resp) = handlers::dispatch(&req, &service).await {
                    // The writer only goes away after an I/O failure, which
                    // the read loop reports on its own.
                    let _ = tx.send(resp);
                }
            });
        }

        info!("input closed, waiting for in-flight calls");
        drop(tx);
        match writer.await {
            Ok(result) => result,
            Err(join_err) => Err(ServerError::Writer(join_err.to_string())),
        }
    }
}

async fn write_responses<W>(
    mut output: W,
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
) -> Result<W, ServerError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(resp) = rx.recv().await {
        let out = serde_json::to_string(&resp)?;
        output.write_all(out.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(output)
}
