//! MCP server entry point.
//!
//! Resolves the configuration from environment variables, initializes
//! logging to stderr (stdout is reserved for the STDIO JSON-RPC stream),
//! and starts the configured transports. See `core::config` for the list
//! of environment variables.

mod core;
mod tools;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::core::config::{ServerConfig, TransportMode};
use crate::core::server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    match config.transport {
        TransportMode::Stdio => server::run_server_stdio(config).await,
        TransportMode::Http => server::run_server_http(config).await,
        TransportMode::Both => {
            // STDIO in a background task so MCP Inspector works while the
            // HTTP endpoints are up; HTTP runs in the foreground.
            let stdio_config = config.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = server::run_server_stdio(stdio_config).await {
                    error!("STDIO server error: {e}");
                }
            });

            let http_result = server::run_server_http(config).await;

            // HTTP server exited; tear the STDIO task down with it.
            stdio_handle.abort();

            http_result
        }
    }
}
