//! # fsgate-daemon
//!
//! Stdio MCP server for sandboxed filesystem access.
//!
//! Starts an MCP server on stdio that any MCP client connects to. Every
//! tool call is confined to the directories passed via `--allowed-dirs`.
//!
//! ## Usage
//!
//! Typically started by the MCP client via `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "fsgate": {
//!       "type": "stdio",
//!       "command": "fsgate",
//!       "args": ["--allowed-dirs", "/home/me/project", "/tmp/scratch"]
//!     }
//!   }
//! }
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use fsgate_gateway::{FsGatewayServer, GatewayConfig};

/// Sandboxed filesystem MCP server.
#[derive(Parser)]
#[command(name = "fsgate", about = "Sandboxed filesystem MCP server")]
struct Cli {
    /// Directories the server is allowed to access. Entries may use `~`
    /// and environment variable references; at least one is required.
    #[arg(long, num_args = 1.., required = true, value_name = "DIR")]
    allowed_dirs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interfere with MCP on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("fsgate_gateway=info".parse()?)
                .add_directive("fsgate_daemon=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting fsgate MCP server");
    tracing::info!(allowed_dirs = ?cli.allowed_dirs, "configured allow-list");

    let config = GatewayConfig::new(cli.allowed_dirs);
    let server = FsGatewayServer::new(config)?;

    tracing::info!("MCP server ready, waiting for client connection");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

    service.waiting().await?;

    tracing::info!("MCP server shutting down");
    Ok(())
}
