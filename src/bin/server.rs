//! blocksearch-mcp: block search tools over MCP (stdio)
//!
//! Exposes `search` and `list_files`. Tool paths are relative to --workdir.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rust_mcp_sdk::error::{McpSdkError, SdkResult};
use rust_mcp_sdk::mcp_server::{ServerRuntime, server_runtime};
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, LATEST_PROTOCOL_VERSION, ServerCapabilities,
    ServerCapabilitiesTools,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};
use tracing::{debug, error, info};

use blocksearch::config::Config;
use blocksearch::handler::BlockSearchServerHandler;
use blocksearch::logging::init_server_logging;

const INSTRUCTIONS: &str = "Use `search` instead of grep to find code: it returns the whole \
indentation block (function, class, loop, conditional) around every regex match, with line \
numbers. Narrow results with `predicate`, an awk-style condition over the block such as \
'/return/' or 'NR > 20'. Use `list_files` to see which files are searchable.";

#[derive(Parser)]
#[command(name = "blocksearch-mcp")]
#[command(about = "MCP server exposing indentation block search", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory tool paths are resolved against
    #[arg(short, long, default_value = ".")]
    workdir: PathBuf,

    /// Configuration file (defaults to $BLOCKSEARCH_CONFIG, then ~/.config/blocksearch/config.toml)
    #[arg(short, long, env = "BLOCKSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn startup_error(e: impl std::fmt::Display) -> McpSdkError {
    McpSdkError::Io(std::io::Error::other(e.to_string()))
}

#[tokio::main]
async fn main() -> SdkResult<()> {
    let cli = Cli::parse();

    let _log_guard = init_server_logging(cli.log_dir.as_deref()).map_err(startup_error)?;

    let config = Config::load(cli.config.as_deref()).map_err(startup_error)?;

    // all tool paths are relative to the working directory
    std::env::set_current_dir(&cli.workdir)
        .map_err(|e| startup_error(format!("change to workdir {}: {}", cli.workdir.display(), e)))?;
    info!("serving blocks from {}", cli.workdir.display());

    let server_details = InitializeResult {
        server_info: Implementation {
            name: "blocksearch".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("Indentation Block Search".to_string()),
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(INSTRUCTIONS.to_string()),
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    };

    let transport = StdioTransport::new(TransportOptions::default())?;
    debug!("stdio transport initialized");

    let handler = BlockSearchServerHandler::new(config);
    let server: Arc<ServerRuntime> =
        server_runtime::create_server(server_details, transport, handler);

    if let Err(start_error) = server.start().await {
        error!("server failed: {}", start_error);
        eprintln!(
            "blocksearch-mcp error: {}",
            start_error
                .rpc_error_message()
                .unwrap_or(&start_error.to_string())
        );
        return Err(start_error);
    }

    info!("server stopped");
    Ok(())
}
