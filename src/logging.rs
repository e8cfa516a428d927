//! Tracing setup for both binaries
//!
//! Stdout belongs to search output (CLI) or the protocol (server), so every
//! log line goes to stderr, plus a file when asked for.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const CLI_DEFAULT_FILTER: &str = "warn";
pub const SERVER_DEFAULT_FILTER: &str = "blocksearch=info";
pub const SERVER_LOG_FILE: &str = "blocksearch.log";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// CLI logging: stderr, or everything to `log_file` with warnings still on
/// stderr
pub fn init_cli_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(log_file) => {
            let file_appender = rolling::never(
                log_file.parent().unwrap_or_else(|| Path::new(".")),
                log_file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("blocksearch.log"),
            );

            tracing_subscriber::fmt()
                .with_env_filter(env_filter("info"))
                .with_ansi(false)
                .with_writer(file_appender.and(std::io::stderr.with_max_level(tracing::Level::WARN)))
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(CLI_DEFAULT_FILTER))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;
        }
    }

    Ok(())
}

/// Server logging: stderr plus a daily rolling file under `log_dir`. The
/// returned guard must live as long as the server.
pub fn init_server_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let (writer, guard) = non_blocking(rolling::daily(dir, SERVER_LOG_FILE));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(SERVER_DEFAULT_FILTER))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;

    Ok(guard)
}
