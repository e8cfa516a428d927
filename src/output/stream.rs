//! Pipe each block, as JSON, into its own run of a user command

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::json::BlockExport;
use crate::blocks::Block;
use crate::error::{BlockSearchError, Result};

#[derive(Debug, Clone)]
pub struct StreamCommand {
    raw: String,
    program: String,
    args: Vec<String>,
}

impl StreamCommand {
    /// Split `raw` with shell quoting rules (no shell is involved)
    pub fn parse(raw: &str) -> Result<Self> {
        let mut argv = shlex::split(raw)
            .ok_or_else(|| BlockSearchError::Config(format!("unbalanced quotes in stream command '{}'", raw)))?
            .into_iter();

        let program = argv
            .next()
            .ok_or_else(|| BlockSearchError::Config("empty stream command".to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            program,
            args: argv.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the command once per block. A non-zero exit is only logged; a
    /// command that cannot be started stops the run.
    pub fn send_blocks(&self, blocks: &[Block], filename: &str) -> Result<()> {
        for block in blocks {
            let payload = BlockExport::new(filename, block).to_json()?;
            self.send(&payload)?;
        }
        Ok(())
    }

    fn send(&self, payload: &str) -> Result<()> {
        let to_error = |source: std::io::Error| BlockSearchError::Stream {
            command: self.raw.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(to_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            // the command may not read its input at all
            if let Err(err) = stdin.write_all(payload.as_bytes()) {
                debug!("stream command closed stdin early: {}", err);
            }
        }

        let status = child.wait().map_err(to_error)?;
        if !status.success() {
            warn!("stream command '{}' exited with {}", self.raw, status);
        }
        Ok(())
    }
}
