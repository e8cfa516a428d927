//! Output sinks for search results
//!
//! - Text: numbered lines, optional inline filenames and highlighting
//! - Json: newline-delimited `BlockExport` objects
//! - Stream: each block's JSON piped into a fresh run of a user command

pub mod json;
pub mod stream;
pub mod text;

use std::io::{self, Write};

use crate::error::{BlockSearchError, Result};
use crate::search::FileResult;

pub use json::{BlockExport, encode_blocks};
pub use stream::StreamCommand;
pub use text::{FormatOptions, format_block, format_blocks, format_line};

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Text(FormatOptions),
    Json,
    Stream(StreamCommand),
}

pub struct OutputWriter {
    format: OutputFormat,
    writer: Box<dyn Write>,
    blocks_written: usize,
}

impl OutputWriter {
    /// Writer on stdout
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, Box::new(io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            writer,
            blocks_written: 0,
        }
    }

    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    /// Write every block of one file
    pub fn write_result(&mut self, result: &FileResult) -> Result<()> {
        if result.blocks.is_empty() {
            return Ok(());
        }

        let filename = result.display_name();
        match &self.format {
            OutputFormat::Text(options) => {
                // blank line between blocks, including across files
                if self.blocks_written > 0 {
                    writeln!(self.writer).map_err(stdout_error)?;
                }
                let rendered = format_blocks(&result.blocks, &filename, options);
                writeln!(self.writer, "{}", rendered).map_err(stdout_error)?;
                self.writer.flush().map_err(stdout_error)?;
            }
            OutputFormat::Json => {
                let encoded = encode_blocks(&result.blocks, &filename)?;
                self.writer
                    .write_all(encoded.as_bytes())
                    .map_err(stdout_error)?;
                self.writer.flush().map_err(stdout_error)?;
            }
            OutputFormat::Stream(command) => {
                command.send_blocks(&result.blocks, &filename)?;
            }
        }

        self.blocks_written += result.blocks.len();
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(stdout_error)
    }
}

fn stdout_error(source: io::Error) -> BlockSearchError {
    BlockSearchError::io("<stdout>", source)
}
