use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use rust_mcp_sdk::macros::{JsonSchema, mcp_tool};
use rust_mcp_sdk::schema::{CallToolResult, TextContent};
use serde::{Deserialize, Serialize};

use super::search::non_empty;
use crate::config::Config;
use crate::walker::{FileWalker, display_path, expand_extensions};

pub const NO_FILES_MESSAGE: &str = "No files found.";

#[mcp_tool(
    name = "list_files",
    description = "List files in the repository, respecting .gitignore patterns. Useful for \
understanding project structure before searching.

Use this to:
- Discover what file types exist in a project
- Find files in specific directories
- Get an overview before running search",
    title = "List Repository Files",
    idempotent_hint = true,
    destructive_hint = false,
    open_world_hint = false,
    read_only_hint = true
)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ListFilesTool {
    /// Directory to list. Examples: '.', 'src', 'internal/api'. Default: '.'
    #[serde(default)]
    pub path: Option<String>,
    /// Filter by file extensions. Comma-separated, without dots. Examples: 'go', 'py,js', 'md'. Default: all files
    #[serde(default)]
    pub extensions: Option<String>,
}

impl ListFilesTool {
    pub async fn call_tool(&self, config: &Config) -> Result<CallToolResult> {
        let tool = self.clone();
        let config = config.clone();
        let message = tokio::task::spawn_blocking(move || tool.execute(&config))
            .await
            .context("list task panicked")?;

        Ok(CallToolResult::text_content(vec![TextContent::from(message)]))
    }

    pub fn execute(&self, config: &Config) -> String {
        let mut options = config.walker_options();
        if let Some(extensions) = non_empty(&self.extensions) {
            options.extensions = expand_extensions(&[extensions]);
        }

        let root = non_empty(&self.path).unwrap_or(".");
        let files = FileWalker::new(&options).list_files(Path::new(root));
        if files.is_empty() {
            return NO_FILES_MESSAGE.to_string();
        }

        let mut output = format!("Found {} file(s):\n\n", files.len());
        for file in &files {
            let _ = writeln!(output, "{}", display_path(file));
        }
        output
    }
}
