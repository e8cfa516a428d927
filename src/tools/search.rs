use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_mcp_sdk::macros::{JsonSchema, mcp_tool};
use rust_mcp_sdk::schema::{CallToolResult, TextContent};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blocks::Query;
use crate::config::Config;
use crate::output::{FormatOptions, format_blocks};
use crate::search::{ParallelSearch, PredicateSet, SearchOptions, Searcher};
use crate::walker::{FileWalker, expand_extensions};

pub const NO_BLOCKS_MESSAGE: &str = "No blocks found matching the query.";

#[mcp_tool(
    name = "search",
    description = "Use this instead of grep for code search. Returns whole code blocks \
(functions, classes, methods, conditionals) around each regex match instead of single lines.

The block is everything indented deeper than the matching line, plus its closing line, so \
there is no need to guess -A/-B context. Results carry the filename and line numbers.

Example queries:
- \"func.*Error\" - functions with Error in the name (Go)
- \"def __init__\" - constructors (Python)
- \"class.*Controller\" - controller classes
- \"if err != nil\" - error handling blocks (Go)
- \"TODO|FIXME\" - TODOs with their surrounding code",
    title = "Search Indentation Blocks",
    idempotent_hint = true,
    destructive_hint = false,
    open_world_hint = false,
    read_only_hint = true
)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SearchBlocksTool {
    /// Regular expression matched against each line. Examples: 'func main', 'class.*Service', 'def test_', 'if.*err'
    pub query: String,
    /// Adjust how much nested content to capture. 0 (default) captures the block at match level. Positive values include more content, negative values capture less.
    #[serde(default)]
    pub indentation_offset: Option<i64>,
    /// File or directory to search. Examples: '.', 'src', 'cmd/main.go'. Default: '.'
    #[serde(default)]
    pub path: Option<String>,
    /// Limit search to file types. Comma-separated, without dots. Examples: 'go', 'py,js,ts'. Default: all text files
    #[serde(default)]
    pub extensions: Option<String>,
    /// Secondary awk-style condition over each whole block. Examples: '/TODO/', '/return.*error/', 'length > 500', 'NR > 10'
    #[serde(default)]
    pub predicate: Option<String>,
}

impl SearchBlocksTool {
    pub async fn call_tool(&self, config: &Config) -> Result<CallToolResult> {
        let tool = self.clone();
        let config = config.clone();
        let message = tokio::task::spawn_blocking(move || tool.execute(&config))
            .await
            .context("search task panicked")??;

        Ok(CallToolResult::text_content(vec![TextContent::from(message)]))
    }

    /// Run the search synchronously and render the response text
    pub fn execute(&self, config: &Config) -> Result<String> {
        if self.query.is_empty() {
            bail!("query parameter is required");
        }

        let offset = self.indentation_offset.unwrap_or(config.depth_offset);
        let query = Query::new(&self.query, offset)?;

        let predicates = PredicateSet {
            expressions: non_empty(&self.predicate).map(str::to_string).into_iter().collect(),
            policy: config.predicate_policy,
            ..Default::default()
        };
        let searcher = Searcher::new(query, predicates.build(config)?, config.sniff_bytes);

        let mut walker_options = config.walker_options();
        if let Some(extensions) = non_empty(&self.extensions) {
            walker_options.extensions = expand_extensions(&[extensions]);
        }
        let walker = FileWalker::new(&walker_options);
        let root = non_empty(&self.path).unwrap_or(".");

        debug!("search '{}' (offset {}) under {}", self.query, offset, root);

        let search = ParallelSearch::new(
            &searcher,
            &SearchOptions {
                num_threads: config.thread_count(),
                ..Default::default()
            },
        )?;
        let results = search.collect(walker.produce_files(Path::new(root)));

        if results.is_empty() {
            return Ok(NO_BLOCKS_MESSAGE.to_string());
        }

        let options = FormatOptions::plain();
        Ok(results
            .iter()
            .map(|result| format_blocks(&result.blocks, &result.display_name(), &options))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
