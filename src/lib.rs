// blocksearch - grep for whole indentation blocks
//!
//! Finds every line matching an anchor regex and returns the block of lines
//! nested under it, inferred from indentation alone. Blocks can be narrowed
//! with line regexes or awk-style conditions, and the same search is served
//! over MCP as the `search` and `list_files` tools.

pub mod blocks;
pub mod config;
pub mod error;
pub mod filter;
pub mod handler;
pub mod logging;
pub mod output;
pub mod search;
pub mod tools;
pub mod walker;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use blocks::{Block, Indentation, Line, Query, scan, split_lines};
pub use config::{ColorChoice, Config};
pub use error::{BlockSearchError, Result};
pub use filter::{FilterEngine, MatchPolicy, Predicate};
pub use search::{FileResult, ParallelSearch, PredicateSet, SearchOptions, Searcher};
pub use walker::{FileWalker, WalkerOptions};
