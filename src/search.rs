//! Search pipeline: sniff, read, scan, filter
//!
//! Files are processed on a dedicated rayon pool in batches so results can be
//! emitted while the walk is still producing paths. Output order always
//! follows the walk order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::blocks::{Block, Query, scan, split_lines};
use crate::config::Config;
use crate::error::{BlockSearchError, Result};
use crate::filter::{
    ExpressionPredicate, ExternalAwkPredicate, FilterEngine, LineRegexPredicate, MatchPolicy,
    Predicate, PredicateFailure,
};
use crate::walker::display_path;
use crate::walker::sniff::{ContentKind, sniff_file};

/// Display name used for blocks read from standard input
pub const STDIN_NAME: &str = "<stdin>";

/// Blocks found in one file, in scan order
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub blocks: Vec<Block>,
    pub failures: Vec<PredicateFailure>,
}

impl FileResult {
    pub fn display_name(&self) -> String {
        display_path(&self.path)
    }
}

/// Secondary filters as given by the user, compiled by [`PredicateSet::build`]
#[derive(Debug, Clone, Default)]
pub struct PredicateSet {
    /// Plain regexes matched line by line
    pub line_patterns: Vec<String>,
    /// In-process awk-style conditions
    pub expressions: Vec<String>,
    /// Conditions handed to an external awk
    pub external: Vec<String>,
    pub policy: MatchPolicy,
}

impl PredicateSet {
    /// Compile every predicate. Any syntax error is fatal here, before a
    /// single file is read.
    pub fn build(&self, config: &Config) -> Result<FilterEngine> {
        let mut predicates: Vec<Box<dyn Predicate>> = Vec::new();

        for pattern in &self.line_patterns {
            predicates.push(Box::new(LineRegexPredicate::new(pattern)?));
        }
        for source in &self.expressions {
            predicates.push(Box::new(ExpressionPredicate::new(source)?));
        }
        for condition in &self.external {
            predicates.push(Box::new(ExternalAwkPredicate::new(
                condition,
                &config.awk_program,
                config.predicate_timeout(),
            )?));
        }

        Ok(FilterEngine::new(predicates, self.policy))
    }
}

#[derive(Debug)]
pub struct Searcher {
    query: Query,
    filters: FilterEngine,
    sniff_bytes: usize,
}

impl Searcher {
    pub fn new(query: Query, filters: FilterEngine, sniff_bytes: usize) -> Self {
        Self {
            query,
            filters,
            sniff_bytes,
        }
    }

    /// Search one file. Binary files yield `Ok(None)`.
    pub fn search_file(&self, path: &Path) -> Result<Option<FileResult>> {
        if sniff_file(path, self.sniff_bytes)? == ContentKind::Binary {
            debug!("skipping binary file {}", path.display());
            return Ok(None);
        }

        let bytes = std::fs::read(path).map_err(|e| BlockSearchError::io(path, e))?;
        let contents = String::from_utf8_lossy(&bytes);

        Ok(Some(self.search_text(path, &contents)))
    }

    /// Search in-memory text under the given display path
    pub fn search_text(&self, path: impl Into<PathBuf>, contents: &str) -> FileResult {
        let path = path.into();
        let lines = split_lines(contents);
        let blocks = scan(&lines, &self.query);
        let found = blocks.len();
        let filtered = self.filters.apply(blocks);

        debug!(
            "{}: {} blocks for '{}', {} after filtering",
            path.display(),
            found,
            self.query.pattern(),
            filtered.blocks.len()
        );

        FileResult {
            path,
            blocks: filtered.blocks,
            failures: filtered.failures,
        }
    }
}

/// Thread pool settings for [`ParallelSearch`]
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub num_threads: usize,
    /// Files handed to the pool at a time
    pub batch_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            batch_size: 64,
        }
    }
}

/// Running totals reported after a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    pub files_searched: usize,
    pub files_matched: usize,
    pub blocks: usize,
    pub errors: usize,
}

pub struct ParallelSearch<'a> {
    searcher: &'a Searcher,
    pool: rayon::ThreadPool,
    batch_size: usize,
}

impl<'a> ParallelSearch<'a> {
    pub fn new(searcher: &'a Searcher, options: &SearchOptions) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.num_threads.max(1))
            .build()
            .map_err(|e| BlockSearchError::Config(format!("failed to build thread pool: {}", e)))?;

        Ok(Self {
            searcher,
            pool,
            batch_size: options.batch_size.max(1),
        })
    }

    /// Search every file from `files`, handing non-empty results to `emit` in
    /// input order. Per-file errors are logged and skipped. `emit` errors stop
    /// the run.
    pub fn run<I, F, E>(&self, files: I, mut emit: F) -> std::result::Result<SearchSummary, E>
    where
        I: IntoIterator<Item = PathBuf>,
        F: FnMut(FileResult) -> std::result::Result<(), E>,
    {
        let mut summary = SearchSummary::default();
        let mut files = files.into_iter().peekable();

        while files.peek().is_some() {
            let batch: Vec<PathBuf> = files.by_ref().take(self.batch_size).collect();

            let results: Vec<Option<FileResult>> = self.pool.install(|| {
                batch
                    .par_iter()
                    .map(|path| match self.searcher.search_file(path) {
                        Ok(result) => result,
                        Err(err) => {
                            warn!("skipping {}: {}", path.display(), err);
                            None
                        }
                    })
                    .collect()
            });

            summary.files_searched += batch.len();
            for result in results.into_iter().flatten() {
                summary.errors += result.failures.len();
                if result.blocks.is_empty() {
                    continue;
                }
                summary.files_matched += 1;
                summary.blocks += result.blocks.len();
                emit(result)?;
            }
        }

        info!(
            "searched {} files, {} blocks in {} files",
            summary.files_searched, summary.blocks, summary.files_matched
        );
        Ok(summary)
    }

    /// Collect every non-empty result
    pub fn collect<I: IntoIterator<Item = PathBuf>>(&self, files: I) -> Vec<FileResult> {
        let mut results = Vec::new();
        let outcome: std::result::Result<SearchSummary, std::convert::Infallible> =
            self.run(files, |result| {
                results.push(result);
                Ok(())
            });
        match outcome {
            Ok(_) => results,
            Err(never) => match never {},
        }
    }
}
