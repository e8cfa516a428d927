//! blocksearch: grep for whole indentation blocks
//!
//! Prints every block anchored at a line matching QUERY. Exit status is 0 when
//! at least one block (or file, with --files) was printed, 1 when none was,
//! and 2 on usage or configuration errors.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use blocksearch::config::{ColorChoice, Config};
use blocksearch::logging::init_cli_logging;
use blocksearch::output::{FormatOptions, OutputFormat, OutputWriter, StreamCommand};
use blocksearch::search::{ParallelSearch, PredicateSet, STDIN_NAME, SearchOptions, Searcher};
use blocksearch::walker::{FileWalker, display_path};
use blocksearch::{MatchPolicy, Query};

#[derive(Parser)]
#[command(name = "blocksearch")]
#[command(about = "Search files for indentation blocks anchored at a regex", long_about = None)]
#[command(version)]
struct Cli {
    /// Regular expression an anchor line must match
    query: String,

    /// Files or directories to search (stdin when omitted and piped, else '.')
    paths: Vec<PathBuf>,

    /// Indentation offset in steps: positive captures more, negative less
    #[arg(short, long, allow_negative_numbers = true)]
    indent: Option<i64>,

    /// Show the filename before every line
    #[arg(short, long)]
    filename: bool,

    /// Do not show line numbers
    #[arg(short = 'l', long)]
    no_line: bool,

    /// Keep blocks with a line matching this regex (repeatable)
    #[arg(short = 'e', long = "filter")]
    filters: Vec<String>,

    /// Keep blocks for which this awk-style condition holds (repeatable)
    #[arg(short, long)]
    awk: Vec<String>,

    /// Like --awk but evaluated by an external awk program
    #[arg(long)]
    awk_external: Vec<String>,

    /// Require every filter to match instead of any
    #[arg(long)]
    all: bool,

    /// Only search these extensions (comma-separated, repeatable)
    #[arg(short = 'x', long = "ext")]
    extensions: Vec<String>,

    /// Print blocks as newline-delimited JSON
    #[arg(short, long)]
    json: bool,

    /// Pipe each block as JSON into a new run of this command
    #[arg(short, long, value_name = "CMD")]
    stream: Option<String>,

    /// When to highlight output
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Number of worker threads (defaults to CPU count)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Do not read .gitignore, .ignore or the global ignore file
    #[arg(long)]
    no_ignore: bool,

    /// List the files that would be searched instead of searching
    #[arg(long)]
    files: bool,

    /// Configuration file (defaults to ~/.config/blocksearch/config.toml)
    #[arg(long, env = "BLOCKSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Optional log file path for debug logging
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("blocksearch: {:#}", e);
        return ExitCode::from(2);
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("blocksearch: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    init_cli_logging(cli.log.as_deref())?;
    if let Some(log) = &cli.log {
        debug!("logging to {}", log.display());
    }
    Ok(())
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.extensions.is_empty() {
        config.extensions = cli.extensions.clone();
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(color) = cli.color {
        config.color = color;
    }
    if cli.no_ignore {
        config.respect_ignore = false;
    }
    if cli.all {
        config.predicate_policy = MatchPolicy::All;
    }
}

/// Returns whether anything was printed
fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    apply_overrides(&mut config, &cli);

    let walker = FileWalker::new(&config.walker_options());
    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };

    if cli.files {
        let mut listed = 0;
        for root in &roots {
            for file in walker.produce_files(root) {
                println!("{}", display_path(&file));
                listed += 1;
            }
        }
        return Ok(listed > 0);
    }

    // everything that can fail on bad input fails here, before any file is read
    let query = Query::new(&cli.query, cli.indent.unwrap_or(config.depth_offset))?;
    let predicates = PredicateSet {
        line_patterns: cli.filters.clone(),
        expressions: cli.awk.clone(),
        external: cli.awk_external.clone(),
        policy: config.predicate_policy,
    };
    let filters = predicates.build(&config)?;
    let searcher = Searcher::new(query, filters, config.sniff_bytes);

    let read_stdin = cli.paths.is_empty() && !std::io::stdin().is_terminal();

    let format = if let Some(command) = &cli.stream {
        OutputFormat::Stream(StreamCommand::parse(command)?)
    } else if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text(FormatOptions {
            filename_inline: cli.filename,
            line_numbers: !cli.no_line,
            colors: config.color.enabled(std::io::stdout().is_terminal()),
            filename_header: !read_stdin,
        })
    };
    let mut writer = OutputWriter::new(format);

    if read_stdin {
        let mut contents = Vec::new();
        std::io::stdin()
            .read_to_end(&mut contents)
            .context("failed to read stdin")?;
        let result = searcher.search_text(STDIN_NAME, &String::from_utf8_lossy(&contents));
        writer.write_result(&result)?;
        return Ok(writer.blocks_written() > 0);
    }

    let search = ParallelSearch::new(
        &searcher,
        &SearchOptions {
            num_threads: config.thread_count(),
            ..Default::default()
        },
    )?;
    let files = roots.iter().flat_map(|root| walker.produce_files(root));
    let summary = search.run(files, |result| writer.write_result(&result))?;
    writer.flush()?;

    debug!("{:?}", summary);
    Ok(summary.blocks > 0)
}
