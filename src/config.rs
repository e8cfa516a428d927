//! User configuration (`config.toml`)
//!
//! Every field has a default, so a missing file or a partial one is fine.
//! Command-line flags are applied on top by the binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BlockSearchError, Result};
use crate::filter::MatchPolicy;
use crate::walker::WalkerOptions;
use crate::walker::rules::DEFAULT_VCS_DIRECTORIES;
use crate::walker::sniff::DEFAULT_SNIFF_BYTES;

pub const CONFIG_ENV: &str = "BLOCKSEARCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/blocksearch/config.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Extension allow-list; empty means every extension
    pub extensions: Vec<String>,

    /// Indentation offset applied when a query does not give one
    pub depth_offset: i64,

    /// Worker threads, 0 = one per CPU
    pub threads: usize,

    pub color: ColorChoice,

    /// How multiple predicates combine
    pub predicate_policy: MatchPolicy,

    /// Per-block limit for the external awk predicate
    pub predicate_timeout_ms: u64,

    /// Interpreter used by the external awk predicate
    pub awk_program: String,

    /// Per-directory ignore file names, lowest precedence first
    pub ignore_files: Vec<String>,

    /// User-level ignore file; git's `core.excludesFile` when unset
    pub global_ignore: Option<PathBuf>,

    pub vcs_directories: Vec<String>,

    /// Leading bytes inspected to tell text from binary
    pub sniff_bytes: usize,

    /// `false` disables every ignore file (VCS directories are still pruned)
    pub respect_ignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            depth_offset: 0,
            threads: 0,
            color: ColorChoice::Auto,
            predicate_policy: MatchPolicy::Any,
            predicate_timeout_ms: 5_000,
            awk_program: "awk".to_string(),
            ignore_files: vec![".gitignore".to_string(), ".ignore".to_string()],
            global_ignore: None,
            vcs_directories: DEFAULT_VCS_DIRECTORIES.iter().map(|s| s.to_string()).collect(),
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            respect_ignore: true,
        }
    }
}

impl Config {
    /// Resolve and load the configuration: `explicit`, then `$BLOCKSEARCH_CONFIG`,
    /// then the per-user file, then defaults. An explicitly named file must
    /// exist; the per-user one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => return Self::from_file(&expand(&path)),
            _ => {}
        }

        let default_path = expand(DEFAULT_CONFIG_PATH);
        if default_path.is_file() {
            return Self::from_file(&default_path);
        }

        debug!("no configuration file, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BlockSearchError::io(path, e))?;
        let config = Self::from_toml(&content)
            .map_err(|e| BlockSearchError::Config(format!("{}: {}", path.display(), e)))?;

        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| BlockSearchError::Config(e.to_string()))?;

        if let Some(global) = &config.global_ignore {
            config.global_ignore = Some(expand(&global.to_string_lossy()));
        }
        Ok(config)
    }

    pub fn predicate_timeout(&self) -> Duration {
        Duration::from_millis(self.predicate_timeout_ms)
    }

    pub fn thread_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    pub fn walker_options(&self) -> WalkerOptions {
        WalkerOptions {
            extensions: self.extensions.clone(),
            respect_ignore: self.respect_ignore,
            ignore_files: self.ignore_files.clone(),
            global_ignore: self.global_ignore.clone(),
            vcs_directories: self.vcs_directories.clone(),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
