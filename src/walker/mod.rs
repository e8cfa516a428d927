//! Candidate file discovery
//!
//! Walks a root lazily, pruning directories through the exclusion chain
//! before descending, and applies the extension allow-list to files. Rule
//! order: VCS directories, ignore files nested in the walk (deepest first),
//! ignore files above the root (nearest first), then the global fallback.

pub mod extensions;
pub mod rules;
pub mod sniff;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

pub use extensions::{ExtensionFilter, expand_extensions};
pub use rules::{
    ExclusionChain, GlobalIgnore, IgnoreFile, PathExclusion, VcsDirectories, Verdict,
};
pub use sniff::{ContentKind, classify, sniff_file};

/// Walker settings, usually derived from [`crate::config::Config`]
#[derive(Debug, Clone)]
pub struct WalkerOptions {
    pub extensions: Vec<String>,
    pub respect_ignore: bool,
    pub ignore_files: Vec<String>,
    pub global_ignore: Option<PathBuf>,
    pub vcs_directories: Vec<String>,
}

impl Default for WalkerOptions {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            respect_ignore: true,
            ignore_files: vec![".gitignore".to_string(), ".ignore".to_string()],
            global_ignore: None,
            vcs_directories: rules::DEFAULT_VCS_DIRECTORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileWalker {
    extensions: ExtensionFilter,
    vcs: VcsDirectories,
    ignore_files: Vec<String>,
    global: Option<GlobalIgnore>,
}

impl FileWalker {
    pub fn new(options: &WalkerOptions) -> Self {
        let (ignore_files, global) = if options.respect_ignore {
            (
                options.ignore_files.clone(),
                GlobalIgnore::load(options.global_ignore.as_deref()),
            )
        } else {
            (Vec::new(), None)
        };

        Self {
            extensions: ExtensionFilter::new(&options.extensions),
            vcs: VcsDirectories::new(&options.vcs_directories),
            ignore_files,
            global,
        }
    }

    /// Lazily yield candidate files under `root`. An explicit file root is
    /// yielded as long as its extension is allowed.
    pub fn produce_files<'a>(&'a self, root: &Path) -> Box<dyn Iterator<Item = PathBuf> + 'a> {
        let metadata = match std::fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("{}: {}", root.display(), err);
                return Box::new(std::iter::empty());
            }
        };

        if !metadata.is_dir() {
            let allowed = self.extensions.allows(root);
            return Box::new(allowed.then(|| root.to_path_buf()).into_iter());
        }

        let root = root.to_path_buf();
        let abs_root = std::fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        let outer = self.outer_chain(&abs_root);
        let mut nested: Vec<IgnoreFile> = Vec::new();

        let walk = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                let abs = match entry.path().strip_prefix(&root) {
                    Ok(rel) => abs_root.join(rel),
                    Err(_) => entry.path().to_path_buf(),
                };
                let is_dir = entry.file_type().is_dir();

                if entry.depth() > 0 {
                    while nested.last().is_some_and(|rule| !abs.starts_with(rule.root())) {
                        nested.pop();
                    }

                    let (verdict, rule) = self.verdict(&abs, is_dir, &nested, &outer);
                    if verdict == Verdict::Exclude {
                        debug!(
                            "excluded {} ({})",
                            entry.path().display(),
                            rule.unwrap_or_default()
                        );
                        return false;
                    }
                }

                if is_dir && !self.ignore_files.is_empty() {
                    nested.extend(IgnoreFile::load_dir(&abs, &self.ignore_files).into_iter().rev());
                }
                true
            });

        Box::new(walk.filter_map(move |entry| match entry {
            Ok(entry) => {
                let keep = entry.file_type().is_file() && self.extensions.allows(entry.path());
                keep.then(|| entry.into_path())
            }
            Err(err) => {
                warn!("skipping subtree: {}", err);
                None
            }
        }))
    }

    /// Eagerly collect [`Self::produce_files`]
    pub fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        self.produce_files(root).collect()
    }

    fn verdict(
        &self,
        path: &Path,
        is_dir: bool,
        nested: &[IgnoreFile],
        outer: &ExclusionChain,
    ) -> (Verdict, Option<String>) {
        if self.vcs.check(path, is_dir) == Verdict::Exclude {
            return (Verdict::Exclude, Some(self.vcs.name()));
        }

        for rule in nested.iter().rev() {
            match rule.check(path, is_dir) {
                Verdict::Pass => continue,
                verdict => return (verdict, Some(rule.name())),
            }
        }

        outer.verdict(path, is_dir)
    }

    /// Ignore files above the walk root up to the repository root, nearest
    /// first, followed by the global fallback.
    fn outer_chain(&self, abs_root: &Path) -> ExclusionChain {
        let mut chain = ExclusionChain::new();
        if self.ignore_files.is_empty() && self.global.is_none() {
            return chain;
        }

        if !self.ignore_files.is_empty() && !abs_root.join(".git").exists() {
            let ancestors: Vec<&Path> = abs_root.ancestors().skip(1).collect();
            if let Some(repo) = ancestors.iter().position(|dir| dir.join(".git").exists()) {
                for dir in &ancestors[..=repo] {
                    for rule in IgnoreFile::load_dir(dir, &self.ignore_files) {
                        chain.push(Box::new(rule));
                    }
                }
            }
        }

        if let Some(global) = &self.global {
            chain.push(Box::new(global.clone()));
        }

        chain
    }
}

/// Path as shown to users, without a leading `./`
pub fn display_path(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new(&WalkerOptions::default())
    }
}
