//! Path exclusion chain
//!
//! Rules are consulted in order and the first one with an opinion decides.
//! A gitignore whitelist (`!pattern`) is an opinion too, so a nearer ignore
//! file can re-include what a farther one excludes.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Exclude,
    Include,
    /// No opinion, ask the next rule
    Pass,
}

pub trait PathExclusion: Send + Sync {
    fn name(&self) -> String;

    /// `path` is absolute
    fn check(&self, path: &Path, is_dir: bool) -> Verdict;
}

/// Prunes version-control metadata directories by name
#[derive(Debug, Clone)]
pub struct VcsDirectories {
    names: Vec<String>,
}

pub const DEFAULT_VCS_DIRECTORIES: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

impl VcsDirectories {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }
}

impl Default for VcsDirectories {
    fn default() -> Self {
        Self::new(DEFAULT_VCS_DIRECTORIES)
    }
}

impl PathExclusion for VcsDirectories {
    fn name(&self) -> String {
        "vcs-directories".to_string()
    }

    fn check(&self, path: &Path, is_dir: bool) -> Verdict {
        if !is_dir {
            return Verdict::Pass;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if self.names.iter().any(|n| n == name) {
            Verdict::Exclude
        } else {
            Verdict::Pass
        }
    }
}

/// One gitignore-syntax file, anchored at its own directory
#[derive(Debug, Clone)]
pub struct IgnoreFile {
    source: PathBuf,
    matcher: Gitignore,
}

impl IgnoreFile {
    /// Load `file` with patterns relative to `root`. Unreadable or empty
    /// files yield `None`.
    pub fn load(root: &Path, file: &Path) -> Option<Self> {
        if !file.is_file() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(file) {
            warn!("partially loaded ignore file {}: {}", file.display(), err);
        }

        match builder.build() {
            Ok(matcher) if !matcher.is_empty() => {
                debug!(
                    "loaded {} ignore patterns from {}",
                    matcher.num_ignores() + matcher.num_whitelists(),
                    file.display()
                );
                Some(Self {
                    source: file.to_path_buf(),
                    matcher,
                })
            }
            Ok(_) => None,
            Err(err) => {
                warn!("skipping ignore file {}: {}", file.display(), err);
                None
            }
        }
    }

    /// Every file of `names` present in `dir`, highest precedence first
    /// (later names win, as `.ignore` beats `.gitignore`).
    pub fn load_dir<S: AsRef<str>>(dir: &Path, names: &[S]) -> Vec<Self> {
        names
            .iter()
            .rev()
            .filter_map(|name| Self::load(dir, &dir.join(name.as_ref())))
            .collect()
    }

    pub fn root(&self) -> &Path {
        self.matcher.path()
    }
}

impl PathExclusion for IgnoreFile {
    fn name(&self) -> String {
        self.source.display().to_string()
    }

    fn check(&self, path: &Path, is_dir: bool) -> Verdict {
        if !path.starts_with(self.matcher.path()) {
            return Verdict::Pass;
        }

        // parents matter when the walk starts below this file's directory
        let matched = self.matcher.matched_path_or_any_parents(path, is_dir);
        if matched.is_ignore() {
            Verdict::Exclude
        } else if matched.is_whitelist() {
            Verdict::Include
        } else {
            Verdict::Pass
        }
    }
}

/// Fallback ignore rules that apply everywhere (user-level ignore file)
#[derive(Debug, Clone)]
pub struct GlobalIgnore {
    name: String,
    matcher: Gitignore,
}

impl GlobalIgnore {
    /// Load `file` when given and present, else git's `core.excludesFile`
    pub fn load(file: Option<&Path>) -> Option<Self> {
        if let Some(file) = file.filter(|f| f.is_file()) {
            // anchored patterns in a global file have no meaningful root
            let mut builder = GitignoreBuilder::new("");
            if let Some(err) = builder.add(file) {
                warn!("partially loaded global ignore {}: {}", file.display(), err);
            }
            return match builder.build() {
                Ok(matcher) if !matcher.is_empty() => Some(Self {
                    name: file.display().to_string(),
                    matcher,
                }),
                Ok(_) => None,
                Err(err) => {
                    warn!("skipping global ignore {}: {}", file.display(), err);
                    None
                }
            };
        }

        let (matcher, err) = Gitignore::global();
        if let Some(err) = err {
            debug!("git global excludes: {}", err);
        }
        (!matcher.is_empty()).then(|| Self {
            name: "git core.excludesFile".to_string(),
            matcher,
        })
    }
}

impl PathExclusion for GlobalIgnore {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn check(&self, path: &Path, is_dir: bool) -> Verdict {
        // global patterns are unanchored, match on the name
        let Some(name) = path.file_name() else {
            return Verdict::Pass;
        };

        let matched = self.matcher.matched(Path::new(name), is_dir);
        if matched.is_ignore() {
            Verdict::Exclude
        } else if matched.is_whitelist() {
            Verdict::Include
        } else {
            Verdict::Pass
        }
    }
}

/// Ordered list of rules; first verdict wins
#[derive(Default)]
pub struct ExclusionChain {
    rules: Vec<Box<dyn PathExclusion>>,
}

impl ExclusionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Box<dyn PathExclusion>) {
        self.rules.push(rule);
    }

    pub fn with(mut self, rule: impl PathExclusion + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// First rule with an opinion, or `Pass` when none has one
    pub fn verdict(&self, path: &Path, is_dir: bool) -> (Verdict, Option<String>) {
        for rule in &self.rules {
            match rule.check(path, is_dir) {
                Verdict::Pass => continue,
                verdict => return (verdict, Some(rule.name())),
            }
        }
        (Verdict::Pass, None)
    }
}

impl std::fmt::Debug for ExclusionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}
