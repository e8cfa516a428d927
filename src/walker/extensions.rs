use std::collections::HashSet;
use std::path::Path;

/// Flatten user-supplied extension lists: `["go,py", ".rs"]` -> `go, py, rs`
pub fn expand_extensions<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .flat_map(|item| item.as_ref().split(','))
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .filter(|ext| seen.insert(ext.clone()))
        .collect()
}

/// Extension allow-list; an empty list allows everything
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    allowed: HashSet<String>,
}

impl ExtensionFilter {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        Self {
            allowed: expand_extensions(raw).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn allows(&self, path: &Path) -> bool {
        if self.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.allowed.contains(ext))
    }
}
