// FileWalker tests: exclusion chain, ignore files, extensions

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::tests::helpers::{workspace, write_files};
use crate::walker::{
    ExclusionChain, FileWalker, PathExclusion, VcsDirectories, Verdict, WalkerOptions,
    display_path, expand_extensions,
};

/// Options that do not pick up the developer's global git excludes
fn isolated(global: &TempDir) -> WalkerOptions {
    let empty = global.path().join("empty-global-ignore");
    fs::write(&empty, "").expect("Failed to write global ignore");
    WalkerOptions {
        global_ignore: Some(empty),
        ..Default::default()
    }
}

fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .unwrap_or(f)
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn list(root: &Path, options: &WalkerOptions) -> Vec<String> {
    relative(root, FileWalker::new(options).list_files(root))
}

#[test]
fn test_walk_prunes_vcs_directories() {
    let temp = workspace(&[
        ("a.rs", "fn a() {}"),
        ("b.py", "def b(): pass"),
        ("sub/c.rs", "fn c() {}"),
        (".git/HEAD", "ref: refs/heads/main"),
        (".hg/store", "x"),
    ]);
    let global = TempDir::new().unwrap();

    assert_eq!(list(temp.path(), &isolated(&global)), vec!["a.rs", "b.py", "sub/c.rs"]);
}

#[test]
fn test_extension_allow_list() {
    let temp = workspace(&[("a.rs", ""), ("b.py", ""), ("c.go", ""), ("Makefile", "")]);
    let global = TempDir::new().unwrap();

    let options = WalkerOptions {
        extensions: vec!["py, .rs".to_string()],
        ..isolated(&global)
    };
    assert_eq!(list(temp.path(), &options), vec!["a.rs", "b.py"]);
}

#[test]
fn test_gitignore_excludes_files_and_directories() {
    let temp = workspace(&[
        (".gitignore", "target/\n*.log\n"),
        ("target/debug/x.rs", ""),
        ("debug.log", ""),
        ("src/main.rs", ""),
    ]);
    let global = TempDir::new().unwrap();

    assert_eq!(list(temp.path(), &isolated(&global)), vec![".gitignore", "src/main.rs"]);
}

#[test]
fn test_whitelist_reincludes() {
    let temp = workspace(&[
        (".gitignore", "*.log\n!keep.log\n"),
        ("keep.log", ""),
        ("drop.log", ""),
    ]);
    let global = TempDir::new().unwrap();

    assert_eq!(list(temp.path(), &isolated(&global)), vec![".gitignore", "keep.log"]);
}

#[test]
fn test_nested_ignore_file_only_applies_below_it() {
    let temp = workspace(&[
        ("sub/.gitignore", "secret.txt\n"),
        ("sub/secret.txt", ""),
        ("secret.txt", ""),
    ]);
    let global = TempDir::new().unwrap();

    assert_eq!(
        list(temp.path(), &isolated(&global)),
        vec!["secret.txt", "sub/.gitignore"]
    );
}

#[test]
fn test_nearer_ignore_file_wins() {
    let temp = workspace(&[
        (".gitignore", "*.gen\n"),
        ("x.gen", ""),
        ("sub/.gitignore", "!keep.gen\n"),
        ("sub/keep.gen", ""),
        ("sub/drop.gen", ""),
    ]);
    let global = TempDir::new().unwrap();

    assert_eq!(
        list(temp.path(), &isolated(&global)),
        vec![".gitignore", "sub/.gitignore", "sub/keep.gen"]
    );
}

#[test]
fn test_dot_ignore_beats_gitignore_in_same_directory() {
    let temp = workspace(&[
        (".gitignore", "*.txt\n"),
        (".ignore", "!a.txt\n"),
        ("a.txt", ""),
        ("b.txt", ""),
    ]);
    let global = TempDir::new().unwrap();

    assert_eq!(
        list(temp.path(), &isolated(&global)),
        vec![".gitignore", ".ignore", "a.txt"]
    );
}

#[test]
fn test_ignore_files_above_walk_root_apply_up_to_repository() {
    let temp = workspace(&[
        (".git/HEAD", ""),
        (".gitignore", "*.tmp\n"),
        ("sub/a.tmp", ""),
        ("sub/a.rs", ""),
    ]);
    let global = TempDir::new().unwrap();
    let sub = temp.path().join("sub");

    assert_eq!(list(&sub, &isolated(&global)), vec!["a.rs"]);
}

#[test]
fn test_no_ignore_still_prunes_vcs() {
    let temp = workspace(&[
        (".gitignore", "*.log\n"),
        ("debug.log", ""),
        (".git/HEAD", ""),
    ]);
    let global = TempDir::new().unwrap();

    let options = WalkerOptions {
        respect_ignore: false,
        ..isolated(&global)
    };
    assert_eq!(list(temp.path(), &options), vec![".gitignore", "debug.log"]);
}

#[test]
fn test_configured_global_ignore() {
    let temp = workspace(&[("x.bak", ""), ("x.rs", "")]);
    let global = TempDir::new().unwrap();
    let file = global.path().join("ignore");
    fs::write(&file, "*.bak\n").unwrap();

    let options = WalkerOptions {
        global_ignore: Some(file),
        ..Default::default()
    };
    assert_eq!(list(temp.path(), &options), vec!["x.rs"]);
}

#[test]
fn test_explicit_file_root() {
    let temp = workspace(&[("a.py", "def a(): pass")]);
    let global = TempDir::new().unwrap();
    let file = temp.path().join("a.py");

    let walker = FileWalker::new(&isolated(&global));
    assert_eq!(walker.list_files(&file), vec![file.clone()]);

    let rust_only = FileWalker::new(&WalkerOptions {
        extensions: vec!["rs".to_string()],
        ..isolated(&global)
    });
    assert!(rust_only.list_files(&file).is_empty());
}

#[test]
fn test_missing_root_yields_nothing() {
    let temp = TempDir::new().unwrap();
    let walker = FileWalker::default();
    assert!(walker.list_files(&temp.path().join("missing")).is_empty());
}

#[test]
fn test_walk_is_lazy_and_ordered() {
    let temp = workspace(&[("b/2.txt", ""), ("a/1.txt", ""), ("c.txt", "")]);
    let global = TempDir::new().unwrap();
    let walker = FileWalker::new(&isolated(&global));

    let first = walker.produce_files(temp.path()).next();
    assert_eq!(first, Some(temp.path().join("a").join("1.txt")));
    assert_eq!(list(temp.path(), &isolated(&global)), vec!["a/1.txt", "b/2.txt", "c.txt"]);
}

#[test]
fn test_chain_first_opinion_wins() {
    let chain = ExclusionChain::new().with(VcsDirectories::default());
    assert_eq!(ExclusionChain::new().verdict(Path::new("/repo/.git"), true), (Verdict::Pass, None));

    let (verdict, rule) = chain.verdict(Path::new("/repo/.git"), true);
    assert_eq!(verdict, Verdict::Exclude);
    assert_eq!(rule.as_deref(), Some("vcs-directories"));

    // a regular file named like a VCS directory is not pruned
    assert_eq!(chain.verdict(Path::new("/repo/.git"), false).0, Verdict::Pass);
    assert_eq!(VcsDirectories::default().check(Path::new("/repo/src"), true), Verdict::Pass);
}

#[test]
fn test_expand_extensions() {
    let raw = vec!["go,py".to_string(), ".rs".to_string(), " py ".to_string(), "".to_string()];
    assert_eq!(expand_extensions(&raw), vec!["go", "py", "rs"]);
}

#[test]
fn test_display_path_drops_current_dir_prefix() {
    assert_eq!(display_path(Path::new("./src/a.rs")), "src/a.rs");
    assert_eq!(display_path(Path::new("src/a.rs")), "src/a.rs");

    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("z.txt", "")]);
    assert!(display_path(&temp.path().join("z.txt")).ends_with("z.txt"));
}
