// Shared test helpers: on-disk workspaces and capturable writers

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::blocks::{Block, Query, scan, split_lines};

/// Create a temp directory populated with `(relative path, contents)` pairs
pub fn workspace(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write_files(temp.path(), files);
    temp
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write file");
    }
}

/// Scan a literal source with the given anchor and offset
pub fn scan_source(source: &str, anchor: &str, offset: i64) -> Vec<Block> {
    let query = Query::new(anchor, offset).expect("valid anchor");
    scan(&split_lines(source), &query)
}

/// (first line, last line) of every block
pub fn spans(blocks: &[Block]) -> Vec<(usize, usize)> {
    blocks.iter().map(|b| (b.line_start(), b.line_end())).collect()
}

/// `Write` sink whose contents stay readable after being boxed away
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
