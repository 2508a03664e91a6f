//! Batch Processing Module
//!
//! File collection for batch runs and per-batch outcome bookkeeping.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const GIF_EXTENSIONS: &[&str] = &["gif"];

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Files directly inside `dir` whose extension is in `extensions`, ordered by file
/// name so runs are reproducible. Subdirectories are not descended into.
///
/// Unreadable entries are skipped; a missing or unreadable `dir` is an error.
pub fn collect_files(dir: &Path, extensions: &[&str]) -> std::io::Result<Vec<PathBuf>> {
    // Surface a missing input directory instead of silently yielding nothing.
    std::fs::read_dir(dir)?;

    Ok(WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect())
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Bytes written to successful outputs.
    pub output_bytes: u64,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            output_bytes: 0,
            errors: Vec::new(),
        }
    }

    pub fn success(&mut self, output_bytes: u64) {
        self.total += 1;
        self.succeeded += 1;
        self.output_bytes += output_bytes;
    }

    pub fn fail(&mut self, path: PathBuf, error: String) {
        self.total += 1;
        self.failed += 1;
        self.errors.push((path, error));
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}
