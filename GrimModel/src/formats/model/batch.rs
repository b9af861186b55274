//! Batch model decoding
//!
//! File discovery plus parallel decoding of independent files. Each file gets
//! its own reader and result tree; a failure only affects its own entry.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::file::ModelFile;
use super::{ReadOptions, read_model_with};
use crate::error::Result;

/// Outcome of decoding one file in a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    /// Wall time spent decoding this file
    pub elapsed: Duration,
    pub result: Result<ModelFile>,
}

/// Progress update sent after each file finishes.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Files finished so far (1-based)
    pub current: usize,
    pub total: usize,
    pub path: PathBuf,
}

/// Find all .model files in a directory recursively
///
/// # Returns
/// A sorted list of paths to .model files found in the directory tree.
pub fn find_model_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut model_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("model"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    model_files.sort();
    model_files
}

/// Decode many files in parallel.
///
/// The returned entries are in the same order as `paths`, whatever order the
/// files finish in.
pub fn decode_batch<F>(paths: &[PathBuf], options: &ReadOptions, progress: F) -> Vec<BatchEntry>
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let processed = AtomicUsize::new(0);
    let total = paths.len();

    paths
        .par_iter()
        .map(|path| {
            let start = Instant::now();
            let result = read_model_with(path, options);
            let elapsed = start.elapsed();

            if let Err(e) = &result {
                tracing::debug!("Failed to decode {}: {}", path.display(), e);
            }

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress { current, total, path: path.clone() });

            BatchEntry { path: path.clone(), elapsed, result }
        })
        .collect()
}
