//! Directory batch conversion with per-file failure isolation.

use crate::convert::{convert, Conversion};
use crate::{ConversionRequest, Error, Result};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Extension matched by the batch runner (non-recursive `*.svg`).
pub const INPUT_EXTENSION: &str = "svg";

/// Result of converting one file in a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<Conversion>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A failed batch item, kept for reporting
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Aggregate counts for a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

/// List `*.svg` files directly inside `dir`, sorted by path.
pub fn find_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let search_error = |source| Error::DirectorySearch {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(search_error)? {
        let path = entry.map_err(search_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == INPUT_EXTENSION) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoInputFiles(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// Convert every `*.svg` in `dir` with the settings of `template`, in order.
///
/// Each file gets its own request with a derived output path. A failing file is
/// logged, reported through `on_file` and skipped; only directory-level problems
/// return `Err`.
pub fn run_batch<F>(dir: &Path, template: &ConversionRequest, mut on_file: F) -> Result<BatchSummary>
where
    F: FnMut(usize, usize, &FileOutcome),
{
    let files = find_inputs(dir)?;
    let total = files.len();
    info!(
        "Found {} SVG files in {}, converting ({} mode)",
        total,
        dir.display(),
        template.mode
    );

    let started = Instant::now();
    let mut summary = BatchSummary {
        total,
        ..Default::default()
    };

    for (index, input) in files.into_iter().enumerate() {
        let request = template.for_input(&input);
        let outcome = FileOutcome {
            result: convert(&request),
            input,
        };

        match &outcome.result {
            Ok(_) => summary.succeeded += 1,
            Err(e) => {
                warn!("[{}/{}] {} failed: {}", index + 1, total, outcome.input.display(), e);
                summary.failures.push(BatchFailure {
                    input: outcome.input.clone(),
                    error: e.to_string(),
                });
            }
        }
        on_file(index, total, &outcome);
    }

    summary.elapsed = started.elapsed();
    info!(
        "Batch finished: {}/{} succeeded in {:?}",
        summary.succeeded, summary.total, summary.elapsed
    );
    Ok(summary)
}
