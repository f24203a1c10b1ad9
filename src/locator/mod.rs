//! Metrics file discovery.
//!
//! Each training pipeline drops its metrics CSV somewhere in its own
//! directory. The locator finds the single most appropriate file for a
//! model: name contains the configured pattern, extension is `.csv`,
//! newest modification time wins when several candidates exist.

use crate::models::ModelSpec;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Locates per-model metrics files under a base directory.
pub struct MetricsLocator {
    base_dir: PathBuf,
}

impl MetricsLocator {
    /// Create a locator rooted at `base_dir`.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Find the metrics file for one model.
    ///
    /// Returns `Ok(None)` when the model directory does not exist or
    /// contains no matching file; a missing model is not an error.
    pub fn locate(&self, spec: &ModelSpec) -> Result<Option<PathBuf>> {
        let model_dir = self.base_dir.join(&spec.folder);
        if !model_dir.is_dir() {
            debug!("Model directory not found: {}", model_dir.display());
            return Ok(None);
        }

        let mut candidates: Vec<(PathBuf, SystemTime)> = WalkDir::new(&model_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| matches_spec(entry.path(), spec))
            .filter_map(|entry| {
                let mtime = entry.metadata().ok()?.modified().ok()?;
                Some((entry.into_path(), mtime))
            })
            .collect();

        if candidates.is_empty() {
            return Ok(None);
        }

        // Newest mtime first; ties keep scan order (stable sort).
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let (path, _) = candidates.swap_remove(0);
        debug!("Located metrics file: {}", path.display());
        Ok(Some(path))
    }
}

/// Check whether a file name matches the spec's pattern and is a CSV.
fn matches_spec(path: &Path, spec: &ModelSpec) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };

    if !name.contains(&spec.pattern) {
        return false;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
