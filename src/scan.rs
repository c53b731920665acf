//! Image discovery and parallel harvesting.
//!
//! Walks a directory tree for JPEG files, reads the leading window of each
//! and runs the extraction engine over them on the rayon pool. Every image
//! becomes one [`CatalogRecord`]:
//!
//! ```text
//! photos/
//! ├── NHQ20260109_0001.jpg      → id NHQ20260109_0001, id_date 20260109
//! ├── NHQ20260109_0001.txt      → title (sidecar)
//! └── launch/
//!     └── KSC-rollout.JPEG      → id KSC-rollout, title "KSC rollout"
//! ```
//!
//! Only `window_bytes` of each file are read. EXIF and XMP sit at the head of
//! a JPEG, so the window stands in for the range request a remote fetcher
//! would make.
//!
//! ## Failures
//!
//! A file that cannot be read is reported in [`HarvestReport::failures`] and
//! the rest of the batch carries on. A file that reads fine but has no
//! recoverable metadata is not a failure: it still gets a record, with an
//! empty date and keyword list.

use crate::catalog::CatalogRecord;
use crate::config::HarvestConfig;
use crate::extract::{self, ExtractionResult};
use crate::metadata;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a JPEG file or directory: {0}")]
    NotJpeg(PathBuf),
    #[error("Cannot derive an identifier from: {0}")]
    NoIdentifier(PathBuf),
}

/// An image that could not be harvested.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: ScanError,
}

/// Outcome of a harvest run, in input order.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub records: Vec<CatalogRecord>,
    pub failures: Vec<Failure>,
}

/// Whether the path has a JPEG extension (case-insensitive).
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            JPEG_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Collect JPEG files under `root`, sorted by path.
///
/// A single JPEG file is returned as-is.
pub fn collect_jpegs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if root.is_file() {
        return if is_jpeg(root) {
            Ok(vec![root.to_path_buf()])
        } else {
            Err(ScanError::NotJpeg(root.to_path_buf()))
        };
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_jpeg(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    log::debug!("Found {} JPEG files under {}", paths.len(), root.display());
    Ok(paths)
}

/// Read at most `window_bytes` from the start of a file.
pub fn read_window(path: &Path, window_bytes: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(window_bytes.min(1024 * 1024));
    file.take(window_bytes as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Run the extraction engine over a file's leading window.
pub fn extract_file(path: &Path, window_bytes: usize) -> Result<ExtractionResult, ScanError> {
    let window = read_window(path, window_bytes)?;
    let result = extract::extract(&window);
    log::debug!(
        "{}: {} bytes read, date {}, {} keywords",
        path.display(),
        window.len(),
        result.date.as_deref().unwrap_or("-"),
        result.keywords.len()
    );
    Ok(result)
}

/// Build the catalog record for one image.
pub fn harvest_one(path: &Path, config: &HarvestConfig) -> Result<CatalogRecord, ScanError> {
    let id = metadata::identifier(path).ok_or_else(|| ScanError::NoIdentifier(path.into()))?;
    let extraction = extract_file(path, config.window_bytes)?;

    let sidecar = metadata::read_sidecar(path);
    let stem_title = metadata::title_from_stem(path);
    let title = metadata::resolve(&[sidecar.as_deref(), stem_title.as_deref(), Some(&id)])
        .unwrap_or_default();

    Ok(CatalogRecord::new(&id, &title, extraction, &config.catalog))
}

/// Harvest every image in parallel.
///
/// Records and failures keep the order of `paths`.
pub fn harvest(paths: &[PathBuf], config: &HarvestConfig) -> HarvestReport {
    let outcomes: Vec<(PathBuf, Result<CatalogRecord, ScanError>)> = paths
        .par_iter()
        .map(|path| (path.clone(), harvest_one(path, config)))
        .collect();

    let mut report = HarvestReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(record) => report.records.push(record),
            Err(error) => {
                log::warn!("Skipping {}: {error}", path.display());
                report.failures.push(Failure { path, error });
            }
        }
    }
    report
}
