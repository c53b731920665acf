//! Gallery catalog records and persistence.
//!
//! A catalog is a JSON array of [`CatalogRecord`]s, newest first. Each record
//! pairs what the extraction engine recovered (capture date, keywords) with
//! the identifier-derived fields the gallery front end needs:
//!
//! ```text
//! {
//!   "id": "NHQ20260109_0001",
//!   "title": "Orion on the pad",
//!   "id_date": "20260109",
//!   "date": "2026:01:09 14:32:10",
//!   "keywords": ["Artemis II", "Orion"],
//!   "large_url": "https://.../NHQ20260109_0001~large.jpg",
//!   "full_url": "https://.../NHQ20260109_0001~orig.jpg"
//! }
//! ```
//!
//! ## Ordering
//!
//! Records are sorted by `(id_date, id)` descending. Identifiers without an
//! id date sort last. Duplicate identifiers keep their first occurrence.

use crate::config::{CatalogConfig, ID_PLACEHOLDER};
use crate::extract::ExtractionResult;
use crate::metadata;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One published image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    /// `YYYYMMDD` from the identifier, or empty.
    pub id_date: String,
    /// EXIF `DateTimeOriginal`, when it was inside the leading window.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub large_url: String,
    pub full_url: String,
}

impl CatalogRecord {
    /// Build a record from an identifier, a resolved title and an extraction.
    pub fn new(
        id: &str,
        title: &str,
        extraction: ExtractionResult,
        config: &CatalogConfig,
    ) -> Self {
        let source = source_url(&config.url_template, id);
        Self {
            id: id.to_string(),
            title: title.to_string(),
            id_date: metadata::id_date(id, &config.id_prefix),
            date: extraction.date,
            keywords: extraction.keywords,
            large_url: variant_url(&source, &config.large_variant),
            full_url: variant_url(&source, &config.full_variant),
        }
    }
}

/// Fill `{id}` placeholders in a URL template.
pub fn source_url(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, id)
}

/// Swap the `~variant` suffix of an asset URL.
///
/// `.../x~orig.jpg` → `.../x~large.jpg`; a URL without `~` has its extension
/// replaced: `.../x.jpg` → `.../x~large.jpg`.
pub fn variant_url(url: &str, variant: &str) -> String {
    let base = match url.split_once('~') {
        Some((base, _)) => base,
        None => url.rsplit_once('.').map_or(url, |(base, _)| base),
    };
    format!("{base}~{variant}.jpg")
}

/// Deduplicate by identifier (first wins) and sort newest first.
pub fn finalize(records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<CatalogRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect();
    records.sort_by(|a, b| (&b.id_date, &b.id).cmp(&(&a.id_date, &a.id)));
    records
}

/// Write a catalog as pretty-printed JSON.
pub fn write_catalog(path: &Path, records: &[CatalogRecord]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    log::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read a catalog written by [`write_catalog`].
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogRecord>, CatalogError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
