//! CLI output formatting.
//!
//! Output is **record-centric**: each image is shown by its identifier and
//! title, with the recovered metadata as indented context lines.
//!
//! # Output Format
//!
//! ## Extract
//!
//! ```text
//! photos/NHQ20260109_0001.jpg
//!     Date: 2026:01:09 14:32:10
//!     Keywords: Artemis II, Orion
//! ```
//!
//! ## Catalog / Check
//!
//! ```text
//! 001 NHQ20260109_0001 · Orion on the pad
//!     Date: 2026:01:09 14:32:10
//!     Keywords: Artemis II, Orion
//! 002 KSC-rollout · KSC rollout
//!     Date: (none)
//!
//! Skipped
//!     photos/broken.jpg: IO error: permission denied
//!
//! 2 records, 1 skipped
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::catalog::CatalogRecord;
use crate::extract::ExtractionResult;
use crate::scan::Failure;
use std::path::Path;

const NONE: &str = "(none)";
const CONTEXT_INDENT: &str = "    ";

/// An indented line under a record or file header.
fn context_line(text: impl std::fmt::Display) -> String {
    format!("{CONTEXT_INDENT}{text}")
}

/// Date and keyword lines shared by the extract and catalog views.
///
/// The keyword line is omitted when there are none, the date line never is.
fn metadata_lines(date: Option<&str>, keywords: &[String]) -> Vec<String> {
    let mut lines = vec![context_line(format_args!("Date: {}", date.unwrap_or(NONE)))];
    if !keywords.is_empty() {
        lines.push(context_line(format_args!("Keywords: {}", keywords.join(", "))));
    }
    lines
}

// ============================================================================
// Extract
// ============================================================================

pub fn format_extraction(path: &Path, result: &ExtractionResult) -> Vec<String> {
    let mut lines = vec![path.display().to_string()];
    lines.extend(metadata_lines(result.date.as_deref(), &result.keywords));
    lines
}

pub fn print_extraction(path: &Path, result: &ExtractionResult) {
    for line in format_extraction(path, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Catalog position and identifier, plus the title when it says more than the id.
fn record_header(position: usize, record: &CatalogRecord) -> String {
    if record.title.is_empty() || record.title == record.id {
        format!("{position:03} {}", record.id)
    } else {
        format!("{position:03} {} · {}", record.id, record.title)
    }
}

pub fn format_records(records: &[CatalogRecord], failures: &[Failure]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, record) in records.iter().enumerate() {
        lines.push(record_header(i + 1, record));
        lines.extend(metadata_lines(record.date.as_deref(), &record.keywords));
    }

    if !failures.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for failure in failures {
            lines.push(context_line(format_args!(
                "{}: {}",
                failure.path.display(),
                failure.error
            )));
        }
    }

    lines.push(String::new());
    lines.push(summary_line(records.len(), failures.len()));
    lines
}

pub fn print_records(records: &[CatalogRecord], failures: &[Failure]) {
    for line in format_records(records, failures) {
        println!("{}", line);
    }
}

fn summary_line(records: usize, skipped: usize) -> String {
    let noun = if records == 1 { "record" } else { "records" };
    if skipped == 0 {
        format!("{records} {noun}")
    } else {
        format!("{records} {noun}, {skipped} skipped")
    }
}
