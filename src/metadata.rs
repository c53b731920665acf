//! Record metadata that does not come from inside the image.
//!
//! Each catalog record carries two fields resolved outside the extraction
//! engine:
//!
//! - **Title**: a sidecar text file with the same stem as the image
//!   (`NHQ20260109_0001.txt` next to `NHQ20260109_0001.jpg`), falling back to
//!   the filename stem with separators turned into spaces.
//!
//! - **Id date**: a `YYYYMMDD` string recovered from the identifier itself.
//!   Archive identifiers follow a `<prefix><YYYYMMDD>_<seq>` convention, so
//!   records can be sorted chronologically even when the embedded EXIF date
//!   lies past the leading window.
//!
//! ## Resolution priority
//!
//! Title: sidecar `.txt` → filename stem → identifier.

use std::path::Path;

/// Number of digits in a `YYYYMMDD` date.
const ID_DATE_LEN: usize = 8;

/// First usable title candidate: trimmed and non-empty.
///
/// ```text
/// resolve(&[sidecar.as_deref(), stem_title.as_deref(), Some(id)])
/// ```
pub fn resolve(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|candidate| candidate.trim())
        .find(|candidate| !candidate.is_empty())
        .map(String::from)
}

/// Caption text stored next to the image.
///
/// `photos/NHQ20260109_0001.jpg` reads `photos/NHQ20260109_0001.txt`. A missing,
/// unreadable or blank caption file yields `None`.
pub fn read_sidecar(image_path: &Path) -> Option<String> {
    let caption = std::fs::read_to_string(image_path.with_extension("txt")).ok()?;
    let caption = caption.trim();
    (!caption.is_empty()).then(|| caption.to_string())
}

/// The record identifier for an image: its file stem.
pub fn identifier(image_path: &Path) -> Option<String> {
    image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
}

/// Human-readable title from a file stem: `_` and `-` become spaces.
pub fn title_from_stem(image_path: &Path) -> Option<String> {
    let stem = image_path.file_stem()?.to_str()?;
    let title = stem
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!title.is_empty()).then_some(title)
}

/// Extract the `YYYYMMDD` date encoded in an identifier.
///
/// `NHQ20260109_0001` with prefix `NHQ` → `"20260109"`. Anything that does not
/// start with the prefix followed by eight ASCII digits yields `""`.
pub fn id_date(id: &str, prefix: &str) -> String {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.get(..ID_DATE_LEN))
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .map(String::from)
        .unwrap_or_default()
}
