//! Embedded metadata extraction from a leading JPEG window.
//!
//! The engine sees only the first few hundred KiB of a file, so every
//! structure it walks may be cut off. Nothing in here is allowed to fail
//! outward: a missing marker, an offset past the end of the window, a wrongly
//! typed tag and a broken XML packet all collapse into an absent field.
//!
//! | Step | Module | Output |
//! |---|---|---|
//! | **Framing** | [`segments`] | APP1/Exif payload range, XMP packet range |
//! | **EXIF** | [`tiff`] | `DateTimeOriginal` string |
//! | **XMP** | [`xmp`] | ordered, de-duplicated keywords |
//!
//! [`extract`] composes the three. The two sub-extractions are independent:
//! a malformed XMP packet never costs the date and vice versa.
//!
//! ```text
//! FF D8 | FF E1 len "Exif\0\0" <TIFF ...> | FF E1 len "http://ns.adobe.com/xap/1.0/\0" <x:xmpmeta ...> | FF DA ...
//!       |-------- locate_app1 -----------|               |------------- locate_xmp -------------|
//! ```
//!
//! The engine is a pure function of its input: no caches, no counters, no
//! shared state. Callers can fan it out across a worker pool freely.

pub mod segments;
pub mod tiff;
pub mod xmp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use segments::{Segment, locate_app1, locate_xmp};
pub use tiff::decode_date_time_original;
pub use xmp::decode_keywords;

/// Why a field could not be recovered.
///
/// These never reach the caller of [`extract`]; the public decoders log them
/// at debug level and report the field as absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{0} not found")]
    Absent(&'static str),
    #[error("read of {len} bytes at offset {offset} exceeds {available}-byte buffer")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },
    #[error("encoding mismatch: {0}")]
    EncodingMismatch(&'static str),
    #[error("malformed XMP document: {0}")]
    MalformedDocument(String),
}

/// Metadata recovered from one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// `DateTimeOriginal` as written by the camera, e.g. `2026:01:09 14:32:10`.
    pub date: Option<String>,
    /// `dc:subject` keywords followed by `lr:hierarchicalSubject` entries.
    pub keywords: Vec<String>,
}

impl ExtractionResult {
    /// True when neither field could be recovered.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.keywords.is_empty()
    }
}

/// Extract the capture date and keywords from a (possibly truncated) JPEG prefix.
///
/// Never fails. The worst case is an empty [`ExtractionResult`].
pub fn extract(data: &[u8]) -> ExtractionResult {
    let date = locate_app1(data)
        .and_then(|segment| segment.payload(data))
        .and_then(decode_date_time_original);

    let keywords = locate_xmp(data)
        .and_then(|range| data.get(range))
        .map(decode_keywords)
        .unwrap_or_default();

    ExtractionResult { date, keywords }
}
