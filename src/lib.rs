//! # window-harvest
//!
//! Recover the capture date and keywords of a JPEG from its first few hundred
//! KiB, then publish them as a gallery catalog.
//!
//! # Architecture: Window → Extract → Catalog
//!
//! ```text
//! 1. Window    image.jpg  →  &[u8]            (leading bytes only)
//! 2. Extract   &[u8]      →  ExtractionResult (date + keywords, never fails)
//! 3. Catalog   results    →  gallery.json     (dedup, newest first)
//! ```
//!
//! The extraction engine in [`extract`] is the core. It is a pure function over
//! a borrowed buffer with no shared state, so [`scan`] fans it out over a rayon
//! pool without any locking.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | JPEG segment scanning, TIFF/EXIF date decoding, XMP keyword decoding |
//! | [`scan`] | Finds JPEG files, reads their leading windows, harvests in parallel |
//! | [`catalog`] | Catalog records, variant download URLs, ordering, JSON persistence |
//! | [`metadata`] | Title and id-date resolution from sidecars and identifiers |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Absence, Not Errors
//!
//! The input is a deliberately truncated prefix of a file. Running off the end
//! of the buffer is the expected outcome for many files, not a fault. The
//! engine classifies what went wrong ([`extract::ExtractError`]) for debug
//! logging, but the caller only ever sees an absent date or an empty keyword
//! list.
//!
//! ## Local Names Only
//!
//! XMP writers bind `subject` and `hierarchicalSubject` to whatever prefix
//! they like. Keyword extraction matches elements by local name and ignores
//! namespaces entirely.
//!
//! ## Substring Search for XMP
//!
//! EXIF is found by walking JPEG segment framing. XMP is found by searching
//! for its envelope tags anywhere in the window, because packets are not
//! always wrapped in one clean APP1 segment.
//!
//! # Example
//!
//! ```rust
//! use window_harvest::extract::extract;
//!
//! // Too short to hold anything: empty result, no error.
//! let result = extract(&[0xFF, 0xD8]);
//! assert!(result.date.is_none());
//! assert!(result.keywords.is_empty());
//! ```

pub mod catalog;
pub mod config;
pub mod extract;
pub mod metadata;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
