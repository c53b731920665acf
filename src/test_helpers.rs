//! Shared test utilities for the window-harvest test suite.
//!
//! Builders for synthetic JPEG windows: marker segments, TIFF blocks with a
//! `DateTimeOriginal` tag in either byte order, and XMP packets with keyword
//! containers. Everything returns plain bytes so tests can truncate, splice
//! and corrupt them freely.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let data = jpeg(&[
//!     app1_exif(&tiff_with_date(ByteOrder::LittleEndian, "2026:01:09 14:32:10")),
//!     app1_xmp(&xmp_packet(&subject_bag(&["Artemis", "Orion"]))),
//! ]);
//! let result = extract(&data);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::extract::segments::{EXIF_HEADER, SOI};
use crate::extract::tiff::{ByteOrder, TAG_DATE_TIME_ORIGINAL, TAG_EXIF_IFD};

const XMP_APP1_HEADER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

// =========================================================================
// JPEG framing
// =========================================================================

/// SOI, the given segments, then a scan header, a few bytes of entropy-coded
/// data and EOI.
pub fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut data = SOI.to_vec();
    for segment in segments {
        data.extend_from_slice(segment);
    }
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    data.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// A length-framed marker segment.
pub fn app_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let length = u16::try_from(payload.len() + 2).expect("segment payload too large");
    let mut segment = vec![0xFF, marker];
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(payload);
    segment
}

/// APP1 carrying `Exif\0\0` and a TIFF block.
pub fn app1_exif(tiff: &[u8]) -> Vec<u8> {
    let mut payload = EXIF_HEADER.to_vec();
    payload.extend_from_slice(tiff);
    app_segment(0xE1, &payload)
}

/// APP1 carrying the Adobe XMP namespace header and a packet.
pub fn app1_xmp(packet: &str) -> Vec<u8> {
    let mut payload = XMP_APP1_HEADER.to_vec();
    payload.extend_from_slice(packet.as_bytes());
    app_segment(0xE1, &payload)
}

// =========================================================================
// TIFF blocks
// =========================================================================

fn put_u16(out: &mut Vec<u8>, order: ByteOrder, value: u16) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn put_u32(out: &mut Vec<u8>, order: ByteOrder, value: u32) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn encode_u32(order: ByteOrder, value: u32) -> [u8; 4] {
    match order {
        ByteOrder::LittleEndian => value.to_le_bytes(),
        ByteOrder::BigEndian => value.to_be_bytes(),
    }
}

/// The 8-byte TIFF header.
pub fn tiff_header(order: ByteOrder, ifd0_offset: u32) -> Vec<u8> {
    let mut out = order.mark().to_vec();
    put_u16(&mut out, order, 42);
    put_u32(&mut out, order, ifd0_offset);
    out
}

/// One 12-byte IFD entry.
pub fn ifd_entry(
    order: ByteOrder,
    tag: u16,
    field_type: u16,
    count: u32,
    value: [u8; 4],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(12);
    put_u16(&mut out, order, tag);
    put_u16(&mut out, order, field_type);
    put_u32(&mut out, order, count);
    out.extend_from_slice(&value);
    out
}

/// A TIFF block whose Exif IFD holds `raw` under tag 0x9003 with the given
/// field type. Values longer than four bytes are stored after the directories.
///
/// ```text
///  0  header (IFD0 at 8)
///  8  IFD0: 1 entry (0x8769 → 26), next = 0
/// 26  Exif IFD: 1 entry (0x9003), next = 0
/// 44  value bytes (when not inline)
/// ```
pub fn tiff_with_raw_date(order: ByteOrder, field_type: u16, raw: &[u8]) -> Vec<u8> {
    const IFD0: u32 = 8;
    const EXIF_IFD: u32 = 26;
    const VALUE: u32 = 44;

    let mut out = tiff_header(order, IFD0);

    put_u16(&mut out, order, 1);
    out.extend(ifd_entry(order, TAG_EXIF_IFD, 4, 1, encode_u32(order, EXIF_IFD)));
    put_u32(&mut out, order, 0);

    let value = if raw.len() <= 4 {
        let mut inline = [0u8; 4];
        inline[..raw.len()].copy_from_slice(raw);
        inline
    } else {
        encode_u32(order, VALUE)
    };
    put_u16(&mut out, order, 1);
    out.extend(ifd_entry(
        order,
        TAG_DATE_TIME_ORIGINAL,
        field_type,
        raw.len() as u32,
        value,
    ));
    put_u32(&mut out, order, 0);

    if raw.len() > 4 {
        out.extend_from_slice(raw);
    }
    out
}

/// A TIFF block with a NUL-terminated ASCII `DateTimeOriginal`.
pub fn tiff_with_date(order: ByteOrder, date: &str) -> Vec<u8> {
    let mut raw = date.as_bytes().to_vec();
    raw.push(0);
    tiff_with_raw_date(order, 2, &raw)
}

// =========================================================================
// XMP packets
// =========================================================================

/// Wrap RDF content in an `x:xmpmeta` envelope with the usual namespaces bound.
pub fn xmp_packet(body: &str) -> String {
    format!(
        r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">{body}</rdf:RDF></x:xmpmeta>"#
    )
}

fn list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("<rdf:li>{item}</rdf:li>"))
        .collect()
}

/// An `rdf:Description` holding a `dc:subject` bag.
pub fn subject_bag(items: &[&str]) -> String {
    format!(
        r#"<rdf:Description xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:subject><rdf:Bag>{}</rdf:Bag></dc:subject></rdf:Description>"#,
        list(items)
    )
}

/// An `rdf:Description` holding an `lr:hierarchicalSubject` bag.
pub fn hierarchical_bag(items: &[&str]) -> String {
    format!(
        r#"<rdf:Description xmlns:lr="http://ns.adobe.com/lightroom/1.0/"><lr:hierarchicalSubject><rdf:Bag>{}</rdf:Bag></lr:hierarchicalSubject></rdf:Description>"#,
        list(items)
    )
}

/// A complete JPEG window with both a date and subject keywords.
pub fn sample_jpeg(date: &str, keywords: &[&str]) -> Vec<u8> {
    jpeg(&[
        app1_exif(&tiff_with_date(ByteOrder::LittleEndian, date)),
        app1_xmp(&xmp_packet(&subject_bag(keywords))),
    ])
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write `files` (relative path, bytes) into a fresh temp directory.
pub fn setup_files(files: &[(&str, &[u8])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, bytes) in files {
        write_file(tmp.path(), rel, bytes);
    }
    tmp
}

pub fn write_file(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}
