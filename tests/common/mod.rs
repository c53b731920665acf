//! Synthetic JPEG windows for integration tests.

#![allow(dead_code)]

pub const DATE: &str = "2026:01:09 14:32:10";

pub use window_harvest::extract::tiff::ByteOrder;

use std::fs;
use std::path::Path;

fn u16_bytes(order: ByteOrder, v: u16) -> [u8; 2] {
    match order {
        ByteOrder::LittleEndian => v.to_le_bytes(),
        ByteOrder::BigEndian => v.to_be_bytes(),
    }
}

fn u32_bytes(order: ByteOrder, v: u32) -> [u8; 4] {
    match order {
        ByteOrder::LittleEndian => v.to_le_bytes(),
        ByteOrder::BigEndian => v.to_be_bytes(),
    }
}

fn entry(order: ByteOrder, tag: u16, typ: u16, count: u32, value: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&u16_bytes(order, tag));
    out.extend_from_slice(&u16_bytes(order, typ));
    out.extend_from_slice(&u32_bytes(order, count));
    out.extend_from_slice(&value);
    out
}

/// TIFF block: IFD0 at 8 → Exif IFD at 26 → NUL-terminated date at 44.
pub fn tiff(order: ByteOrder, date: &str) -> Vec<u8> {
    let mut out = order.mark().to_vec();
    out.extend_from_slice(&u16_bytes(order, 42));
    out.extend_from_slice(&u32_bytes(order, 8));

    out.extend_from_slice(&u16_bytes(order, 1));
    out.extend(entry(order, 0x8769, 4, 1, u32_bytes(order, 26)));
    out.extend_from_slice(&[0; 4]);

    out.extend_from_slice(&u16_bytes(order, 1));
    out.extend(entry(order, 0x9003, 2, date.len() as u32 + 1, u32_bytes(order, 44)));
    out.extend_from_slice(&[0; 4]);

    out.extend_from_slice(date.as_bytes());
    out.push(0);
    out
}

/// Write `bytes` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

pub fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn exif_segment(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    segment(0xE1, &payload)
}

pub fn xmp_segment(xml: &str) -> Vec<u8> {
    let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    payload.extend_from_slice(xml.as_bytes());
    segment(0xE1, &payload)
}

pub fn xmp(subjects: &[&str], hierarchical: &[&str]) -> String {
    let li = |items: &[&str]| -> String {
        items.iter().map(|i| format!("<rdf:li>{i}</rdf:li>")).collect()
    };
    format!(
        concat!(
            r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">"#,
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">"#,
            r#"<rdf:Description xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:lr="http://ns.adobe.com/lightroom/1.0/">"#,
            "<dc:subject><rdf:Bag>{}</rdf:Bag></dc:subject>",
            "<lr:hierarchicalSubject><rdf:Bag>{}</rdf:Bag></lr:hierarchicalSubject>",
            "</rdf:Description></rdf:RDF></x:xmpmeta>"
        ),
        li(subjects),
        li(hierarchical)
    )
}

pub fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    for s in segments {
        out.extend_from_slice(s);
    }
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0xAB, 0xCD, 0xFF, 0xD9]);
    out
}
