//! JPEG marker framing.
//!
//! Walks the marker segments between SOI and the first scan, the region where
//! every APPn block lives. Each framed segment is:
//!
//! ```text
//!   Byte 0:    0xFF
//!   Byte 1:    Marker (0xE1 = APP1, 0xDA = SOS, ...)
//!   Bytes 2-3: Length (big-endian u16, includes these two bytes)
//!   Bytes 4+:  Payload (length - 2 bytes)
//! ```
//!
//! The walk stops at SOS or EOI, on a length that runs past the buffer, or on
//! a length too small to be valid. Stopping is never an error: the input is a
//! window onto the head of a file and is expected to end abruptly.

use std::ops::Range;

pub const SOI: [u8; 2] = [0xFF, 0xD8];
pub const EXIF_HEADER: &[u8] = b"Exif\0\0";

pub const APP1: u8 = 0xE1;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const TEM: u8 = 0x01;

/// Opening and closing tags of an XMP envelope, tried in order.
const XMP_ENVELOPES: [(&[u8], &[u8]); 2] = [
    (b"<x:xmpmeta", b"</x:xmpmeta>"),
    (b"<xmpmeta", b"</xmpmeta>"),
];

/// A located marker segment. Offsets index the buffer it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub marker: u8,
    pub payload_start: usize,
    pub payload_end: usize,
}

impl Segment {
    /// The payload bytes, or `None` if `data` is not the buffer this came from.
    pub fn payload<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.payload_start..self.payload_end)
    }
}

/// Whether the buffer opens with the JPEG start-of-image marker.
pub fn has_soi(data: &[u8]) -> bool {
    data.starts_with(&SOI)
}

/// Iterate the framed segments of a JPEG header.
///
/// Yields nothing for buffers without SOI.
pub fn segments(data: &[u8]) -> Segments<'_> {
    let framed = has_soi(data);
    Segments {
        data,
        pos: SOI.len(),
        done: !framed,
    }
}

/// Iterator returned by [`segments`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.done {
            return None;
        }
        let data = self.data;

        while self.pos + 1 < data.len() {
            if data[self.pos] != 0xFF {
                self.pos += 1;
                continue;
            }

            let marker = data[self.pos + 1];
            // 0xFF fill bytes and stuffed 0xFF00 are not markers
            if marker == 0xFF || marker == 0x00 {
                self.pos += 1;
                continue;
            }

            match marker {
                EOI | SOS => break,
                // RST0-7, a stray SOI and TEM carry no length field
                TEM | 0xD0..=0xD8 => {
                    self.pos += 2;
                    continue;
                }
                _ => {}
            }

            let Some(&[hi, lo]) = data.get(self.pos + 2..self.pos + 4) else {
                log::trace!("marker {marker:#04X} at {} has no length field", self.pos);
                break;
            };
            let length = u16::from_be_bytes([hi, lo]) as usize;
            if length < 2 {
                log::trace!("marker {marker:#04X} at {} has length {length}", self.pos);
                break;
            }

            let payload_start = self.pos + 4;
            let payload_end = self.pos + 2 + length;
            if payload_end > data.len() {
                log::trace!(
                    "marker {marker:#04X} at {} runs to {payload_end}, window ends at {}",
                    self.pos,
                    data.len()
                );
                break;
            }

            self.pos = payload_end;
            return Some(Segment {
                marker,
                payload_start,
                payload_end,
            });
        }

        self.done = true;
        None
    }
}

/// Locate the APP1/Exif segment.
///
/// The returned range skips the `Exif\0\0` header and starts at the TIFF
/// byte-order mark.
pub fn locate_app1(data: &[u8]) -> Option<Segment> {
    segments(data).find_map(|segment| {
        let payload = segment.payload(data)?;
        (segment.marker == APP1 && payload.starts_with(EXIF_HEADER)).then(|| Segment {
            payload_start: segment.payload_start + EXIF_HEADER.len(),
            ..segment
        })
    })
}

/// Locate the XMP packet, from its opening tag through the matching close.
///
/// This is a plain substring search rather than a segment walk: writers do
/// not always put the packet in a single well-formed APP1 block.
pub fn locate_xmp(data: &[u8]) -> Option<Range<usize>> {
    if !has_soi(data) {
        return None;
    }
    XMP_ENVELOPES.iter().find_map(|&(open, close)| {
        let start = find_bytes(data, open, 0)?;
        let close_at = find_bytes(data, close, start + open.len())?;
        Some(start..close_at + close.len())
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
