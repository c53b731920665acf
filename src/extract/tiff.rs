//! TIFF/EXIF directory decoder.
//!
//! Recovers `DateTimeOriginal` (tag 0x9003) from the TIFF block carried in an
//! APP1/Exif segment. All offsets are relative to the TIFF header, i.e. the
//! byte right after `Exif\0\0`.
//!
//! Header layout:
//!   Bytes 0-1: Byte order ("II" little-endian, "MM" big-endian)
//!   Bytes 2-3: Magic (42)
//!   Bytes 4-7: Offset of IFD0
//!
//! IFD layout:
//!   Bytes 0-1: Entry count
//!   12 bytes per entry: tag (2), type (2), count (4), value or offset (4)
//!   Bytes n..n+4: Offset of next IFD (unused here)
//!
//! The date lives in the Exif sub-IFD, reached through tag 0x8769 in IFD0.
//! Every read is bounds-checked against the payload; a directory that runs
//! off the end of the window is read as far as it goes.

use super::ExtractError;

const TIFF_MAGIC: u16 = 0x002A;
const IFD_ENTRY_LEN: usize = 12;
const INLINE_VALUE_LEN: usize = 4;

pub const TAG_EXIF_IFD: u16 = 0x8769;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

const TYPE_ASCII: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    fn from_mark(mark: [u8; 2]) -> Option<Self> {
        match &mark {
            b"II" => Some(Self::LittleEndian),
            b"MM" => Some(Self::BigEndian),
            _ => None,
        }
    }

    pub fn mark(self) -> [u8; 2] {
        match self {
            Self::LittleEndian => *b"II",
            Self::BigEndian => *b"MM",
        }
    }

    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    pub byte_order: ByteOrder,
    pub ifd0_offset: u32,
}

/// One 12-byte directory entry, decoded with the payload's byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    /// The value itself when it fits in four bytes, otherwise its offset.
    pub value: [u8; 4],
}

impl IfdEntry {
    /// Encoded size of the value. `None` for unknown field types.
    pub fn byte_len(&self) -> Option<usize> {
        type_size(self.field_type)?.checked_mul(self.count as usize)
    }
}

/// Size in bytes of one value of a TIFF field type.
fn type_size(field_type: u16) -> Option<usize> {
    match field_type {
        1 | 2 | 6 | 7 => Some(1),   // BYTE, ASCII, SBYTE, UNDEFINED
        3 | 8 => Some(2),           // SHORT, SSHORT
        4 | 9 | 11 | 13 => Some(4), // LONG, SLONG, FLOAT, IFD
        5 | 10 | 12 => Some(8),     // RATIONAL, SRATIONAL, DOUBLE
        _ => None,
    }
}

/// A parsed TIFF header over a borrowed payload.
#[derive(Debug, Clone, Copy)]
pub struct Tiff<'a> {
    data: &'a [u8],
    header: TiffHeader,
}

impl<'a> Tiff<'a> {
    /// Validate the byte-order mark and magic number.
    pub fn parse(data: &'a [u8]) -> Result<Self, ExtractError> {
        let byte_order = ByteOrder::from_mark(read_array(data, 0)?)
            .ok_or(ExtractError::EncodingMismatch("byte-order mark is not II or MM"))?;
        if byte_order.u16(read_array(data, 2)?) != TIFF_MAGIC {
            return Err(ExtractError::EncodingMismatch("TIFF magic is not 42"));
        }
        let ifd0_offset = byte_order.u32(read_array(data, 4)?);
        Ok(Self {
            data,
            header: TiffHeader {
                byte_order,
                ifd0_offset,
            },
        })
    }

    pub fn header(&self) -> TiffHeader {
        self.header
    }

    /// Read the directory at `offset`.
    ///
    /// Fails only if the entry count itself is out of bounds. Entries that run
    /// past the payload end the directory early.
    pub fn read_ifd(&self, offset: usize) -> Result<Vec<IfdEntry>, ExtractError> {
        let order = self.header.byte_order;
        let count = order.u16(read_array(self.data, offset)?) as usize;
        let first = offset.saturating_add(2);

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let at = first.saturating_add(index * IFD_ENTRY_LEN);
            let Ok(raw) = read_array::<IFD_ENTRY_LEN>(self.data, at) else {
                log::trace!("IFD at {offset} cut off after {index} of {count} entries");
                break;
            };
            entries.push(IfdEntry {
                tag: order.u16([raw[0], raw[1]]),
                field_type: order.u16([raw[2], raw[3]]),
                count: order.u32([raw[4], raw[5], raw[6], raw[7]]),
                value: [raw[8], raw[9], raw[10], raw[11]],
            });
        }
        Ok(entries)
    }

    /// Interpret an entry's value field as an offset into the payload.
    pub fn value_offset(&self, entry: &IfdEntry) -> usize {
        self.header.byte_order.u32(entry.value) as usize
    }

    /// Resolve an entry to its value bytes, inline or out-of-line.
    pub fn resolve<'e>(&self, entry: &'e IfdEntry) -> Result<&'e [u8], ExtractError>
    where
        'a: 'e,
    {
        let len = entry
            .byte_len()
            .ok_or(ExtractError::EncodingMismatch("unknown TIFF field type"))?;
        if len <= INLINE_VALUE_LEN {
            return Ok(&entry.value[..len]);
        }
        read_slice(self.data, self.value_offset(entry), len)
    }
}

/// Find the first entry with `tag`.
pub fn find_tag(entries: &[IfdEntry], tag: u16) -> Option<&IfdEntry> {
    entries.iter().find(|entry| entry.tag == tag)
}

/// Decode `DateTimeOriginal` from a TIFF payload, or `None` if it cannot be
/// recovered from this window.
pub fn decode_date_time_original(tiff: &[u8]) -> Option<String> {
    match read_date_time_original(tiff) {
        Ok(date) => Some(date),
        Err(err) => {
            log::debug!("DateTimeOriginal unavailable: {err}");
            None
        }
    }
}

/// Like [`decode_date_time_original`], reporting why the date is missing.
pub fn read_date_time_original(data: &[u8]) -> Result<String, ExtractError> {
    let tiff = Tiff::parse(data)?;

    let ifd0 = tiff.read_ifd(tiff.header().ifd0_offset as usize)?;
    let pointer = find_tag(&ifd0, TAG_EXIF_IFD).ok_or(ExtractError::Absent("Exif IFD pointer"))?;

    let exif = tiff.read_ifd(tiff.value_offset(pointer))?;
    let entry = find_tag(&exif, TAG_DATE_TIME_ORIGINAL)
        .ok_or(ExtractError::Absent("DateTimeOriginal tag"))?;
    if entry.field_type != TYPE_ASCII {
        return Err(ExtractError::EncodingMismatch("DateTimeOriginal is not ASCII-typed"));
    }
    if entry.count == 0 {
        return Err(ExtractError::Absent("DateTimeOriginal value"));
    }

    decode_ascii(tiff.resolve(entry)?)
}

/// Strict ASCII, cut at the first NUL, trimmed. Empty counts as absent.
fn decode_ascii(raw: &[u8]) -> Result<String, ExtractError> {
    if !raw.is_ascii() {
        return Err(ExtractError::EncodingMismatch("DateTimeOriginal is not ASCII"));
    }
    let text: String = raw
        .split(|&b| b == 0)
        .next()
        .unwrap_or_default()
        .iter()
        .map(|&b| char::from(b))
        .collect();
    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::Absent("DateTimeOriginal value"));
    }
    Ok(text.to_string())
}

fn read_slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ExtractError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ExtractError::OutOfBounds {
            offset,
            len,
            available: data.len(),
        })
}

fn read_array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], ExtractError> {
    let mut out = [0u8; N];
    out.copy_from_slice(read_slice(data, offset, N)?);
    Ok(out)
}
