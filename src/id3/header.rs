use byteorder::{BigEndian, ByteOrder};
use crate::errors::{CoverError, Result};

pub const HEADER_LEN: usize = 10;

const EXTENDED_HEADER_FLAG: u8 = 0x40;
const MAX_SYNCHSAFE: u32 = 0x0FFF_FFFF;

/// The fixed 10-byte header that opens every ID3v2 tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub major_version: u8,
    pub flags: u8,
    /// Size of everything after the header, as declared (28 bits)
    pub declared_size: u32,
}

impl TagHeader {
    /// Reads the header from the start of `bytes`.
    ///
    /// A tag whose total size (header included) exceeds `max_tag_size` is
    /// rejected before any frame is looked at.
    pub fn parse(bytes: &[u8], max_tag_size: u64) -> Result<Self> {
        if bytes.len() < HEADER_LEN || &bytes[..3] != b"ID3" {
            return Err(CoverError::NotId3);
        }

        let major_version = bytes[3];
        if !(2..=4).contains(&major_version) {
            return Err(CoverError::UnsupportedVersion(major_version));
        }

        let flags = bytes[5];
        let declared_size = decode_synchsafe(&bytes[6..HEADER_LEN]).ok_or_else(|| {
            CoverError::MalformedFrame("tag size is not a synchsafe integer".to_string())
        })?;

        if declared_size == 0 {
            return Err(CoverError::EmptyTag);
        }

        let header = Self {
            major_version,
            flags,
            declared_size,
        };

        if header.total_size() > max_tag_size {
            return Err(CoverError::OversizedTag(header.total_size()));
        }

        log::debug!(
            "🏷️ [ID3] v2.{} tag, flags {:#04x}, {} bytes",
            major_version, flags, header.total_size()
        );
        Ok(header)
    }

    /// Header plus declared body: the byte count worth fetching.
    pub fn total_size(&self) -> u64 {
        HEADER_LEN as u64 + u64::from(self.declared_size)
    }

    pub fn has_extended_header(&self) -> bool {
        self.flags & EXTENDED_HEADER_FLAG != 0
    }

    /// `PIC` in ID3v2.2, `APIC` afterwards.
    pub fn cover_frame_id(&self) -> &'static str {
        if self.major_version == 2 {
            "PIC"
        } else {
            "APIC"
        }
    }
}

/// Decodes a 4-byte synchsafe integer, rejecting any byte with its top bit set.
pub fn decode_synchsafe(bytes: &[u8]) -> Option<u32> {
    let bytes = bytes.get(..4)?;
    if bytes.iter().any(|byte| byte & 0x80 != 0) {
        return None;
    }

    Some(unsynch(BigEndian::read_u32(bytes)))
}

/// Decodes a 4-byte synchsafe integer, ignoring the top bit of each byte.
/// Frame and extended-header sizes in the wild are not always well-formed.
pub fn read_synchsafe_lenient(bytes: &[u8]) -> Option<u32> {
    let bytes = bytes.get(..4)?;
    Some(unsynch(BigEndian::read_u32(bytes) & 0x7F7F_7F7F))
}

/// Encodes a value of at most 28 bits as 4 synchsafe bytes.
pub fn encode_synchsafe(value: u32) -> Option<[u8; 4]> {
    if value > MAX_SYNCHSAFE {
        return None;
    }

    Some([
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ])
}

fn unsynch(raw: u32) -> u32 {
    (raw & 0xFF)
        | ((raw & 0xFF00) >> 1)
        | ((raw & 0xFF_0000) >> 2)
        | ((raw & 0xFF00_0000) >> 3)
}
