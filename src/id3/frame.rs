use byteorder::{BigEndian, ByteOrder};
use crate::errors::{CoverError, Result};
use super::header::{read_synchsafe_lenient, TagHeader, HEADER_LEN};

/// A frame located inside a tag buffer. Offsets are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: String,
    pub payload_start: usize,
    pub payload_end: usize,
}

impl Frame {
    /// Payload bytes within the walked buffer; empty if `buf` is too short.
    pub fn payload<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        buf.get(self.payload_start..self.payload_end).unwrap_or_default()
    }
}

/// Walks the frames of a tag held in `buf`.
///
/// The walk ends quietly at padding, at a truncated frame header, or at a frame
/// whose payload would be empty or run past the end of the tag. Each yielded
/// frame moves the cursor strictly forward.
pub struct FrameWalker<'a> {
    buf: &'a [u8],
    header: TagHeader,
    cursor: usize,
    tag_end: usize,
    finished: bool,
}

impl<'a> FrameWalker<'a> {
    pub fn new(buf: &'a [u8], header: &TagHeader) -> Result<Self> {
        let tag_end = usize::try_from(header.total_size())
            .unwrap_or(usize::MAX)
            .min(buf.len());
        let mut cursor = HEADER_LEN;

        if header.has_extended_header() {
            let size_field = buf
                .get(cursor..cursor + 4)
                .filter(|_| cursor + 4 <= tag_end)
                .ok_or_else(|| CoverError::MalformedFrame("truncated extended header".to_string()))?;

            let extended_size = if header.major_version == 4 {
                read_synchsafe_lenient(size_field).unwrap_or(0)
            } else {
                BigEndian::read_u32(size_field)
            };

            if extended_size < 6 {
                return Err(CoverError::MalformedFrame(format!(
                    "extended header size {} is below 6",
                    extended_size
                )));
            }

            cursor = cursor.saturating_add(extended_size as usize).min(tag_end);
            log::debug!("🏷️ [ID3] Skipped {} byte extended header", extended_size);
        }

        Ok(Self {
            buf,
            header: *header,
            cursor,
            tag_end,
            finished: false,
        })
    }

    /// Offset of the next frame header.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// First frame carrying the version's picture id. Later duplicates are ignored.
    pub fn find_cover_frame(mut self) -> Option<Frame> {
        let wanted = self.header.cover_frame_id();
        self.find(|frame| frame.id == wanted)
    }

    fn frame_layout(&self) -> (usize, usize, usize) {
        // (id length, size length, header length)
        if self.header.major_version == 2 {
            (3, 3, 6)
        } else {
            (4, 4, 10)
        }
    }

    fn frame_size(&self, size_field: &[u8]) -> usize {
        let size = match self.header.major_version {
            2 => BigEndian::read_u24(size_field),
            4 => read_synchsafe_lenient(size_field).unwrap_or(0),
            _ => BigEndian::read_u32(size_field),
        };
        size as usize
    }
}

impl Iterator for FrameWalker<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }

        let (id_len, size_len, header_len) = self.frame_layout();
        let Some(frame_header) = self
            .cursor
            .checked_add(header_len)
            .filter(|end| *end <= self.tag_end)
            .map(|end| &self.buf[self.cursor..end])
        else {
            self.finished = true;
            return None;
        };

        let id_bytes = &frame_header[..id_len];
        if id_bytes.iter().all(|byte| *byte == 0 || byte.is_ascii_whitespace()) {
            log::debug!("🏷️ [ID3] Reached padding at offset {}", self.cursor);
            self.finished = true;
            return None;
        }

        let size = self.frame_size(&frame_header[id_len..id_len + size_len]);
        let payload_start = self.cursor + header_len;
        let payload_end = payload_start.saturating_add(size);

        if payload_end <= payload_start || payload_end > self.tag_end {
            log::debug!(
                "🏷️ [ID3] Frame at offset {} claims {} bytes, {} available; stopping",
                self.cursor, size, self.tag_end - payload_start
            );
            self.finished = true;
            return None;
        }

        let id = id_bytes.iter().map(|&byte| byte as char).collect();
        self.cursor = payload_end;

        Some(Frame {
            id,
            payload_start,
            payload_end,
        })
    }
}
