pub mod frame;
pub mod header;
pub mod picture;

pub use frame::{Frame, FrameWalker};
pub use header::{decode_synchsafe, encode_synchsafe, TagHeader, HEADER_LEN};

use base64::Engine as _;
use crate::errors::Result;

/// An embedded picture copied out of its frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URL usable directly as an image source.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Finds and decodes the cover picture of the tag at the start of `buf`.
///
/// `Ok(None)` means the tag was readable but carries no picture frame (or the
/// walk stopped at a malformed frame before reaching one).
pub fn parse_cover(buf: &[u8], max_tag_size: u64) -> Result<Option<ImageAsset>> {
    let header = TagHeader::parse(buf, max_tag_size)?;
    let Some(frame) = FrameWalker::new(buf, &header)?.find_cover_frame() else {
        log::debug!("🏷️ [ID3] No {} frame found", header.cover_frame_id());
        return Ok(None);
    };

    let payload = frame.payload(buf);
    let asset = if header.major_version == 2 {
        picture::decode_pic(payload)?
    } else {
        picture::decode_apic(payload)?
    };

    log::debug!(
        "🏷️ [ID3] {} frame: {} ({} bytes)",
        frame.id, asset.mime, asset.len()
    );
    Ok(Some(asset))
}
