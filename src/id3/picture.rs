//! Decoders for the picture frames: `APIC` (ID3v2.3/2.4) and `PIC` (ID3v2.2).
//!
//! Both layouts are `[encoding][format][picture type][description][image data]`.
//! Every offset step below is clamped to the payload length.

use crate::errors::{CoverError, Result};
use super::ImageAsset;

const MIN_PAYLOAD_LEN: usize = 10;
const DEFAULT_MIME: &str = "image/jpeg";
/// MIME value marking a picture that is a URL rather than embedded data
const LINKED_PICTURE: &str = "-->";

pub fn decode_apic(payload: &[u8]) -> Result<ImageAsset> {
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(CoverError::MalformedFrame(format!(
            "APIC payload of {} bytes is too short",
            payload.len()
        )));
    }

    let encoding = payload[0];

    // The MIME type is always Latin-1, whatever the text encoding byte says.
    let mime_end = payload[1..]
        .iter()
        .position(|byte| *byte == 0)
        .map_or(payload.len(), |pos| pos + 1);
    let mime = latin1(&payload[1..mime_end]);
    let mime = match mime.trim() {
        "" => DEFAULT_MIME.to_string(),
        LINKED_PICTURE => {
            return Err(CoverError::MalformedFrame("picture is a link, not embedded data".to_string()));
        }
        trimmed => trimmed.to_string(),
    };

    let offset = (mime_end + 1).min(payload.len());
    // picture type
    let offset = (offset + 1).min(payload.len());
    let offset = skip_terminated(payload, offset, encoding);

    image_asset(mime, payload, offset)
}

pub fn decode_pic(payload: &[u8]) -> Result<ImageAsset> {
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(CoverError::MalformedFrame(format!(
            "PIC payload of {} bytes is too short",
            payload.len()
        )));
    }

    let encoding = payload[0];
    let format = latin1(&payload[1..4]).trim().to_lowercase();
    let mime = match format.as_str() {
        "png" => "image/png",
        _ => DEFAULT_MIME,
    };

    // picture type
    let offset = 5;
    let offset = skip_terminated(payload, offset, encoding);

    image_asset(mime.to_string(), payload, offset)
}

fn image_asset(mime: String, payload: &[u8], offset: usize) -> Result<ImageAsset> {
    let bytes = payload.get(offset..).unwrap_or_default();
    if bytes.is_empty() {
        return Err(CoverError::MalformedFrame("picture frame holds no image data".to_string()));
    }

    Ok(ImageAsset {
        mime,
        bytes: bytes.to_vec(),
    })
}

/// Offset just past the string terminator that follows `start`, or the end of
/// `data` when there is none. Encodings 1 and 2 are UTF-16 and end with a
/// two-byte NUL scanned in steps of two.
fn skip_terminated(data: &[u8], start: usize, encoding: u8) -> usize {
    let start = start.min(data.len());

    match encoding {
        1 | 2 => data[start..]
            .chunks_exact(2)
            .position(|pair| pair == [0, 0])
            .map_or(data.len(), |pos| start + pos * 2 + 2),
        _ => data[start..]
            .iter()
            .position(|byte| *byte == 0)
            .map_or(data.len(), |pos| start + pos + 1),
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| byte as char).collect()
}
