use futures_util::StreamExt;
use url::Url;
use crate::errors::{CoverError, Result};
use super::{BodyStream, ByteRange, Transport};

/// Fetches at most `count` bytes of `url` starting at `start`.
///
/// Prefers a ranged request answered with 206. A remote that ignores the range
/// but declares a body no longer than `count` is taken as-is. Anything else
/// falls back to an unranged streaming read that stops (and drops the
/// remaining transfer) once enough bytes have arrived.
///
/// Transport failures propagate unchanged; nothing is retried here.
pub async fn fetch_bytes(
    transport: &dyn Transport,
    url: &Url,
    start: u64,
    count: usize,
) -> Result<Vec<u8>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let range = ByteRange::new(start, count);
    let response = transport.get(url, Some(range)).await?;

    if response.is_partial() {
        log::debug!("🌐 [RANGE] {} served {} as partial content", url, range.header_value());
        return read_window(response.body, 0, count).await;
    }

    if response.is_success() {
        if let Some(length) = response.content_length {
            if length <= count as u64 {
                log::debug!(
                    "🌐 [RANGE] {} ignored range but whole body ({} bytes) fits",
                    url, length
                );
                return read_window(response.body, start, count).await;
            }
        }
    }

    log::debug!(
        "🌐 [RANGE] {} answered {} to {}, falling back to streaming read",
        url, response.status, range.header_value()
    );
    drop(response);

    let response = transport.get(url, None).await?;
    if !response.is_success() {
        return Err(CoverError::NetworkFailure(format!(
            "HTTP error: {} for {}",
            response.status, url
        )));
    }

    read_window(response.body, start, count).await
}

/// Skips `skip` leading bytes, then collects up to `count` bytes.
/// The stream is dropped as soon as the window is full, cancelling the rest.
async fn read_window(mut body: BodyStream, skip: u64, count: usize) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(count.min(64 * 1024));
    let mut to_skip = skip;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let mut chunk = chunk.as_slice();

        if to_skip > 0 {
            let skipped = to_skip.min(chunk.len() as u64) as usize;
            to_skip -= skipped as u64;
            chunk = &chunk[skipped..];
        }

        let wanted = count - data.len();
        data.extend_from_slice(&chunk[..chunk.len().min(wanted)]);

        if data.len() >= count {
            log::debug!("🌐 [RANGE] Collected {} bytes, cancelling remaining transfer", count);
            break;
        }
    }

    Ok(data)
}
