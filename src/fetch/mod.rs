pub mod http_pool;
pub mod range;

pub use http_pool::HttpPool;
pub use range::fetch_bytes;

use futures_util::stream::BoxStream;
use url::Url;
use crate::errors::Result;

/// Response body as a stream of chunks. Dropping it cancels the transfer.
pub type BodyStream = BoxStream<'static, Result<Vec<u8>>>;

/// Inclusive byte range, as sent in a `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end_inclusive: u64,
}

impl ByteRange {
    /// Range covering `count` bytes from `start`. `count` must be non-zero.
    pub fn new(start: u64, count: usize) -> Self {
        Self {
            start,
            end_inclusive: start + count.max(1) as u64 - 1,
        }
    }

    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end_inclusive)
    }
}

pub struct TransportResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: BodyStream,
}

impl TransportResponse {
    pub fn is_partial(&self) -> bool {
        self.status == 206
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Source of remote bytes. `range` of `None` requests the whole resource.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, range: Option<ByteRange>) -> Result<TransportResponse>;
    fn get_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_header_uses_inclusive_end() {
        let range = ByteRange::new(0, 10);
        assert_eq!(range.header_value(), "bytes=0-9");
        assert_eq!(range.end_inclusive, 9);

        let range = ByteRange::new(100, 1);
        assert_eq!(range.header_value(), "bytes=100-100");
    }
}
