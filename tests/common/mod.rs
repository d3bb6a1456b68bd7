#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use cover_extractor::id3::encode_synchsafe;
use cover_extractor::{ByteRange, CoverError, Result, Transport, TransportResponse};
use futures_util::{stream, StreamExt};
use url::Url;

pub const PAGE_URL: &str = "https://music.example.com/player/";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory remote that records every request it sees.
pub struct MemoryTransport {
    files: HashMap<String, Vec<u8>>,
    honor_ranges: bool,
    failing: AtomicBool,
    delay: Option<Duration>,
    chunk_size: usize,
    requests: AtomicUsize,
    log: Mutex<Vec<(String, Option<ByteRange>)>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            honor_ranges: true,
            failing: AtomicBool::new(false),
            delay: None,
            chunk_size: 1024,
            requests: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), bytes);
        self
    }

    pub fn ignoring_ranges(mut self) -> Self {
        self.honor_ranges = false;
        self
    }

    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn ranges(&self) -> Vec<Option<ByteRange>> {
        self.log.lock().unwrap().iter().map(|(_, range)| *range).collect()
    }

    fn body(&self, bytes: Vec<u8>) -> cover_extractor::fetch::BodyStream {
        let chunks: Vec<Result<Vec<u8>>> = bytes
            .chunks(self.chunk_size)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();
        stream::iter(chunks).boxed()
    }
}

#[async_trait::async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &Url, range: Option<ByteRange>) -> Result<TransportResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push((url.to_string(), range));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(CoverError::NetworkFailure("connection refused".to_string()));
        }

        let Some(data) = self.files.get(url.as_str()) else {
            return Ok(TransportResponse {
                status: 404,
                content_length: Some(0),
                body: self.body(Vec::new()),
            });
        };

        match range {
            Some(range) if self.honor_ranges => {
                let start = (range.start as usize).min(data.len());
                let end = (range.end_inclusive as usize + 1).min(data.len());
                let slice = data[start..end].to_vec();
                Ok(TransportResponse {
                    status: 206,
                    content_length: Some(slice.len() as u64),
                    body: self.body(slice),
                })
            }
            _ => Ok(TransportResponse {
                status: 200,
                content_length: Some(data.len() as u64),
                body: self.body(data.clone()),
            }),
        }
    }

    fn get_name(&self) -> &str {
        "memory"
    }
}

pub fn apic_payload(mime: &str, image: &[u8]) -> Vec<u8> {
    let mut payload = vec![0];
    payload.extend_from_slice(mime.as_bytes());
    payload.push(0);
    payload.push(3);
    payload.push(0);
    payload.extend_from_slice(image);
    payload
}

pub fn pic_payload(format: &[u8; 3], image: &[u8]) -> Vec<u8> {
    let mut payload = vec![0];
    payload.extend_from_slice(format);
    payload.push(3);
    payload.push(0);
    payload.extend_from_slice(image);
    payload
}

pub fn frame_v2(id: &[u8; 3], payload: &[u8]) -> Vec<u8> {
    let mut frame = id.to_vec();
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
    frame.extend_from_slice(payload);
    frame
}

pub fn frame_v3(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut frame = id.to_vec();
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(payload);
    frame
}

pub fn frame_v4(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut frame = id.to_vec();
    frame.extend_from_slice(&encode_synchsafe(payload.len() as u32).unwrap());
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(payload);
    frame
}

/// A complete tag: header, `body`, then `padding` zero bytes.
pub fn tag(major: u8, flags: u8, body: &[u8], padding: usize) -> Vec<u8> {
    let mut tag = b"ID3".to_vec();
    tag.extend_from_slice(&[major, 0, flags]);
    tag.extend_from_slice(&encode_synchsafe((body.len() + padding) as u32).unwrap());
    tag.extend_from_slice(body);
    tag.extend(std::iter::repeat(0).take(padding));
    tag
}

/// `tag` followed by a run of fake MPEG audio frames.
pub fn audio_file(tag: Vec<u8>) -> Vec<u8> {
    let mut file = tag;
    for _ in 0..64 {
        file.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        file.extend(std::iter::repeat(0x55).take(413));
    }
    file
}

pub fn image_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}
