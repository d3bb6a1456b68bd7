//! Cover art extraction for remote audio files.
//!
//! Reads just the leading ID3v2 tag of a same-origin audio URL through HTTP
//! byte-range requests, decodes the first `APIC`/`PIC` frame, and hands back a
//! cached object URL for the picture.
//!
//! ```no_run
//! use cover_extractor::{CoverExtractor, ExtractorConfig};
//!
//! # async fn run() -> cover_extractor::Result<()> {
//! let config = ExtractorConfig::default().with_page_url("https://music.example.com/");
//! let extractor = CoverExtractor::new(config)?;
//!
//! match extractor.get_cover_object_url("audio/track-01.mp3").await {
//!     Some(cover) => println!("{} ({})", cover.object_url(), cover.mime()),
//!     None => println!("using default cover"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetch;
pub mod id3;

pub use cache::{CacheStats, CoverCache, CoverHandle, ObjectUrlRegistry};
pub use config::ExtractorConfig;
pub use errors::{CoverError, Result};
pub use extractor::CoverExtractor;
pub use fetch::{fetch_bytes, ByteRange, HttpPool, Transport, TransportResponse};
pub use id3::{parse_cover, ImageAsset, TagHeader};
