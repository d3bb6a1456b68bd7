use std::sync::Arc;
use url::{Origin, Url};
use crate::cache::{CacheStats, CoverCache, CoverHandle, ObjectUrlRegistry};
use crate::config::ExtractorConfig;
use crate::errors::{CoverError, Result};
use crate::fetch::{fetch_bytes, HttpPool, Transport};
use crate::id3::{self, ImageAsset, TagHeader, HEADER_LEN};

/// Finds the embedded cover of remote audio files, reading only the ID3v2 tag.
///
/// Owns the result cache and the object URLs it hands out; both live as long
/// as the extractor. Create one at startup and share it.
pub struct CoverExtractor {
    config: ExtractorConfig,
    page_base: Url,
    page_origin: Origin,
    transport: Arc<dyn Transport>,
    cache: CoverCache,
    objects: ObjectUrlRegistry,
}

impl CoverExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let transport = Arc::new(HttpPool::new(&config)?);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ExtractorConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let page_base = config.page_base()?;
        let page_origin = page_base.origin();
        let objects = ObjectUrlRegistry::new(page_origin.ascii_serialization());

        log::info!(
            "🖼️ [COVER] Extractor ready for {} over {}",
            page_origin.ascii_serialization(),
            transport.get_name()
        );

        Ok(Self {
            config,
            page_base,
            page_origin,
            transport,
            cache: CoverCache::new(),
            objects,
        })
    }

    /// Cover for `audio_src`, or `None` whenever one can't be produced.
    /// Failures are logged, never returned; callers fall back to a default image.
    pub async fn get_cover_object_url(&self, audio_src: &str) -> Option<CoverHandle> {
        match self.try_get_cover(audio_src).await {
            Ok(handle) => handle,
            Err(error) => {
                log::warn!("⚠️ [COVER] No cover for {}: {}", audio_src, error);
                None
            }
        }
    }

    /// Like [`get_cover_object_url`](Self::get_cover_object_url), but reports
    /// why nothing could be attempted: an unresolvable or cross-origin source,
    /// or a transport failure. A source that was read and found to carry no
    /// usable cover is `Ok(None)`.
    pub async fn try_get_cover(&self, audio_src: &str) -> Result<Option<CoverHandle>> {
        let url = self.page_base.join(audio_src)?;

        let origin = url.origin();
        if origin != self.page_origin {
            return Err(CoverError::CrossOrigin {
                source_origin: origin.ascii_serialization(),
                page_origin: self.page_origin.ascii_serialization(),
            });
        }

        let key = url.as_str().to_string();
        if let Some(cached) = self.cache.get(&key).await {
            log::debug!("🖼️ [COVER] Cache hit for {}", key);
            return Ok(cached);
        }

        self.cache.get_or_extract(key, self.extract(&url)).await
    }

    /// Asset behind an object URL this extractor issued, while it is live.
    pub async fn resolve(&self, object_url: &str) -> Option<Arc<ImageAsset>> {
        self.objects.resolve(object_url).await
    }

    /// Retires an object URL. The cache keeps its entry, so later calls for the
    /// same source still return the original handle.
    pub async fn revoke(&self, object_url: &str) -> bool {
        self.objects.revoke(object_url).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    async fn extract(&self, url: &Url) -> Result<Option<CoverHandle>> {
        match self.read_cover(url).await {
            Ok(Some(asset)) => {
                let handle = self.objects.create(asset).await;
                log::info!(
                    "✅ [COVER] {} -> {} ({}, {} bytes)",
                    url, handle.object_url(), handle.mime(), handle.bytes().len()
                );
                Ok(Some(handle))
            }
            Ok(None) => {
                log::info!("🖼️ [COVER] {} has no embedded picture", url);
                Ok(None)
            }
            Err(error) if error.is_network() => Err(error),
            Err(error) => {
                log::info!("🖼️ [COVER] {} has no usable cover: {}", url, error);
                Ok(None)
            }
        }
    }

    async fn read_cover(&self, url: &Url) -> Result<Option<ImageAsset>> {
        let transport = self.transport.as_ref();

        let head = fetch_bytes(transport, url, 0, HEADER_LEN).await?;
        let header = TagHeader::parse(&head, self.config.max_tag_size)?;

        let total_size = usize::try_from(header.total_size())
            .map_err(|_| CoverError::OversizedTag(header.total_size()))?;
        let tag = fetch_bytes(transport, url, 0, total_size).await?;

        id3::parse_cover(&tag, self.config.max_tag_size)
    }
}
