use std::time::Duration;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT_ENCODING, RANGE};
use reqwest::{Client, ClientBuilder, Proxy};
use url::Url;
use crate::config::ExtractorConfig;
use crate::errors::{CoverError, Result};
use super::{ByteRange, Transport, TransportResponse};

/// Pooled HTTP client used for range reads
pub struct HttpPool {
    client: Client,
    max_connections: usize,
    timeout: Duration,
}

impl HttpPool {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let mut builder = Self::builder(config, timeout);

        if let Some(proxy_url) = &config.proxy {
            log::info!("🌐 [HTTP] Using proxy: {}", proxy_url);
            builder = builder.proxy(Proxy::all(proxy_url)?);
        } else if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            max_connections: config.max_idle_connections,
            timeout,
        })
    }

    fn builder(config: &ExtractorConfig, timeout: Duration) -> ClientBuilder {
        ClientBuilder::new()
            .pool_max_idle_per_host(config.max_idle_connections)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait::async_trait]
impl Transport for HttpPool {
    async fn get(&self, url: &Url, range: Option<ByteRange>) -> Result<TransportResponse> {
        // Offsets refer to the stored file, so no content coding.
        let mut request = self.client
            .get(url.as_str())
            .header(ACCEPT_ENCODING, "identity");

        if let Some(range) = range {
            request = request.header(RANGE, range.header_value());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_length = response.content_length();
        log::debug!(
            "🌐 [HTTP] GET {} range={:?} -> {} (length {:?})",
            url, range, status, content_length
        );

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(CoverError::from))
            .boxed();

        Ok(TransportResponse {
            status,
            content_length,
            body,
        })
    }

    fn get_name(&self) -> &str {
        "http"
    }
}
