use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Not an ID3v2 tag")]
    NotId3,

    #[error("Unsupported ID3v2 major version: {0}")]
    UnsupportedVersion(u8),

    #[error("ID3v2 tag too large: {0} bytes")]
    OversizedTag(u64),

    #[error("ID3v2 tag declares no content")]
    EmptyTag,

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Cross-origin source {source_origin} (page origin {page_origin})")]
    CrossOrigin {
        source_origin: String,
        page_origin: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoverError {
    /// Transport failures are transient; everything else is a verdict about the resource.
    pub fn is_network(&self) -> bool {
        matches!(self, CoverError::Http(_) | CoverError::NetworkFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, CoverError>;
