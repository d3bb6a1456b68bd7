use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::{Origin, Url};
use crate::errors::{CoverError, Result};

/// Ceiling on `10 + declared tag size`, bounding both memory and transfer.
pub const DEFAULT_MAX_TAG_SIZE: u64 = 2_500_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// URL of the hosting page. Relative sources resolve against it and
    /// only sources sharing its origin are range-read.
    pub page_url: String,
    pub max_tag_size: u64,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub max_idle_connections: usize,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Honour `HTTP_PROXY`-style environment variables when no `proxy` is set.
    pub use_system_proxy: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            page_url: "http://localhost/".to_string(),
            max_tag_size: DEFAULT_MAX_TAG_SIZE,
            timeout_seconds: 30,
            connect_timeout_seconds: 15,
            max_idle_connections: 4,
            user_agent: format!("CoverExtractor/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            use_system_proxy: true,
        }
    }
}

impl ExtractorConfig {
    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = page_url.into();
        self
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = ExtractorConfig::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Reads a JSON config file, then applies `COVER_EXTRACTOR_*` environment overrides.
    /// A missing file just yields the defaults plus overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("COVER_EXTRACTOR").try_parsing(true))
            .build()?;

        let config: ExtractorConfig = settings.try_deserialize()?;
        config.page_origin()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
                std::fs::create_dir_all(config_dir)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CoverError::Config(config::ConfigError::Message("Could not find config directory".to_string())))?;

        Ok(config_dir.join("cover-extractor").join("config.json"))
    }

    pub fn page_base(&self) -> Result<Url> {
        Ok(Url::parse(&self.page_url)?)
    }

    pub fn page_origin(&self) -> Result<Origin> {
        Ok(self.page_base()?.origin())
    }
}
