use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::id3::ImageAsset;

/// A live object URL together with the picture it names
#[derive(Debug, Clone)]
pub struct CoverHandle {
    object_url: Arc<str>,
    asset: Arc<ImageAsset>,
}

impl CoverHandle {
    pub fn object_url(&self) -> &str {
        &self.object_url
    }

    pub fn mime(&self) -> &str {
        &self.asset.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.asset.bytes
    }

    pub fn asset(&self) -> Arc<ImageAsset> {
        self.asset.clone()
    }

    /// True when both handles came from the same extraction.
    pub fn same_as(&self, other: &CoverHandle) -> bool {
        Arc::ptr_eq(&self.object_url, &other.object_url)
    }
}

impl PartialEq for CoverHandle {
    fn eq(&self, other: &Self) -> bool {
        self.object_url == other.object_url
    }
}

impl Eq for CoverHandle {}

/// Issues `blob:` URLs for extracted pictures and keeps them resolvable
/// until revoked.
pub struct ObjectUrlRegistry {
    origin: String,
    objects: RwLock<HashMap<String, Arc<ImageAsset>>>,
}

impl ObjectUrlRegistry {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, asset: ImageAsset) -> CoverHandle {
        let object_url = format!("blob:{}/{}", self.origin, uuid::Uuid::new_v4());
        let asset = Arc::new(asset);

        let mut objects = self.objects.write().await;
        objects.insert(object_url.clone(), asset.clone());

        CoverHandle {
            object_url: object_url.into(),
            asset,
        }
    }

    pub async fn resolve(&self, object_url: &str) -> Option<Arc<ImageAsset>> {
        let objects = self.objects.read().await;
        objects.get(object_url).cloned()
    }

    /// Returns whether the URL was live.
    pub async fn revoke(&self, object_url: &str) -> bool {
        let mut objects = self.objects.write().await;
        objects.remove(object_url).is_some()
    }

    pub async fn size(&self) -> usize {
        let objects = self.objects.read().await;
        objects.len()
    }
}
