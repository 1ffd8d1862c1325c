//! Object storage for uploaded images.
//!
//! The hosted deployment keeps images in an external bucket; this module
//! defines the seam and an in-memory implementation mirroring it.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::StoreResult;

/// Result of storing an object: its public URL and stored filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    pub filename: String,
}

/// Abstract image bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object under `filename` and return its public URL.
    async fn put_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StoreResult<StoredObject>;
}

/// In-memory bucket for tests and local development.
pub struct MemoryObjectStore {
    base_url: String,
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Fetch stored bytes by filename.
    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.objects.read().get(filename).map(|(_, bytes)| bytes.clone())
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/images/{}", self.base_url.trim_end_matches('/'), filename)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StoreResult<StoredObject> {
        self.objects
            .write()
            .insert(filename.to_string(), (content_type.to_string(), bytes));
        Ok(StoredObject {
            url: self.public_url(filename),
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_image_returns_public_url() {
        let bucket = MemoryObjectStore::new("http://localhost:8080/");
        let stored = bucket
            .put_image("abc.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(stored.url, "http://localhost:8080/images/abc.png");
        assert_eq!(stored.filename, "abc.png");
        assert_eq!(bucket.get("abc.png"), Some(vec![1, 2, 3]));
        assert_eq!(bucket.len(), 1);
    }
}
