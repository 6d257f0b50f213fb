//! Caching component
//!
//! This module provides an on-disk cache for raw API responses. Entries are
//! keyed by the request path and expire after a TTL.

use crate::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

/// Response Cache
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

/// Calculate Blake2b-256 hash of data
fn blake2b_256(data: &[u8]) -> String {
    use blake2::digest::consts::U32;
    use blake2::{Blake2b, Digest};

    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

impl ResponseCache {
    /// Create a new cache instance
    pub fn new(ttl: Duration, cache_dir: Option<PathBuf>) -> Self {
        let cache_dir = cache_dir.unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("neo-transfer-viz")
        });

        Self { cache_dir, ttl }
    }

    /// File-system safe key for a request path
    pub fn cache_key_for(request_path: &str) -> String {
        blake2b_256(request_path.as_bytes())
    }

    /// Get cache file path
    fn get_cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Check if cache is valid
    async fn is_cache_valid(&self, path: &Path) -> bool {
        match fs::metadata(path).await {
            Ok(metadata) => match metadata.modified() {
                Ok(modified) => SystemTime::now()
                    .duration_since(modified)
                    .map(|elapsed| elapsed < self.ttl)
                    .unwrap_or(false),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    /// Ensure cache directory exists
    async fn ensure_cache_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;
        Ok(())
    }

    /// Get a cached response body
    pub async fn get_text(&self, request_path: &str) -> Option<String> {
        let path = self.get_cache_path(&Self::cache_key_for(request_path));
        if self.is_cache_valid(&path).await {
            match fs::read_to_string(&path).await {
                Ok(content) => {
                    tracing::debug!("Cache hit for {}", request_path);
                    return Some(content);
                }
                Err(e) => tracing::warn!("Failed to read cached response: {}", e),
            }
        }
        None
    }

    /// Save a response body
    pub async fn save_text(&self, request_path: &str, content: &str) {
        if let Err(e) = self.ensure_cache_dir().await {
            tracing::warn!("Failed to create cache directory: {}", e);
            return;
        }

        let path = self.get_cache_path(&Self::cache_key_for(request_path));
        if let Err(e) = fs::write(&path, content).await {
            tracing::warn!("Failed to write response to cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "neo-transfer-viz-test-{}-{}",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let key = ResponseCache::cache_key_for("/v1/block/420");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, ResponseCache::cache_key_for("/v1/block/420"));
        assert_ne!(key, ResponseCache::cache_key_for("/v1/block/421"));
    }

    #[tokio::test]
    async fn test_save_and_get_text() {
        let dir = temp_cache_dir("roundtrip");
        let cache = ResponseCache::new(Duration::from_secs(60), Some(dir.clone()));

        assert!(cache.get_text("/v1/block/1").await.is_none());
        cache.save_text("/v1/block/1", r#"{"index":1}"#).await;
        assert_eq!(
            cache.get_text("/v1/block/1").await.as_deref(),
            Some(r#"{"index":1}"#)
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_expired_entry_is_ignored() {
        let dir = temp_cache_dir("expired");
        let cache = ResponseCache::new(Duration::ZERO, Some(dir.clone()));

        cache.save_text("/v1/block/2", "{}").await;
        assert!(cache.get_text("/v1/block/2").await.is_none());

        let _ = std::fs::remove_dir_all(dir);
    }
}
