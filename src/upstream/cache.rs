//! Disk cache for upstream JSON responses.
//!
//! Responses are stored under the data directory keyed by the SHA-256 of the
//! request URL, with a sidecar metadata file carrying the fetch time. Lets
//! the hub ride out short upstream outages and keeps polling polite.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

/// Metadata stored alongside a cached response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_length: usize,
}

/// TTL-bounded response cache on disk.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    fn key_for(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn body_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key_for(url)))
    }

    fn meta_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.meta.json", Self::key_for(url)))
    }

    /// Read a cached body if present and within TTL.
    pub async fn get(&self, url: &str) -> Option<String> {
        let meta = self.read_meta(&self.meta_path(url)).await?;

        let age = Utc::now().signed_duration_since(meta.fetched_at);
        if age.num_seconds() > self.ttl.as_secs() as i64 {
            debug!(url, "cache expired");
            return None;
        }

        let body = fs::read_to_string(self.body_path(url)).await.ok()?;
        debug!(url, "serving from cache");
        Some(body)
    }

    /// Read a cached body regardless of TTL. Used as a fallback when the
    /// upstream is unreachable.
    pub async fn get_stale(&self, url: &str) -> Option<String> {
        self.read_meta(&self.meta_path(url)).await?;
        fs::read_to_string(self.body_path(url)).await.ok()
    }

    /// Store a response body. Cache write failures are non-fatal.
    pub async fn put(&self, url: &str, body: &str) {
        if let Err(e) = self.try_put(url, body).await {
            debug!(url, error = %e, "cache write failed");
        }
    }

    async fn try_put(&self, url: &str, body: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.body_path(url), body).await?;

        let meta = CacheMetadata {
            url: url.to_string(),
            fetched_at: Utc::now(),
            content_length: body.len(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.meta_path(url), meta_json).await?;
        Ok(())
    }

    async fn read_meta(&self, path: &Path) -> Option<CacheMetadata> {
        let content = fs::read_to_string(path).await.ok()?;
        serde_json::from_str(&content).ok()
    }
}
