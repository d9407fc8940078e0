//! On-disk cache of successful forecast responses.
//!
//! The cache only saves round-trips. Any failure to read, parse or write an
//! entry is logged and treated as a miss.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether responses are cached at all (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Entry lifetime in seconds (default: 3600)
    #[serde(default = "default_expire_after")]
    pub expire_after_secs: u64,

    /// Cache directory; the platform cache directory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

const fn default_enabled() -> bool {
    true
}

const fn default_expire_after() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: default_enabled(), expire_after_secs: default_expire_after(), dir: None }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    url: String,
    body: String,
}

/// Directory-backed response cache with a fixed time-to-live.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    expire_after: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, expire_after: Duration) -> Self {
        Self { dir: dir.into(), expire_after }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic key for a request. Parameter order does not matter.
    pub fn key(url: &str, params: &[(String, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort();

        let mut hasher = blake3::Hasher::new();
        hasher.update(url.as_bytes());
        for (name, value) in sorted {
            hasher.update(b"|");
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Cached body for `key`, if present and younger than the TTL at `now`.
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let path = self.entry_path(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read cache entry");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt cache entry");
                return None;
            }
        };

        if now - entry.fetched_at >= self.expire_after {
            debug!(url = %entry.url, "Cache entry expired");
            return None;
        }

        debug!(url = %entry.url, "Cache hit");
        Some(entry.body)
    }

    /// Store `body` under `key`. Failures are logged, never returned.
    pub async fn put(&self, key: &str, url: &str, body: &str, now: DateTime<Utc>) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(dir = %self.dir.display(), error = %e, "Failed to create cache directory");
            return;
        }

        let entry = CacheEntry { fetched_at: now, url: url.to_string(), body: body.to_string() };
        let serialized = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cache entry");
                return;
            }
        };

        let path = self.entry_path(key);
        if let Err(e) = tokio::fs::write(&path, serialized).await {
            warn!(path = %path.display(), error = %e, "Failed to write cache entry");
        }
    }
}
