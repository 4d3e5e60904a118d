//! File-backed response cache keyed by request URL.
//!
//! The whole cache is one JSON object mapping the request URL to the response
//! body plus its expiry stamp. Expired entries are misses and are pruned on the
//! next write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
    expire_after: Duration,
}

impl ResponseCache {
    pub fn new(path: impl Into<PathBuf>, expire_after: Duration) -> Self {
        Self { path: path.into(), expire_after }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable cache files are treated as empty.
    fn load(&self) -> HashMap<String, CacheEntry> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Returns the stored body for `key` if it has not expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Utc::now();
        self.load()
            .remove(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.body)
    }

    /// Stores `body` under `key` and drops every expired entry.
    pub fn put(&self, key: &str, body: &str) -> io::Result<()> {
        let ttl = chrono::Duration::from_std(self.expire_after)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cache expiry of {}s is out of range", self.expire_after.as_secs()),
            )
        })?;

        let mut entries = self.load();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                body: body.to_string(),
                cached_at: now,
                expires_at,
            },
        );

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(&self.path, json)
    }
}
