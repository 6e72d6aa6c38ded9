//! Persisted cache entry.

use serde::{Deserialize, Serialize};

/// A rendered head block with its version and expiry envelope.
///
/// Persisted as `{version, time_created, expires, data}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Crate version that rendered `data`.
    pub version: String,
    /// Unix seconds.
    pub time_created: u64,
    /// Seconds from creation.
    pub expires: u64,
    pub data: String,
}

impl CacheEntry {
    pub fn new(data: impl Into<String>, version: impl Into<String>, now: u64, ttl: u64) -> Self {
        Self {
            version: version.into(),
            time_created: now,
            expires: ttl,
            data: data.into(),
        }
    }

    /// Whether the entry can be served at `now`.
    ///
    /// Requires a payload, the exact `version`, an unexpired TTL and a
    /// creation time strictly after the last content change.
    pub fn is_valid(&self, version: &str, now: u64, time_modified: u64) -> bool {
        !self.data.is_empty()
            && self.version == version
            && self.time_created.saturating_add(self.expires) > now
            && self.time_created > time_modified
    }
}
