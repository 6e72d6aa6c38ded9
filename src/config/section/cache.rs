//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! enable = true               # Store rendered head blocks
//! ttl = 3600                  # Seconds an entry stays valid
//! dir = ".shareable/cache"    # File store location (relative to the config)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

pub const DEFAULT_TTL: u64 = 3600;
pub const DEFAULT_DIR: &str = ".shareable/cache";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enable: bool,
    pub ttl: u64,
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ttl: DEFAULT_TTL,
            dir: PathBuf::from(DEFAULT_DIR),
        }
    }
}

impl CacheConfig {
    pub const TTL: FieldPath = FieldPath::new("cache.ttl");
    pub const DIR: FieldPath = FieldPath::new("cache.dir");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.ttl == 0 {
            diag.error_with_hint(
                Self::TTL,
                "must be greater than 0",
                "set `enable = false` to turn caching off",
            );
        }
        if self.enable && self.dir.as_os_str().is_empty() {
            diag.error(Self::DIR, "must not be empty while caching is enabled");
        }
    }
}
