//! Cache read/write policy.
//!
//! ```text
//! request ──► enabled? ──no──► MISS (no STORE)
//!                │yes
//!                ▼
//!           partition? ──none──► MISS (no STORE)
//!                │
//!                ▼
//!         entry valid? ──yes──► HIT
//!                │no
//!                ▼
//!          MISS ──► compute ──► STORE
//! ```

use std::path::Path;

use super::entry::CacheEntry;
use super::modified::{ChangeEvent, ModificationClock};
use super::store::{CacheError, CacheStore, FileStore, MemoryStore};
use crate::config::ShareableConfig;
use crate::seo::context::Context;
use crate::seo::engine::Scope;
use crate::seo::hooks::FlagPoint;
use crate::site::{PostId, TermId, UserId};

/// Key cached output is stored under inside each partition.
pub const CACHE_KEY: &str = "_shareable_meta_cache";

/// Storage slot a context's output is cached in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Post(PostId),
    User(UserId),
    Term(TermId),
    /// Shared slot for the front page.
    Home,
}

impl Partition {
    /// Directory-safe name.
    pub fn slug(&self) -> String {
        match self {
            Self::Post(id) => format!("post-{id}"),
            Self::User(id) => format!("user-{id}"),
            Self::Term(id) => format!("term-{id}"),
            Self::Home => "home".to_string(),
        }
    }
}

/// Partition for a context; search and archive pages are never cached.
pub fn partition(context: &Context) -> Option<Partition> {
    match context {
        Context::Article { post_id } | Context::Attachment { post_id, .. } => {
            Some(Partition::Post(*post_id))
        }
        Context::Author { user_id } => Some(Partition::User(*user_id)),
        Context::Term { term_id, .. } => Some(Partition::Term(*term_id)),
        Context::FrontPage => Some(Partition::Home),
        Context::Search { .. } | Context::Archive { .. } => None,
    }
}

/// Whether caching applies to this request.
///
/// Off in debug mode, when disabled in config, and for crawlers that need
/// live data. The result passes through the cache interceptors.
pub fn enabled(scope: &Scope<'_>) -> bool {
    let default = !scope.config.debug
        && scope.config.cache.enable
        && !scope.audience.requires_live_data();
    scope
        .hooks
        .apply_flag(FlagPoint::Cache, default, &scope.context)
}

pub struct CacheManager {
    store: Box<dyn CacheStore>,
    clock: ModificationClock,
    ttl: u64,
    version: String,
}

impl CacheManager {
    pub fn new(store: impl CacheStore + 'static, ttl: u64) -> Self {
        Self {
            store: Box::new(store),
            clock: ModificationClock::new(),
            ttl,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Process-local cache.
    pub fn memory(ttl: u64) -> Self {
        Self::new(MemoryStore::new(), ttl)
    }

    /// File cache configured by `[cache]`, relative to `root`.
    pub fn from_config(config: &ShareableConfig, root: &Path) -> Self {
        Self::new(FileStore::new(root.join(&config.cache.dir)), config.cache.ttl)
    }

    /// Override the version stamped on and required of entries.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Cached payload of `partition`, if still valid at `now`.
    pub fn read(&self, partition: &Partition, now: u64) -> Option<String> {
        let entry = match self.store.get(partition, CACHE_KEY) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                crate::debug!("cache"; "MISS {} (empty)", partition.slug());
                return None;
            }
            Err(e) => {
                crate::debug!("cache"; "MISS {} ({})", partition.slug(), e);
                return None;
            }
        };

        let time_modified = match self.store.time_modified() {
            Ok(time) => time,
            Err(e) => {
                crate::debug!("cache"; "MISS {} ({})", partition.slug(), e);
                return None;
            }
        };

        if entry.is_valid(&self.version, now, time_modified) {
            crate::debug!("cache"; "HIT {}", partition.slug());
            Some(entry.data)
        } else {
            crate::debug!("cache"; "MISS {} (stale)", partition.slug());
            None
        }
    }

    /// Store `payload` in `partition`. Failures are logged and dropped.
    pub fn write(&self, partition: &Partition, payload: &str, now: u64) {
        if payload.is_empty() {
            return;
        }
        let entry = CacheEntry::new(payload, self.version.as_str(), now, self.ttl);
        match self.store.put(partition, CACHE_KEY, &entry) {
            Ok(()) => crate::debug!("cache"; "STORE {}", partition.slug()),
            Err(e) => crate::debug!("cache"; "STORE {} failed: {}", partition.slug(), e),
        }
    }

    /// Record a content change. Returns whether the clock advanced.
    pub fn touch(&self, event: &ChangeEvent, now: u64) -> Result<bool, CacheError> {
        self.clock.record(self.store.as_ref(), event, now)
    }

    pub fn clear(&self) -> Result<usize, CacheError> {
        self.store.clear()
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("ttl", &self.ttl)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
