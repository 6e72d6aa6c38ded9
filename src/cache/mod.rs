//! Rendered head block cache.
//!
//! Output is cached per content partition (post, user, term, home) inside a
//! version and expiry envelope, and invalidated by a global modification
//! timestamp.

mod entry;
mod manager;
mod modified;
mod store;

pub use entry::CacheEntry;
pub use manager::{CACHE_KEY, CacheManager, Partition, enabled, partition};
pub use modified::{ChangeEvent, ModificationClock, OPTION_KEY};
pub use store::{CacheError, CacheStore, FileStore, MemoryStore};
