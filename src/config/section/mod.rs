//! Configuration section definitions.
//!
//! Each module corresponds to sections in `shareable.toml`:
//!
//! | Module     | TOML Section                          | Purpose                      |
//! |------------|---------------------------------------|------------------------------|
//! | `cache`    | `[cache]`                             | Rendered output cache        |
//! | `feed`     | `[feed]`                              | Feed discovery links         |
//! | `identity` | `[site]`, `[whitelist]`, `[audience]` | Site identity, crawlers      |

mod cache;
mod feed;
mod identity;

pub use cache::CacheConfig;
pub use feed::{FeedConfig, FeedScope, FeedType};
pub use identity::{AudienceConfig, IdentityConfig, WhitelistConfig};
