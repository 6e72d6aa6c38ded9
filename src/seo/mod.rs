//! Social sharing metadata.
//!
//! # Module Structure
//!
//! ```text
//! seo/
//! ├── context.rs     # Context classification
//! ├── audience.rs    # Crawler detection
//! ├── media.rs       # Media extraction
//! ├── meta.rs        # MetaMap
//! ├── hooks.rs       # Interceptor chains
//! ├── assemble.rs    # Metadata assembly
//! ├── render.rs      # Tag rendering
//! ├── feed.rs        # Feed discovery links
//! ├── identity.rs    # Twitter/Facebook/Google name cleaners
//! ├── microdata.rs   # <html> attributes
//! ├── request.rs     # Request inputs
//! └── engine.rs      # Pipeline + cache wiring
//! ```

pub mod assemble;
pub mod audience;
pub mod context;
pub mod engine;
pub mod feed;
pub mod hooks;
pub mod identity;
pub mod media;
pub mod meta;
pub mod microdata;
pub mod render;
pub mod request;

pub use engine::{Engine, Scope};
pub use request::Request;
