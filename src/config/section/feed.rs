//! `[feed]` section configuration.
//!
//! Decides which feed discovery links follow the tag block.
//!
//! # Example
//!
//! ```toml
//! [feed]
//! enable = true
//! types = ["rss2", "atom", "rdf"]
//! global = ["posts"]                              # posts, comments
//! local = ["posts", "terms", "search", "author"]  # + comments
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::mime;

/// Syndication format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    Rss2,
    Atom,
    Rdf,
}

impl FeedType {
    /// Path segment (`feed/<type>/`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rss2 => "rss2",
            Self::Atom => "atom",
            Self::Rdf => "rdf",
        }
    }

    /// Display name used in link titles.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rss2 => "RSS 2.0",
            Self::Atom => "ATOM 1.0",
            Self::Rdf => "RDF/RSS 1.0",
        }
    }

    pub fn mime_type(self) -> &'static str {
        mime::for_feed(self.as_str())
    }
}

/// Which listing a feed covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedScope {
    Posts,
    Comments,
    Terms,
    Search,
    Author,
}

impl FeedScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Comments => "comments",
            Self::Terms => "terms",
            Self::Search => "search",
            Self::Author => "author",
        }
    }

    /// Scopes that have a site-wide feed.
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Posts | Self::Comments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub types: Vec<FeedType>,
    pub global: Vec<FeedScope>,
    pub local: Vec<FeedScope>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            types: vec![FeedType::Rss2, FeedType::Atom, FeedType::Rdf],
            global: vec![FeedScope::Posts],
            local: vec![
                FeedScope::Posts,
                FeedScope::Terms,
                FeedScope::Search,
                FeedScope::Author,
            ],
        }
    }
}

impl FeedConfig {
    pub const TYPES: FieldPath = FieldPath::new("feed.types");
    pub const GLOBAL: FieldPath = FieldPath::new("feed.global");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for scope in self.global.iter().filter(|s| !s.is_global()) {
            diag.error_with_hint(
                Self::GLOBAL,
                format!("`{}` has no site-wide feed", scope.as_str()),
                "allowed values: \"posts\", \"comments\"",
            );
        }
        if self.enable && self.types.is_empty() {
            diag.warn(Self::TYPES, "feeds are enabled but no feed types are listed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_feed_defaults() {
        let config = test_parse_config("");
        assert!(config.feed.enable);
        assert_eq!(config.feed.types.len(), 3);
        assert_eq!(config.feed.global, vec![FeedScope::Posts]);
        assert!(!config.feed.local.contains(&FeedScope::Comments));
    }

    #[test]
    fn test_feed_override() {
        let config =
            test_parse_config("[feed]\ntypes = [\"atom\"]\nglobal = [\"posts\", \"comments\"]");
        assert_eq!(config.feed.types, vec![FeedType::Atom]);
        assert_eq!(config.feed.global.len(), 2);
    }

    #[test]
    fn test_unknown_feed_type_is_rejected() {
        let result: Result<FeedConfig, _> = toml::from_str("types = [\"json\"]");
        assert!(result.is_err());
    }

    #[test]
    fn test_local_only_scope_in_global() {
        let mut config = FeedConfig::default();
        config.global.push(FeedScope::Search);
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_feed_type_names() {
        assert_eq!(FeedType::Rss2.name(), "RSS 2.0");
        assert_eq!(FeedType::Rdf.as_str(), "rdf");
        assert_eq!(FeedType::Atom.mime_type(), "application/atom+xml");
    }
}
