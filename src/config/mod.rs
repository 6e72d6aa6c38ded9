//! Configuration management for `shareable.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Section definitions
//! │   ├── cache      # [cache]
//! │   ├── feed       # [feed]
//! │   └── identity   # [site], [whitelist], [audience]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file lookup
//! └── mod.rs         # ShareableConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                         |
//! |----------------|-------------------------------------------------|
//! | (root)         | `debug` switch, `content` fixture path          |
//! | `[cache]`      | Cache switch, TTL and file store directory      |
//! | `[site]`       | Twitter/Facebook/Google identity values         |
//! | `[whitelist]`  | Player card approval                            |
//! | `[feed]`       | Feed discovery links                            |
//! | `[audience]`   | Additional user-agent tokens                    |

pub mod section;
pub mod types;
mod util;

pub use section::{
    AudienceConfig, CacheConfig, FeedConfig, FeedScope, FeedType, IdentityConfig,
    WhitelistConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use util::find_config_file;

/// Default config file name.
pub const CONFIG_FILE: &str = "shareable.toml";

/// Default content fixture name.
pub const CONTENT_FILE: &str = "content.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing shareable.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareableConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Host debug mode; disables the cache.
    pub debug: bool,

    /// Content fixture file.
    pub content: PathBuf,

    pub cache: CacheConfig,
    pub site: IdentityConfig,
    pub whitelist: WhitelistConfig,
    pub feed: FeedConfig,
    pub audience: AudienceConfig,
}

impl Default for ShareableConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            debug: false,
            content: PathBuf::from(CONTENT_FILE),
            cache: CacheConfig::default(),
            site: IdentityConfig::default(),
            whitelist: WhitelistConfig::default(),
            feed: FeedConfig::default(),
            audience: AudienceConfig::default(),
        }
    }
}

impl ShareableConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// Without a config file the defaults apply and cwd is the root.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", config_name.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.validate()?;
        config.normalize_paths();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve relative paths against the root.
    fn normalize_paths(&mut self) {
        if self.content.is_relative() {
            self.content = self.root.join(&self.content);
        }
        if self.cache.dir.is_relative() {
            self.cache.dir = self.root.join(&self.cache.dir);
        }
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Whether any configured identity value is set.
    pub fn has_identity(&self) -> bool {
        let site = &self.site;
        [&site.twitter, &site.facebook, &site.facebook_appid, &site.google_verify]
            .iter()
            .any(|value| !value.is_empty())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collect every problem and report them together.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.cache.validate(&mut diag);
        self.site.validate(&mut diag);
        self.feed.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ShareableConfig {
    let (parsed, ignored) = ShareableConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_invalid_toml() {
        assert!(ShareableConfig::parse("[cache\nttl = 1").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ShareableConfig::default();
        assert!(!config.debug);
        assert_eq!(config.content, PathBuf::from("content.toml"));
        assert!(config.cache.enable);
        assert!(!config.has_identity());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "debug = true\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ShareableConfig::parse_with_ignored(content).unwrap();
        assert!(config.debug);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = test_parse_config("[cache]\nttl = 0\n[site]\nfacebook_appid = \"abc\"");
        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shareable.toml");
        fs::write(&path, "content = \"site.toml\"\n[cache]\ndir = \"out/cache\"").unwrap();

        let mut config = ShareableConfig::from_path(&path).unwrap();
        config.root = dir.path().to_path_buf();
        config.normalize_paths();
        assert_eq!(config.content, dir.path().join("site.toml"));
        assert_eq!(config.cache.dir, dir.path().join("out/cache"));
    }

    #[test]
    fn test_load_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ShareableConfig::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }
}
