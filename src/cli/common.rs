//! Setup shared across CLI commands.

use anyhow::{Context, Result};

use super::args::{Cli, RequestArgs};
use crate::cache::CacheManager;
use crate::config::ShareableConfig;
use crate::seo::{Engine, Request};
use crate::site::SiteData;

/// Load config honoring CLI overrides.
pub fn load_config(cli: &Cli) -> Result<ShareableConfig> {
    let mut config = ShareableConfig::load(&cli.config)?;
    if let Some(content) = &cli.content {
        config.content = content.clone();
    }
    Ok(config)
}

/// File-backed cache configured by `[cache]`.
pub fn cache_for(config: &ShareableConfig) -> CacheManager {
    CacheManager::from_config(config, config.get_root())
}

/// Engine over the configured content fixture.
pub fn load_engine(config: ShareableConfig) -> Result<Engine> {
    let site = SiteData::load(&config.content)
        .with_context(|| format!("failed to load content from {}", config.content.display()))?;
    let cache = cache_for(&config);
    Ok(Engine::new(site, config, cache))
}

impl RequestArgs {
    pub fn to_request(&self) -> Request {
        Request {
            https: self.https,
            host: self.host.clone(),
            user_agent: self.user_agent.clone(),
            ..Request::new(self.path.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_request_from_args() {
        let args = RequestArgs {
            path: "/?s=x".into(),
            host: "notes.example".into(),
            https: true,
            user_agent: "Twitterbot/1.0".into(),
        };
        let request = args.to_request();
        assert_eq!(request.uri, "/?s=x");
        assert_eq!(request.current_url(), "https://notes.example/?s=x");
        assert_eq!(request.status, 200);
    }

    #[test]
    fn test_load_engine_reports_missing_content() {
        let dir = TempDir::new().unwrap();
        let config = ShareableConfig {
            content: dir.path().join("missing.toml"),
            ..ShareableConfig::default()
        };
        let err = load_engine(config).unwrap_err();
        assert!(format!("{err}").contains("failed to load content"));
    }

    #[test]
    fn test_load_engine() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content.toml");
        fs::write(&content, "[site]\nname = \"Notes\"\nhome_url = \"https://n.example\"").unwrap();
        let config = ShareableConfig {
            content,
            root: dir.path().to_path_buf(),
            ..ShareableConfig::default()
        };
        let engine = load_engine(config).unwrap();
        assert_eq!(engine.store().site().name, "Notes");
    }
}
