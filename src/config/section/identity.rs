//! `[site]`, `[whitelist]` and `[audience]` sections.
//!
//! # Example
//!
//! ```toml
//! [site]
//! twitter = "@example"                        # twitter:site
//! facebook = "https://www.facebook.com/example" # article:publisher
//! facebook_appid = "1234567890"               # fb:app_id
//! google_verify = "abc123"                    # google-site-verification
//!
//! [whitelist]
//! twitter = true                              # domain approved for player cards
//!
//! [audience]
//! tokens = ["Slackbot"]                       # extra user-agent tokens
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Static identity values injected into every head block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub twitter: String,
    pub facebook: String,
    pub facebook_appid: String,
    pub google_verify: String,
}

impl IdentityConfig {
    pub const FACEBOOK_APPID: FieldPath = FieldPath::new("site.facebook_appid");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let appid = self.facebook_appid.trim();
        if !appid.is_empty() && !appid.bytes().all(|b| b.is_ascii_digit()) {
            diag.error_with_hint(
                Self::FACEBOOK_APPID,
                format!("`{appid}` must contain only digits"),
                "copy the numeric App ID from the Facebook developer dashboard",
            );
        }
    }
}

/// Platform approvals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistConfig {
    /// Domain is approved for Twitter player cards.
    pub twitter: bool,
    /// Reserved.
    pub facebook: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudienceConfig {
    /// Extra user-agent substrings recognized as named agents.
    pub tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_identity_sections() {
        let config = test_parse_config(
            "[site]\ntwitter = \"@example\"\nfacebook_appid = \"42\"\n\
             [whitelist]\ntwitter = true\n[audience]\ntokens = [\"Slackbot\"]",
        );
        assert_eq!(config.site.twitter, "@example");
        assert_eq!(config.site.facebook_appid, "42");
        assert!(config.whitelist.twitter);
        assert!(!config.whitelist.facebook);
        assert_eq!(config.audience.tokens, vec!["Slackbot".to_string()]);
    }

    #[test]
    fn test_appid_must_be_numeric() {
        let mut diag = ConfigDiagnostics::new();
        IdentityConfig {
            facebook_appid: "12ab".into(),
            ..Default::default()
        }
        .validate(&mut diag);
        assert!(diag.has_errors());

        let mut diag = ConfigDiagnostics::new();
        IdentityConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());
    }
}
