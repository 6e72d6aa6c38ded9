//! Audience policy.
//!
//! Identifies the requesting client from its user agent. Crawlers get
//! differently shaped output: Pinterest forces `og:type`, Facebook needs
//! its own audio MIME type, and the crawlers that read live metadata
//! bypass the cache.

use rustc_hash::FxHashMap;
use std::cell::{OnceCell, RefCell};

use super::hooks::Interceptors;

/// Vendor tokens and the user-agent substrings that identify them.
const SIGNATURES: [(&str, &[&str]); 4] = [
    ("facebook", &["facebookexternalhit/", "Facebot"]),
    ("google", &["Google"]),
    ("twitter", &["Twitterbot/"]),
    ("pinterest", &["Pinterest/"]),
];

/// Crawlers whose previews must be built from live data.
const LIVE_DATA_AGENTS: [&str; 3] = ["facebook", "google", "pinterest"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Agent {
    Browser,
    Facebook,
    Google,
    Twitter,
    Pinterest,
    /// A caller-configured token found in the user agent.
    Named(String),
}

impl Agent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Browser => "browser",
            Self::Facebook => "facebook",
            Self::Google => "google",
            Self::Twitter => "twitter",
            Self::Pinterest => "pinterest",
            Self::Named(token) => token,
        }
    }

    fn vendor(token: &str) -> Option<Self> {
        match token {
            "facebook" => Some(Self::Facebook),
            "google" => Some(Self::Google),
            "twitter" => Some(Self::Twitter),
            "pinterest" => Some(Self::Pinterest),
            _ => None,
        }
    }
}

/// Whether `user_agent` matches `token`.
///
/// Vendor tokens match their documented signatures; any token also matches
/// as a literal substring.
pub fn matches_token(user_agent: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let by_signature = SIGNATURES
        .iter()
        .find(|(vendor, _)| *vendor == token)
        .is_some_and(|(_, signatures)| signatures.iter().any(|s| user_agent.contains(s)));
    by_signature || user_agent.contains(token)
}

/// Classify a user agent without interceptors.
///
/// Vendors are tested first, then `tokens` in order.
pub fn classify_agent(user_agent: &str, tokens: &[String]) -> Agent {
    SIGNATURES
        .iter()
        .map(|(vendor, _)| *vendor)
        .chain(tokens.iter().map(String::as_str))
        .find(|token| matches_token(user_agent, token))
        .map_or(Agent::Browser, |token| {
            Agent::vendor(token).unwrap_or_else(|| Agent::Named(token.to_string()))
        })
}

/// Request-scoped view of the client.
///
/// Token matches are memoized for the lifetime of the request, after the
/// agent interceptors ran.
pub struct Audience<'a> {
    user_agent: String,
    tokens: &'a [String],
    hooks: &'a Interceptors,
    memo: RefCell<FxHashMap<String, bool>>,
    agent: OnceCell<Agent>,
}

impl<'a> Audience<'a> {
    pub fn new(user_agent: impl Into<String>, tokens: &'a [String], hooks: &'a Interceptors) -> Self {
        Self {
            user_agent: user_agent.into(),
            tokens,
            hooks,
            memo: RefCell::default(),
            agent: OnceCell::new(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether the client matches a vendor name or a literal token.
    pub fn is_agent(&self, token: &str) -> bool {
        let cached = self.memo.borrow().get(token).copied();
        if let Some(matched) = cached {
            return matched;
        }
        let matched = self
            .hooks
            .apply_agent(matches_token(&self.user_agent, token), token);
        self.memo.borrow_mut().insert(token.to_string(), matched);
        matched
    }

    /// The client, classified once per request.
    pub fn agent(&self) -> &Agent {
        self.agent.get_or_init(|| {
            SIGNATURES
                .iter()
                .map(|(vendor, _)| *vendor)
                .chain(self.tokens.iter().map(String::as_str))
                .find(|token| self.is_agent(token))
                .map_or(Agent::Browser, |token| {
                    Agent::vendor(token).unwrap_or_else(|| Agent::Named(token.to_string()))
                })
        })
    }

    /// Crawlers that must never see cached or bot-hostile output.
    pub fn requires_live_data(&self) -> bool {
        LIVE_DATA_AGENTS.iter().any(|token| self.is_agent(token))
    }
}

impl std::fmt::Debug for Audience<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Audience")
            .field("user_agent", &self.user_agent)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
