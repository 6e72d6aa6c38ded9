//! Head block pipeline.
//!
//! ```text
//! QueryState ─► classify ─► Context
//!                              │
//!        ┌─────────── cache read (HIT) ─────────────┐
//!        │ MISS                                     │
//!        ▼                                          │
//!   media::extract ─► assemble ─► map hooks         │
//!        ─► render ─► feed links ─► output hooks    │
//!        ─► cache write                             │
//!        └──────────────────┬───────────────────────┘
//!                           ▼
//!                  provenance comments
//! ```
//!
//! The cached payload is the unwrapped output; provenance comments are
//! added on every response.

use super::audience::Audience;
use super::context::{Context, QueryState, classify};
use super::hooks::{FlagPoint, Interceptors, TextPoint};
use super::request::Request;
use super::{assemble, feed, media, microdata, render};
use crate::cache::{self, CacheManager};
use crate::config::ShareableConfig;
use crate::site::{ContentStore, route};
use crate::utils::date::unix_now;

/// Product name in provenance comments.
pub const NAME: &str = "Shareable";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");

/// Everything one request's derivation reads.
pub struct Scope<'a> {
    pub store: &'a dyn ContentStore,
    pub config: &'a ShareableConfig,
    pub request: &'a Request,
    pub audience: Audience<'a>,
    pub hooks: &'a Interceptors,
    pub context: Context,
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("context", &self.context)
            .field("request", &self.request)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

pub struct Engine {
    store: Box<dyn ContentStore>,
    config: ShareableConfig,
    hooks: Interceptors,
    cache: CacheManager,
}

impl Engine {
    /// Engine with the built-in interceptors registered.
    pub fn new(store: impl ContentStore + 'static, config: ShareableConfig, cache: CacheManager) -> Self {
        let hooks = Interceptors::with_defaults(store.site().name.clone());
        Self {
            store: Box::new(store),
            config,
            hooks,
            cache,
        }
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &ShareableConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Register interceptors on top of the built-ins.
    pub fn hooks_mut(&mut self) -> &mut Interceptors {
        &mut self.hooks
    }

    /// Query state of the request path, `None` when nothing matches.
    pub fn route(&self, request: &Request) -> Option<QueryState> {
        route::resolve(self.store(), &request.uri)
    }

    pub fn scope<'a>(&'a self, request: &'a Request, state: &QueryState) -> Scope<'a> {
        Scope {
            store: self.store(),
            config: &self.config,
            request,
            audience: Audience::new(
                request.user_agent.as_str(),
                &self.config.audience.tokens,
                &self.hooks,
            ),
            hooks: &self.hooks,
            context: classify(state),
        }
    }

    /// Head block for the request, `None` when the render gate is closed.
    pub fn render(&self, request: &Request, state: &QueryState) -> Option<String> {
        self.render_at(request, state, unix_now())
    }

    pub fn render_at(&self, request: &Request, state: &QueryState, now: u64) -> Option<String> {
        let scope = self.scope(request, state);
        let open = scope
            .hooks
            .apply_flag(FlagPoint::Render, request.is_success(), &scope.context);
        if !open {
            crate::debug!("engine"; "not rendering for status {}", request.status);
            return None;
        }

        let slot = if cache::enabled(&scope) {
            cache::partition(&scope.context)
        } else {
            None
        };

        let payload = match slot.as_ref().and_then(|p| self.cache.read(p, now)) {
            Some(payload) => payload,
            None => {
                let payload = derive(&scope);
                if let Some(partition) = &slot {
                    self.cache.write(partition, &payload, now);
                }
                payload
            }
        };

        Some(wrap(&payload))
    }

    /// Root element attributes for the request.
    pub fn html_attributes(&self, request: &Request, state: &QueryState, existing: &str) -> String {
        microdata::html_attributes(&self.scope(request, state), existing)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Run the uncached pipeline.
fn derive(scope: &Scope<'_>) -> String {
    crate::debug!("engine"; "deriving {} metadata", scope.context.label());
    let media = media::extract(scope);
    let meta = assemble::assemble(scope, media);
    let meta = scope.hooks.apply_map(meta, &scope.context);

    let mut output = render::render(&meta, scope.hooks);
    output.push_str(&feed::render(&feed::feed_links(scope)));
    scope.hooks.apply_text(TextPoint::Output, output, &scope.context)
}

/// Surround `payload` with the provenance comments.
pub fn wrap(payload: &str) -> String {
    format!("<!-- {NAME} {VERSION} <{HOMEPAGE}> -->\n{payload}<!-- / {NAME} {VERSION} -->\n")
}
