//! Interceptor chains.
//!
//! Every derived value passes through an ordered chain of callbacks that
//! may replace it. For text fields an empty result vetoes the field.
//!
//! Chains run in ascending priority; callbacks registered with the same
//! priority run in registration order. Built-in behavior is registered at
//! [`BUILTIN_PRIORITY`], so callers using [`DEFAULT_PRIORITY`] see the
//! built-in result.
//!
//! ```ignore
//! let mut hooks = Interceptors::with_defaults("Field Notes");
//! hooks.on_text(TextPoint::Title, DEFAULT_PRIORITY, |title, _| title.to_uppercase());
//! hooks.on_flag(FlagPoint::Cache, DEFAULT_PRIORITY, |_, context| !context.is_front_page());
//! ```

use rustc_hash::FxHashMap;

use super::assemble::clean_description;
use super::context::Context;
use super::meta::MetaMap;
use super::render::{Tag, render_tag};

/// Priority of built-in callbacks.
pub const BUILTIN_PRIORITY: i32 = 9;

/// Priority for callers without a preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// `(prefix, uri)` pair declared on the root element.
pub type Namespace = (String, String);

pub type TextHook = dyn Fn(String, &Context) -> String + Send + Sync;
pub type FlagHook = dyn Fn(bool, &Context) -> bool + Send + Sync;
pub type MapHook = dyn Fn(MetaMap, &Context) -> MetaMap + Send + Sync;
pub type TagHook = dyn for<'t> Fn(String, &Tag<'t>) -> String + Send + Sync;
pub type AgentHook = dyn Fn(bool, &str) -> bool + Send + Sync;
pub type NamespaceHook = dyn Fn(Vec<Namespace>) -> Vec<Namespace> + Send + Sync;

/// Interceptable text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextPoint {
    Title,
    Description,
    Url,
    /// The rendered head block, before the provenance comment.
    Output,
    /// schema.org type of the root element.
    Itemtype,
}

/// Interceptable decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagPoint {
    /// Whether the cache is read and written.
    Cache,
    /// Whether the head block is produced at all.
    Render,
    /// Whether site-wide feed links are appended.
    FeedGlobal,
    /// Whether the context's own feed link is appended.
    FeedLocal,
}

/// Callbacks of one extension point, kept sorted by priority.
pub struct Chain<F: ?Sized> {
    hooks: Vec<(i32, Box<F>)>,
}

impl<F: ?Sized> Default for Chain<F> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<F: ?Sized> Chain<F> {
    /// Insert after every callback with a lower or equal priority.
    pub fn add(&mut self, priority: i32, hook: Box<F>) {
        let at = self.hooks.partition_point(|(p, _)| *p <= priority);
        self.hooks.insert(at, (priority, hook));
    }

    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.hooks.iter().map(|(_, hook)| hook.as_ref())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// All extension points of the engine.
#[derive(Default)]
pub struct Interceptors {
    text: FxHashMap<TextPoint, Chain<TextHook>>,
    flags: FxHashMap<FlagPoint, Chain<FlagHook>>,
    map: Chain<MapHook>,
    tag: Chain<TagHook>,
    agent: Chain<AgentHook>,
    namespaces: Chain<NamespaceHook>,
}

impl Interceptors {
    /// No callbacks at all: tags render as nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-ins registered: the description cleaner and the tag renderer.
    pub fn with_defaults(site_name: impl Into<String>) -> Self {
        let site_name = site_name.into();
        let mut hooks = Self::new();
        hooks.on_text(TextPoint::Description, BUILTIN_PRIORITY, move |text, _| {
            clean_description(&text, &site_name)
        });
        hooks.on_tag(BUILTIN_PRIORITY, |_, tag| render_tag(tag));
        hooks
    }

    pub fn on_text<F>(&mut self, point: TextPoint, priority: i32, hook: F)
    where
        F: Fn(String, &Context) -> String + Send + Sync + 'static,
    {
        self.text.entry(point).or_default().add(priority, Box::new(hook));
    }

    pub fn apply_text(&self, point: TextPoint, value: String, context: &Context) -> String {
        match self.text.get(&point) {
            Some(chain) => chain.iter().fold(value, |value, hook| hook(value, context)),
            None => value,
        }
    }

    pub fn on_flag<F>(&mut self, point: FlagPoint, priority: i32, hook: F)
    where
        F: Fn(bool, &Context) -> bool + Send + Sync + 'static,
    {
        self.flags.entry(point).or_default().add(priority, Box::new(hook));
    }

    pub fn apply_flag(&self, point: FlagPoint, value: bool, context: &Context) -> bool {
        match self.flags.get(&point) {
            Some(chain) => chain.iter().fold(value, |value, hook| hook(value, context)),
            None => value,
        }
    }

    pub fn on_map<F>(&mut self, priority: i32, hook: F)
    where
        F: Fn(MetaMap, &Context) -> MetaMap + Send + Sync + 'static,
    {
        self.map.add(priority, Box::new(hook));
    }

    pub fn apply_map(&self, meta: MetaMap, context: &Context) -> MetaMap {
        self.map.iter().fold(meta, |meta, hook| hook(meta, context))
    }

    pub fn on_tag<F>(&mut self, priority: i32, hook: F)
    where
        F: for<'t> Fn(String, &Tag<'t>) -> String + Send + Sync + 'static,
    {
        self.tag.add(priority, Box::new(hook));
    }

    /// Markup for one tag, starting from an empty string.
    pub fn apply_tag(&self, tag: &Tag<'_>) -> String {
        self.tag
            .iter()
            .fold(String::new(), |markup, hook| hook(markup, tag))
    }

    pub fn on_agent<F>(&mut self, priority: i32, hook: F)
    where
        F: Fn(bool, &str) -> bool + Send + Sync + 'static,
    {
        self.agent.add(priority, Box::new(hook));
    }

    pub fn apply_agent(&self, matched: bool, token: &str) -> bool {
        self.agent
            .iter()
            .fold(matched, |matched, hook| hook(matched, token))
    }

    pub fn on_namespaces<F>(&mut self, priority: i32, hook: F)
    where
        F: Fn(Vec<Namespace>) -> Vec<Namespace> + Send + Sync + 'static,
    {
        self.namespaces.add(priority, Box::new(hook));
    }

    pub fn apply_namespaces(&self, namespaces: Vec<Namespace>) -> Vec<Namespace> {
        self.namespaces
            .iter()
            .fold(namespaces, |namespaces, hook| hook(namespaces))
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("text", &self.text.values().map(Chain::len).sum::<usize>())
            .field("flags", &self.flags.values().map(Chain::len).sum::<usize>())
            .field("map", &self.map.len())
            .field("tag", &self.tag.len())
            .field("agent", &self.agent.len())
            .field("namespaces", &self.namespaces.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::FrontPage
    }

    #[test]
    fn test_priority_order_is_stable() {
        let mut hooks = Interceptors::new();
        hooks.on_text(TextPoint::Title, 20, |v, _| format!("{v}c"));
        hooks.on_text(TextPoint::Title, DEFAULT_PRIORITY, |v, _| format!("{v}a"));
        hooks.on_text(TextPoint::Title, DEFAULT_PRIORITY, |v, _| format!("{v}b"));
        hooks.on_text(TextPoint::Title, 1, |v, _| format!("{v}0"));
        assert_eq!(hooks.apply_text(TextPoint::Title, String::new(), &ctx()), "0abc");
    }

    #[test]
    fn test_chain_without_hooks_passes_through() {
        let hooks = Interceptors::new();
        assert_eq!(hooks.apply_text(TextPoint::Url, "u".into(), &ctx()), "u");
        assert!(hooks.apply_flag(FlagPoint::Cache, true, &ctx()));
        assert!(!hooks.apply_agent(false, "facebook"));
    }

    #[test]
    fn test_default_caller_runs_after_builtin() {
        let mut hooks = Interceptors::with_defaults("Site");
        hooks.on_text(TextPoint::Description, DEFAULT_PRIORITY, |v, _| format!("[{v}]"));
        let out = hooks.apply_text(TextPoint::Description, "<p>Hello</p>".into(), &ctx());
        assert_eq!(out, "[Hello]");
    }

    #[test]
    fn test_veto_by_empty_string() {
        let mut hooks = Interceptors::with_defaults("Site");
        hooks.on_text(TextPoint::Description, DEFAULT_PRIORITY, |_, _| String::new());
        assert!(hooks.apply_text(TextPoint::Description, "x".into(), &ctx()).is_empty());
    }

    #[test]
    fn test_flag_hooks_see_context() {
        let mut hooks = Interceptors::new();
        hooks.on_flag(FlagPoint::Cache, DEFAULT_PRIORITY, |v, c| v && !c.is_front_page());
        assert!(!hooks.apply_flag(FlagPoint::Cache, true, &Context::FrontPage));
        assert!(hooks.apply_flag(FlagPoint::Cache, true, &Context::Search { query: "q".into() }));
    }

    #[test]
    fn test_namespace_hook() {
        let mut hooks = Interceptors::new();
        hooks.on_namespaces(DEFAULT_PRIORITY, |mut ns| {
            ns.retain(|(prefix, _)| prefix != "fb");
            ns
        });
        let out = hooks.apply_namespaces(vec![
            ("og".into(), "http://ogp.me/ns#".into()),
            ("fb".into(), "http://www.facebook.com/2008/fbml".into()),
        ]);
        assert_eq!(out.len(), 1);
    }
}
