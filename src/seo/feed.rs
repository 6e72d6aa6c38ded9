//! Feed discovery links.
//!
//! Appended after the tag block, once per configured feed type:
//!
//! ```text
//! <link rel="alternate" type="application/rss+xml" title="Site » RSS 2.0 Feed" href=".../feed/rss2/" />
//! ```
//!
//! Global links (site posts, site comments) follow `feed.global`; the
//! context's own link follows `feed.local`. Both gates pass through the
//! feed interceptors.

use super::context::Context;
use super::engine::Scope;
use super::hooks::FlagPoint;
use crate::config::{FeedScope, FeedType};
use crate::site::ContentStore;
use crate::utils::html::escape_attr;

/// One discovery link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLink {
    pub title: String,
    pub href: String,
    pub content_type: &'static str,
}

impl FeedLink {
    pub fn to_html(&self) -> String {
        format!(
            "<link rel=\"alternate\" type=\"{}\" title=\"{}\" href=\"{}\" />\n",
            self.content_type,
            escape_attr(&self.title),
            escape_attr(&self.href)
        )
    }
}

/// Feed scope that serves the context's own listing.
pub fn local_scope(context: &Context) -> Option<FeedScope> {
    match context {
        Context::Article { .. } | Context::Attachment { .. } => Some(FeedScope::Comments),
        Context::Archive { post_type: Some(_) } => Some(FeedScope::Posts),
        Context::Term { .. } => Some(FeedScope::Terms),
        Context::Author { .. } => Some(FeedScope::Author),
        Context::Search { .. } => Some(FeedScope::Search),
        Context::FrontPage | Context::Archive { post_type: None } => None,
    }
}

/// Every discovery link for the scope, in render order.
pub fn feed_links(scope: &Scope<'_>) -> Vec<FeedLink> {
    let feed = &scope.config.feed;
    if !feed.enable || feed.types.is_empty() {
        return Vec::new();
    }
    let context = &scope.context;

    let render_global = scope
        .hooks
        .apply_flag(FlagPoint::FeedGlobal, !feed.global.is_empty(), context);
    let local_enabled = local_scope(context).is_some_and(|s| feed.local.contains(&s));
    let render_local = scope
        .hooks
        .apply_flag(FlagPoint::FeedLocal, local_enabled, context);
    if !render_global && !render_local {
        return Vec::new();
    }

    let mut links = Vec::new();
    for &feed_type in &feed.types {
        let separator = format!("{} {}", scope.request.feed_separator(), feed_type.name());
        let separator = separator.trim();

        if render_global {
            links.extend(global_links(scope, feed_type, separator));
        }
        if render_local && let Some(link) = local_link(scope, feed_type, separator) {
            links.push(link);
        }
    }
    links
}

/// Rendered discovery links.
pub fn render(links: &[FeedLink]) -> String {
    links.iter().map(FeedLink::to_html).collect()
}

fn global_links(scope: &Scope<'_>, feed_type: FeedType, separator: &str) -> Vec<FeedLink> {
    let site = scope.store.site();
    let global = &scope.config.feed.global;
    let mut links = Vec::new();

    if global.contains(&FeedScope::Posts) {
        links.push(FeedLink {
            title: format!("{} {separator} Feed", site.name),
            href: format!("{}/feed/{}/", site.home(), feed_type.as_str()),
            content_type: feed_type.mime_type(),
        });
    }
    if global.contains(&FeedScope::Comments) {
        links.push(FeedLink {
            title: format!("{} {separator} Comments Feed", site.name),
            href: format!("{}/comments/feed/{}/", site.home(), feed_type.as_str()),
            content_type: feed_type.mime_type(),
        });
    }
    links
}

fn local_link(scope: &Scope<'_>, feed_type: FeedType, separator: &str) -> Option<FeedLink> {
    let store: &dyn ContentStore = scope.store;
    let site_name = &store.site().name;

    let (title, page) = match &scope.context {
        Context::Article { post_id } | Context::Attachment { post_id, .. } => {
            let post = store.post(*post_id)?;
            (
                format!("{site_name} {separator} {} Comments Feed", post.title),
                store.permalink(post),
            )
        }
        Context::Archive {
            post_type: Some(name),
        } => {
            let post_type = store.post_type(name)?;
            (
                format!("{site_name} {separator} {} Feed", post_type.label),
                store.post_type_archive_link(name),
            )
        }
        Context::Term { term_id, taxonomy } => {
            let term = store.term(*term_id)?;
            let title = match taxonomy.as_str() {
                "category" => format!("{site_name} {separator} {} Category Feed", term.name),
                "post_tag" => format!("{site_name} {separator} {} Tag Feed", term.name),
                other => {
                    let singular = store
                        .taxonomy(other)
                        .map(|t| t.singular_label.clone())
                        .unwrap_or_default();
                    format!("{site_name} {separator} {} {singular} Feed", term.name)
                }
            };
            (title, store.term_link(term))
        }
        Context::Author { user_id } => {
            let user = store.user(*user_id)?;
            (
                format!("{site_name} {separator} Posts by {} Feed", user.display_name),
                store.author_url(user),
            )
        }
        Context::Search { query } => (
            format!("{site_name} {separator} Search Results for “{query}” Feed"),
            store.search_link(query),
        ),
        Context::FrontPage | Context::Archive { post_type: None } => return None,
    };

    Some(FeedLink {
        title,
        href: format!("{page}feed/{}/", feed_type.as_str()),
        content_type: feed_type.mime_type(),
    })
}
