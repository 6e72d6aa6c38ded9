//! Root element attributes.
//!
//! Amends the `<html>` attribute string with the XML namespaces of every
//! vocabulary the head block uses, an RDFa `prefix` list and the
//! schema.org `itemscope`/`itemtype` pair.

use regex::Regex;
use std::sync::LazyLock;

use super::context::Context;
use super::engine::Scope;
use super::hooks::{Namespace, TextPoint};
use super::media::MediaKind;
use crate::utils::html::escape_attr;

pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const SCHEMA_ORG: &str = "http://schema.org/";

/// Vocabularies declared on the root element, in declaration order.
pub fn default_namespaces() -> Vec<Namespace> {
    [
        ("og", "http://ogp.me/ns#"),
        ("fb", "http://www.facebook.com/2008/fbml"),
        ("profile", "http://ogp.me/ns/profile#"),
        ("article", "http://ogp.me/ns/article#"),
        ("music", "http://ogp.me/ns/music#"),
        ("video", "http://ogp.me/ns/video#"),
    ]
    .into_iter()
    .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
    .collect()
}

/// schema.org type describing the page.
pub fn itemtype(scope: &Scope<'_>) -> &'static str {
    match &scope.context {
        Context::Attachment { media_kind, .. } => match media_kind {
            Some(MediaKind::Image) => "ImageObject",
            Some(MediaKind::Audio) => "AudioObject",
            Some(MediaKind::Video) => "VideoObject",
            None => "MediaObject",
        },
        Context::Author { .. } => "ProfilePage",
        Context::Term { .. } | Context::Archive { .. } => "CollectionPage",
        Context::Search { .. } => "SearchResultsPage",
        Context::Article { post_id } => {
            let single = scope.store.post(*post_id).is_some_and(|post| post.is_single());
            if single { "Article" } else { "WebPage" }
        }
        Context::FrontPage => "WebPage",
    }
}

/// `existing` amended with namespace and microdata attributes.
pub fn html_attributes(scope: &Scope<'_>, existing: &str) -> String {
    let mut attrs = existing.trim().to_string();
    let namespaces = scope.hooks.apply_namespaces(default_namespaces());

    modify_attribute(&mut attrs, "xmlns", XHTML_NAMESPACE, None);

    let mut prefixes = Vec::new();
    for (prefix, uri) in &namespaces {
        modify_attribute(&mut attrs, &format!("xmlns:{prefix}"), uri, None);
        let declared = format!("{prefix}: ");
        if !attrs.to_lowercase().contains(&declared.to_lowercase()) {
            prefixes.push(format!("{declared}{uri}"));
        }
    }
    if !prefixes.is_empty() {
        modify_attribute(&mut attrs, "prefix", &prefixes.join(" "), Some(" "));
    }

    if !attrs.to_lowercase().contains("itemscope") {
        attrs.push_str(" itemscope");
    }

    let itemtype = scope
        .hooks
        .apply_text(TextPoint::Itemtype, itemtype(scope).to_string(), &scope.context);
    modify_attribute(&mut attrs, "itemtype", &format!("{SCHEMA_ORG}{itemtype}"), None);

    attrs.trim_start().to_string()
}

static RE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s="'<>/]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Replace `key="..."` in `attrs`, or append it when absent.
///
/// Keys match case-insensitively. With `amend`, the old value is kept and
/// `amend` plus `value` appended.
pub fn modify_attribute(attrs: &mut String, key: &str, value: &str, amend: Option<&str>) {
    let mut spans = Vec::new();
    let mut replacement = None;
    for caps in RE_ATTRIBUTE.captures_iter(attrs) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !caps[1].eq_ignore_ascii_case(key) {
            continue;
        }
        if replacement.is_none() {
            let mut attribute = format!("{}=\"", escape_attr(&caps[1]));
            if let Some(amend) = amend {
                let old = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
                attribute.push_str(old);
                attribute.push_str(amend);
            }
            attribute.push_str(&escape_attr(value));
            attribute.push('"');
            replacement = Some(attribute);
        }
        spans.push(whole.range());
    }

    let Some(replacement) = replacement else {
        attrs.push_str(&format!(" {}=\"{}\"", escape_attr(key), escape_attr(value)));
        return;
    };

    let mut out = String::with_capacity(attrs.len() + replacement.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&attrs[last..span.start]);
        out.push_str(&replacement);
        last = span.end;
    }
    out.push_str(&attrs[last..]);
    *attrs = out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_appends_missing() {
        let mut attrs = String::from("lang=\"en-US\"");
        modify_attribute(&mut attrs, "xmlns", XHTML_NAMESPACE, None);
        assert_eq!(attrs, "lang=\"en-US\" xmlns=\"http://www.w3.org/1999/xhtml\"");
    }

    #[test]
    fn test_modify_replaces_existing() {
        let mut attrs = String::from("lang='en' ITEMTYPE='http://schema.org/Thing'");
        modify_attribute(&mut attrs, "itemtype", "http://schema.org/$1", None);
        assert_eq!(attrs, "lang='en' ITEMTYPE=\"http://schema.org/$1\"");
    }

    #[test]
    fn test_modify_amends() {
        let mut attrs = String::from("prefix=\"dc: http://purl.org/dc/terms/\"");
        modify_attribute(&mut attrs, "prefix", "og: http://ogp.me/ns#", Some(" "));
        assert_eq!(attrs, "prefix=\"dc: http://purl.org/dc/terms/ og: http://ogp.me/ns#\"");
    }

    #[test]
    fn test_modify_matches_whole_names() {
        let mut attrs = String::from("data-prefix=\"x\" Prefix='dc: http://purl.org/dc/terms/'");
        modify_attribute(&mut attrs, "prefix", "og: http://ogp.me/ns#", Some(" "));
        assert_eq!(
            attrs,
            "data-prefix=\"x\" Prefix=\"dc: http://purl.org/dc/terms/ og: http://ogp.me/ns#\""
        );

        let mut attrs = String::from("xmlns:fb=\"a\"");
        modify_attribute(&mut attrs, "xmlns:fb", "http://www.facebook.com/2008/fbml", None);
        assert_eq!(attrs, "xmlns:fb=\"http://www.facebook.com/2008/fbml\"");
    }

    #[test]
    fn test_xmlns_does_not_match_prefixed_form() {
        let mut attrs = String::from("xmlns:og=\"http://ogp.me/ns#\"");
        modify_attribute(&mut attrs, "xmlns", XHTML_NAMESPACE, None);
        assert!(attrs.starts_with("xmlns:og=\"http://ogp.me/ns#\" xmlns="));
    }
}
