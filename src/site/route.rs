//! Request path routing.
//!
//! Maps permalink-style paths onto the query flags the classifier reads:
//!
//! | Path                        | Matches                   |
//! |-----------------------------|---------------------------|
//! | `/`                         | front page                |
//! | `/?s=q`, `/search/q/`       | search results            |
//! | `/?p=12`                    | entry by id               |
//! | `/author/<nicename>/`       | author posts              |
//! | `/category/<slug>/`         | category term             |
//! | `/tag/<slug>/`              | tag term                  |
//! | `/type/<post_type>/`        | post type archive         |
//! | `/<taxonomy>/<slug>/`       | custom taxonomy term      |
//! | `/<slug>/`, `/<parent>/<slug>/` | post, page or attachment |

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use super::{ContentStore, Post};
use crate::seo::context::{QueryState, Singular, TermQuery};

/// Resolve `uri` (path plus optional query string).
///
/// Returns `None` when nothing published matches.
pub fn resolve(store: &dyn ContentStore, uri: &str) -> Option<QueryState> {
    let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
    let path = path.split('#').next().unwrap_or(path);

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "s" => return Some(search(&value)),
            "p" | "page_id" | "attachment_id" => {
                let id = value.parse().ok()?;
                return store.post(id).map(singular);
            }
            _ => {}
        }
    }

    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match segments.as_slice() {
        [] => Some(QueryState {
            front_page: true,
            ..QueryState::default()
        }),
        ["search", query] => Some(search(query)),
        ["author", nicename] => store.user_by_nicename(nicename).map(|user| QueryState {
            author: Some(user.id),
            ..QueryState::default()
        }),
        ["type", post_type] => store.post_type(post_type).map(|post_type| QueryState {
            post_type_archive: Some(post_type.name.clone()),
            ..QueryState::default()
        }),
        [base, slug] => term(store, base, slug).or_else(|| entry(store, slug)),
        [slug] => entry(store, slug),
        _ => None,
    }
}

fn search(query: &str) -> QueryState {
    QueryState {
        search: Some(query.to_string()),
        ..QueryState::default()
    }
}

fn singular(post: &Post) -> QueryState {
    let singular = if post.is_attachment() {
        Singular::attachment(post.id, post.media_kind())
    } else {
        Singular::article(post.id)
    };
    QueryState {
        singular: Some(singular),
        ..QueryState::default()
    }
}

fn entry(store: &dyn ContentStore, slug: &str) -> Option<QueryState> {
    store.post_by_slug(slug).map(singular)
}

fn term(store: &dyn ContentStore, base: &str, slug: &str) -> Option<QueryState> {
    let taxonomy = match base {
        "category" => "category",
        "tag" => "post_tag",
        other => other,
    };
    store.taxonomy(taxonomy)?;
    let term = store.term_by_slug(taxonomy, slug)?;
    Some(QueryState {
        term: Some(TermQuery {
            term_id: term.id,
            taxonomy: term.taxonomy.clone(),
        }),
        ..QueryState::default()
    })
}
