//! Page context classification.
//!
//! The router produces a [`QueryState`] describing what a request matched;
//! [`classify`] turns it into exactly one [`Context`]. Predicates are tested
//! in a fixed order and the first match wins:
//!
//! ```text
//! front page → singular (article | attachment) → author → term → search → archive
//! ```

use crate::seo::media::MediaKind;
use crate::site::{PostId, TermId, UserId};

/// A singular entry matched by the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Singular {
    pub post_id: PostId,
    /// Set when the entry is an attachment.
    pub attachment: Option<Option<MediaKind>>,
}

impl Singular {
    pub const fn article(post_id: PostId) -> Self {
        Self {
            post_id,
            attachment: None,
        }
    }

    pub const fn attachment(post_id: PostId, media_kind: Option<MediaKind>) -> Self {
        Self {
            post_id,
            attachment: Some(media_kind),
        }
    }
}

/// A taxonomy term matched by the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
    pub term_id: TermId,
    pub taxonomy: String,
}

/// Raw query flags of the current request.
///
/// Several flags may be set at once (a static front page is also singular);
/// [`classify`] resolves them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub front_page: bool,
    pub singular: Option<Singular>,
    pub author: Option<UserId>,
    pub term: Option<TermQuery>,
    pub search: Option<String>,
    pub post_type_archive: Option<String>,
}

/// The kind of page being described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    FrontPage,
    Article {
        post_id: PostId,
    },
    Attachment {
        post_id: PostId,
        media_kind: Option<MediaKind>,
    },
    Author {
        user_id: UserId,
    },
    Term {
        term_id: TermId,
        taxonomy: String,
    },
    Search {
        query: String,
    },
    /// Post-type archive, or any unmatched listing when `post_type` is `None`.
    Archive {
        post_type: Option<String>,
    },
}

/// Resolve the request state into a single context.
pub fn classify(state: &QueryState) -> Context {
    if state.front_page {
        return Context::FrontPage;
    }
    if let Some(singular) = &state.singular {
        return match singular.attachment {
            Some(media_kind) => Context::Attachment {
                post_id: singular.post_id,
                media_kind,
            },
            None => Context::Article {
                post_id: singular.post_id,
            },
        };
    }
    if let Some(user_id) = state.author {
        return Context::Author { user_id };
    }
    if let Some(term) = &state.term {
        return Context::Term {
            term_id: term.term_id,
            taxonomy: term.taxonomy.clone(),
        };
    }
    if let Some(query) = &state.search {
        return Context::Search {
            query: query.clone(),
        };
    }
    Context::Archive {
        post_type: state.post_type_archive.clone(),
    }
}

impl Context {
    pub const fn is_front_page(&self) -> bool {
        matches!(self, Self::FrontPage)
    }

    /// Article or attachment.
    pub const fn is_singular(&self) -> bool {
        matches!(self, Self::Article { .. } | Self::Attachment { .. })
    }

    pub const fn is_attachment(&self) -> bool {
        matches!(self, Self::Attachment { .. })
    }

    /// Entry id of singular contexts.
    pub const fn post_id(&self) -> Option<PostId> {
        match self {
            Self::Article { post_id } | Self::Attachment { post_id, .. } => Some(*post_id),
            _ => None,
        }
    }

    /// Media kind of an attachment context.
    pub const fn attachment_kind(&self) -> Option<MediaKind> {
        match self {
            Self::Attachment { media_kind, .. } => *media_kind,
            _ => None,
        }
    }

    /// Short label for logging.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FrontPage => "front",
            Self::Article { .. } => "article",
            Self::Attachment { .. } => "attachment",
            Self::Author { .. } => "author",
            Self::Term { .. } => "term",
            Self::Search { .. } => "search",
            Self::Archive { .. } => "archive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_page_wins_over_singular() {
        let state = QueryState {
            front_page: true,
            singular: Some(Singular::article(4)),
            ..QueryState::default()
        };
        assert_eq!(classify(&state), Context::FrontPage);
    }

    #[test]
    fn test_singular_variants() {
        let article = QueryState {
            singular: Some(Singular::article(4)),
            author: Some(1),
            ..QueryState::default()
        };
        assert_eq!(classify(&article), Context::Article { post_id: 4 });

        let attachment = QueryState {
            singular: Some(Singular::attachment(5, Some(MediaKind::Audio))),
            ..QueryState::default()
        };
        let context = classify(&attachment);
        assert!(context.is_attachment());
        assert_eq!(context.attachment_kind(), Some(MediaKind::Audio));
        assert_eq!(context.post_id(), Some(5));
    }

    #[test]
    fn test_author_before_term_before_search() {
        let mut state = QueryState {
            author: Some(2),
            term: Some(TermQuery {
                term_id: 7,
                taxonomy: "category".into(),
            }),
            search: Some("rust".into()),
            ..QueryState::default()
        };
        assert_eq!(classify(&state), Context::Author { user_id: 2 });
        state.author = None;
        assert!(matches!(classify(&state), Context::Term { term_id: 7, .. }));
        state.term = None;
        assert_eq!(
            classify(&state),
            Context::Search {
                query: "rust".into()
            }
        );
    }

    #[test]
    fn test_fallback_is_generic_archive() {
        assert_eq!(
            classify(&QueryState::default()),
            Context::Archive { post_type: None }
        );
        let state = QueryState {
            post_type_archive: Some("book".into()),
            ..QueryState::default()
        };
        assert_eq!(
            classify(&state),
            Context::Archive {
                post_type: Some("book".into())
            }
        );
    }
}
