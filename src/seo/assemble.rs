//! Metadata assembler.
//!
//! Builds the [`MetaMap`] for one request:
//!
//! 1. seed: site name, type, card, locale, site identities
//! 2. exactly one context branch (front page, article, author, term,
//!    search, post type archive)
//! 3. audience overrides (Pinterest `og:type`)
//! 4. finishing: url and title fallbacks, primary image, then the title,
//!    description and url interceptor chains

use regex::Regex;
use std::sync::LazyLock;

use super::context::Context;
use super::engine::Scope;
use super::hooks::TextPoint;
use super::identity::{Form, clean_facebook, clean_google, clean_twitter};
use super::media::{MediaKind, MediaSet};
use super::meta::{MetaMap, MetaValue};
use crate::site::{Post, shortcode};
use crate::utils::date::DateTimeUtc;
use crate::utils::html::{strip_all_tags, strip_tags};

/// Descriptions longer than this many characters are cut.
pub const DESCRIPTION_LIMIT: usize = 240;

const ELLIPSIS: char = '…';
const MORE_MARKER: &str = "<!--more-->";

/// Minimum width of a large-image card.
const LARGE_IMAGE_MIN_WIDTH: u32 = 280;

/// Minimum width/height ratio of a large-image card.
const LARGE_IMAGE_MIN_RATIO: f64 = 1.5;

static RE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]{2,}").unwrap());
static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Twitter card layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardType {
    #[default]
    Summary,
    SummaryLargeImage,
    Player,
}

impl CardType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryLargeImage => "summary_large_image",
            Self::Player => "player",
        }
    }

    /// Large-image upgrade requested by the entry's kind or format.
    /// Never leaves the player card.
    #[must_use]
    pub const fn upgrade(self) -> Self {
        match self {
            Self::Summary | Self::SummaryLargeImage => Self::SummaryLargeImage,
            Self::Player => Self::Player,
        }
    }
}

/// Build the metadata map for the scope's context.
pub fn assemble(scope: &Scope<'_>, media: MediaSet) -> MetaMap {
    let mut draft = Draft::seeded(scope);

    match &scope.context {
        Context::FrontPage => draft.front_page(),
        Context::Article { post_id } | Context::Attachment { post_id, .. } => {
            if let Some(post) = scope.store.post(*post_id) {
                draft.article(post, &media);
            }
        }
        Context::Author { user_id } => draft.author(*user_id),
        Context::Term { term_id, .. } => draft.term(*term_id),
        Context::Search { query } => draft.url = scope.store.search_link(query),
        Context::Archive { post_type } => {
            if let Some(post_type) = post_type.as_deref().and_then(|pt| scope.store.post_type(pt)) {
                draft.description = post_type.description.clone();
                draft.url = scope.store.post_type_archive_link(&post_type.name);
            }
        }
    }

    if scope.audience.is_agent("pinterest") {
        let og_type = if scope.context.is_singular() {
            "article"
        } else {
            "blog"
        };
        draft.meta.insert("og:type", og_type);
    }

    draft.finish(media)
}

/// Map under construction plus the fields the chains finalize.
struct Draft<'s, 'a> {
    scope: &'s Scope<'a>,
    meta: MetaMap,
    card: CardType,
    title: String,
    description: String,
    url: String,
}

impl<'s, 'a> Draft<'s, 'a> {
    fn seeded(scope: &'s Scope<'a>) -> Self {
        let site = scope.store.site();
        let identity = &scope.config.site;
        let og_type = if scope.context.is_singular() {
            "article"
        } else {
            "website"
        };

        let mut meta = MetaMap::new();
        meta.insert("og:site_name", site.name.as_str());
        meta.insert("og:type", og_type);
        meta.insert("twitter:card", CardType::Summary.as_str());
        meta.insert("og:locale", site.language.replace('-', "_"));
        meta.insert("image_src", MetaValue::Media(Vec::new()));

        let handle = clean_twitter(&identity.twitter, Form::Handle);
        insert_nonempty(&mut meta, "twitter:site", handle);
        insert_nonempty(&mut meta, "google-site-verification", identity.google_verify.clone());
        insert_nonempty(&mut meta, "fb:app_id", identity.facebook_appid.clone());

        Self {
            scope,
            meta,
            card: CardType::Summary,
            title: String::new(),
            description: String::new(),
            url: String::new(),
        }
    }

    fn front_page(&mut self) {
        let site = self.scope.store.site();
        self.title = site.name.clone();
        self.description = site.description.clone();
        self.url = site.home().to_string();
    }

    fn article(&mut self, post: &Post, media: &MediaSet) {
        let scope = self.scope;
        let store = scope.store;

        let publisher = clean_facebook(&scope.config.site.facebook, Form::Url);
        insert_nonempty(&mut self.meta, "article:publisher", publisher);

        if media.large_image {
            self.card = self.card.upgrade();
        }
        self.media_rows(media);

        self.description = if post.excerpt.is_empty() {
            post.content.clone()
        } else {
            post.excerpt.clone()
        };
        self.url = store.permalink(post);

        let author = store.user(post.author);
        if let Some(user) = author {
            let creator = clean_twitter(&user.twitter, Form::Handle);
            insert_nonempty(&mut self.meta, "twitter:creator", creator);
        }

        if let Some(published) = DateTimeUtc::parse(&post.date_gmt) {
            let published = published.to_iso8601();
            self.meta.insert("item:datePublished", published.clone());
            self.meta.insert("article:published_time", published);
        }
        if let Some(modified) = DateTimeUtc::parse(&post.modified_gmt) {
            self.meta.insert("article:modified_time", modified.to_iso8601());
        }

        if let Some(user) = author {
            insert_nonempty(&mut self.meta, "author", user.display_name.clone());
            self.attribution(user);
        }

        self.keywords(post);
    }

    /// Audio and video rows, the `og:type` they imply and the player card.
    fn media_rows(&mut self, media: &MediaSet) {
        if !media.audio.is_empty() {
            self.meta.insert("og:type", "music");
            self.meta.insert("audio_src", media.audio.clone());
        }
        if !media.video.is_empty() {
            self.meta.insert("og:type", "video");
            self.meta.insert("video_src", media.video.clone());
        }
        if let Some(player) = &media.player {
            self.card = CardType::Player;
            self.meta.insert("twitter:player", player.player.as_str());
            self.meta.insert("twitter:player:width", player.width.to_string());
            self.meta.insert("twitter:player:height", player.height.to_string());
            if let Some(stream) = &player.stream {
                self.meta.insert("twitter:player:stream", stream.as_str());
            }
            if let Some(content_type) = player.stream_content_type {
                self.meta.insert("twitter:player:stream:content_type", content_type);
            }
        }
    }

    /// `article:author` / `link:author`, shaped for the requesting crawler.
    fn attribution(&mut self, user: &crate::site::User) {
        let audience = &self.scope.audience;
        if audience.is_agent("pinterest") {
            insert_nonempty(&mut self.meta, "article:author", user.display_name.clone());
            return;
        }
        let link = if audience.is_agent("facebook") && !user.facebook.is_empty() {
            clean_facebook(&user.facebook, Form::Url)
        } else if audience.is_agent("google") && !user.google.is_empty() {
            clean_google(&user.google, Form::Url)
        } else {
            self.scope.store.author_url(user)
        };
        if !link.is_empty() {
            self.meta.insert("article:author", link.clone());
            self.meta.insert("link:author", link);
        }
    }

    /// Sections, tags, video tags and the joined `keywords` list.
    fn keywords(&mut self, post: &Post) {
        let store = self.scope.store;
        let is_video = self.meta.text("og:type") == Some(MediaKind::Video.as_str());
        let mut keywords = Vec::new();

        for taxonomy in store.taxonomies() {
            if !taxonomy.public {
                continue;
            }
            for term in store.post_terms(post, &taxonomy.name) {
                let key = if taxonomy.hierarchical {
                    "article:section"
                } else {
                    "article:tag"
                };
                self.meta.push(key, term.name.as_str());
                if keywords.is_empty() {
                    self.meta.insert("keywords", String::new());
                }
                keywords.push(term.name.as_str());
                if is_video && !taxonomy.hierarchical {
                    self.meta.push("og:video:tag", term.name.as_str());
                }
            }
        }

        if !keywords.is_empty() {
            self.meta.insert("keywords", keywords.join(", "));
        }
    }

    fn author(&mut self, user_id: crate::site::UserId) {
        let store = self.scope.store;
        self.meta.insert("og:type", "profile");
        let Some(user) = store.user(user_id) else {
            return;
        };
        self.meta.insert("profile:first_name", user.first_name.as_str());
        self.meta.insert("profile:last_name", user.last_name.as_str());
        self.meta.insert("profile:username", user.nicename.as_str());
        self.description = user.description.clone();
        self.url = store.author_url(user);
    }

    fn term(&mut self, term_id: crate::site::TermId) {
        let store = self.scope.store;
        let Some(term) = store.term(term_id) else {
            return;
        };
        self.description = if term.description.is_empty() {
            store
                .taxonomy(&term.taxonomy)
                .map(|taxonomy| taxonomy.description.clone())
                .unwrap_or_default()
        } else {
            term.description.clone()
        };
        self.url = store.term_link(term);
    }

    fn finish(mut self, media: MediaSet) -> MetaMap {
        let scope = self.scope;
        let context = &scope.context;
        let hooks = scope.hooks;

        if self.url.is_empty() && !scope.request.host.is_empty() {
            self.url = scope.request.current_url();
        }
        if self.title.is_empty() {
            self.title = match &scope.request.document_title {
                Some(title) if !title.is_empty() => title.clone(),
                _ => conventional_title(scope),
            };
        }

        if let Some(image) = media.primary_image() {
            self.meta.insert("twitter:image", image.source_url.as_str());
            self.meta.insert("item:image", image.source_url.as_str());
            if is_large_image(image.width, image.height) {
                self.card = CardType::SummaryLargeImage;
            }
        }
        self.meta.insert("image_src", media.images);
        self.meta.insert("twitter:card", self.card.as_str());

        let title = hooks.apply_text(TextPoint::Title, self.title, context);
        let title = strip_tags(&title).trim().to_string();
        if !title.is_empty() {
            for key in ["og:title", "twitter:title", "item:name"] {
                self.meta.insert(key, title.as_str());
            }
            let single = context
                .post_id()
                .and_then(|id| scope.store.post(id))
                .is_some_and(Post::is_single);
            if single {
                self.meta.insert("item:headline", title);
            }
        }

        let description = hooks.apply_text(TextPoint::Description, self.description, context);
        if !description.is_empty() {
            for key in ["description", "og:description", "twitter:description", "item:description"] {
                self.meta.insert(key, description.as_str());
            }
        }

        let url = hooks.apply_text(TextPoint::Url, self.url, context);
        if !url.is_empty() {
            for key in ["og:url", "twitter:url", "item:url"] {
                self.meta.insert(key, url.as_str());
            }
            if context.is_front_page() {
                self.meta.insert("link:canonical", url);
            }
        }

        self.meta
    }
}

fn insert_nonempty(meta: &mut MetaMap, key: &str, value: String) {
    if !value.is_empty() {
        meta.insert(key, value);
    }
}

/// Width of at least 280 and an aspect ratio of at least 1.5.
pub fn is_large_image(width: u32, height: u32) -> bool {
    height > 0
        && width >= LARGE_IMAGE_MIN_WIDTH
        && f64::from(width) / f64::from(height) >= LARGE_IMAGE_MIN_RATIO
}

/// Document title built the way the host did before it captured titles:
/// ` {sep} {entity title}`, split on the separator, trimmed, re-joined.
pub fn conventional_title(scope: &Scope<'_>) -> String {
    let separator = scope.request.title_separator();
    let store = scope.store;

    let entity = match &scope.context {
        Context::Article { post_id } | Context::Attachment { post_id, .. } => store
            .post(*post_id)
            .map(|post| post.title.clone())
            .unwrap_or_default(),
        Context::Author { user_id } => store
            .user(*user_id)
            .map(|user| user.display_name.clone())
            .unwrap_or_default(),
        Context::Term { term_id, .. } => store
            .term(*term_id)
            .map(|term| term.name.clone())
            .unwrap_or_default(),
        Context::Search { query } => format!("Search Results {separator} {}", strip_tags(query)),
        Context::Archive {
            post_type: Some(name),
        } => store
            .post_type(name)
            .map(|post_type| post_type.label.clone())
            .unwrap_or_default(),
        Context::FrontPage | Context::Archive { post_type: None } => String::new(),
    };

    join_title(&format!(" {separator} {entity}"), separator)
        .unwrap_or_else(|| store.site().name.clone())
}

/// Trimmed non-empty parts of `raw`, joined with ` {sep} `.
fn join_title(raw: &str, separator: &str) -> Option<String> {
    let parts: Vec<&str> = raw
        .split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(&format!(" {separator} ")))
}

/// Built-in description cleaner.
///
/// Uses the text before the last `<!--more-->` marker, or else the first
/// paragraph, as plain text. Cut to [`DESCRIPTION_LIMIT`] characters plus an
/// ellipsis; empty results become `site_name`.
pub fn clean_description(text: &str, site_name: &str) -> String {
    let text = shortcode::strip_shortcodes(text);

    let description = match text.rfind(MORE_MARKER) {
        Some(end) => {
            let plain = strip_all_tags(text[..end].trim()).replace(['\r', '\t'], "");
            RE_BLANK_RUN.replace_all(&plain, "\n\n").into_owned()
        }
        None => {
            let plain = strip_all_tags(&text);
            RE_PARAGRAPH_BREAK
                .split(&plain)
                .map(str::trim)
                .find(|paragraph| !paragraph.is_empty())
                .unwrap_or_default()
                .to_string()
        }
    };

    if description.chars().count() > DESCRIPTION_LIMIT {
        let mut cut: String = description.chars().take(DESCRIPTION_LIMIT).collect();
        cut.push(ELLIPSIS);
        cut
    } else if description.is_empty() {
        site_name.to_string()
    } else {
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod description {
        use super::*;

        #[test]
        fn test_first_paragraph() {
            let text = "<p>First <b>para</b>.</p>\n\n<p>Second.</p>";
            assert_eq!(clean_description(text, "Site"), "First para.");
        }

        #[test]
        fn test_more_marker_uses_last_marker() {
            let text = "Intro\r\n\n\n\nstill intro<!--more-->middle<!--more-->rest";
            assert_eq!(clean_description(text, "Site"), "Intro\n\nstill intromiddle");
        }

        #[test]
        fn test_shortcodes_removed_first() {
            let text = "[gallery ids=\"1,2\"]\n\nCaption text";
            assert_eq!(clean_description(text, "Site"), "Caption text");
        }

        #[test]
        fn test_truncation() {
            let long = "é".repeat(300);
            let out = clean_description(&long, "Site");
            assert_eq!(out.chars().count(), DESCRIPTION_LIMIT + 1);
            assert!(out.ends_with(ELLIPSIS));

            let exact = "a".repeat(DESCRIPTION_LIMIT);
            assert_eq!(clean_description(&exact, "Site"), exact);
        }

        #[test]
        fn test_empty_falls_back_to_site_name() {
            assert_eq!(clean_description("<p> </p>", "Site"), "Site");
            assert_eq!(clean_description("", "Site"), "Site");
        }
    }

    mod card {
        use super::*;

        #[test]
        fn test_large_image_threshold() {
            assert!(is_large_image(900, 300));
            assert!(is_large_image(300, 200));
            assert!(!is_large_image(800, 600));
            assert!(!is_large_image(270, 100));
            assert!(!is_large_image(900, 0));
        }

        #[test]
        fn test_upgrade_is_idempotent() {
            let card = CardType::Summary.upgrade();
            assert_eq!(card.upgrade(), CardType::SummaryLargeImage);
            assert_eq!(CardType::Player.upgrade(), CardType::Player);
        }
    }

    #[test]
    fn test_join_title() {
        assert_eq!(join_title(" / Hello", "/").as_deref(), Some("Hello"));
        assert_eq!(
            join_title(" | Search Results | rust", "|").as_deref(),
            Some("Search Results | rust")
        );
        assert_eq!(join_title(" /  ", "/"), None);
    }
}
