//! Host content model.
//!
//! The metadata engine never owns content: it reads posts, attachments,
//! users and terms through [`ContentStore`]. The CLI and the tests back the
//! trait with [`SiteData`], a TOML content fixture.
//!
//! ```text
//! site/
//! ├── mod.rs         # content types + ContentStore trait (this file)
//! ├── memory.rs      # SiteData: fixture-backed store
//! ├── route.rs       # request path -> QueryState
//! └── shortcode.rs   # [gallery]/[embed] handling
//! ```

mod memory;
pub mod route;
pub mod shortcode;

pub use memory::SiteData;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::seo::media::{MediaAsset, MediaKind};

pub type PostId = u64;
pub type UserId = u64;
pub type TermId = u64;

/// Directory (relative to the home URL) uploads live under by default.
pub const DEFAULT_UPLOAD_PATH: &str = "wp-content/uploads";

/// Site-wide information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    /// Language tag, e.g. `en-US`.
    pub language: String,
    /// Home URL without trailing slash.
    pub home_url: String,
    /// Base URL of the upload directory. Defaults to `{home_url}/wp-content/uploads`.
    pub upload_url: Option<String>,
    /// Attachment used as the site icon.
    pub icon: Option<PostId>,
}

impl SiteInfo {
    pub fn home(&self) -> &str {
        self.home_url.trim_end_matches('/')
    }

    pub fn uploads(&self) -> String {
        match &self.upload_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/{DEFAULT_UPLOAD_PATH}", self.home()),
        }
    }
}

/// Technical metadata of an uploaded file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentMeta {
    /// Path relative to the upload directory (`2024/06/photo.jpg`).
    pub file: String,
    pub width: u32,
    pub height: u32,
    /// Playback length in seconds.
    pub length: u32,
    pub artist: String,
    pub album: String,
    /// Container format reported by the media library (`mp3`, `mp4`).
    pub fileformat: String,
}

/// A post, page, attachment or custom post type entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: PostId,
    pub post_type: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    /// Declared post format (`gallery`, `image`, `audio`, `video`, ...).
    pub format: Option<String>,
    pub author: UserId,
    /// Publish time, GMT (`YYYY-MM-DD HH:MM:SS`).
    pub date_gmt: String,
    /// Last modification time, GMT.
    pub modified_gmt: String,
    /// Entity an attachment is attached to.
    pub parent: Option<PostId>,
    /// Featured image attachment.
    pub thumbnail: Option<PostId>,
    pub mime_type: String,
    pub attachment: Option<AttachmentMeta>,
    pub terms: Vec<TermId>,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            id: 0,
            post_type: "post".into(),
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            excerpt: String::new(),
            format: None,
            author: 0,
            date_gmt: String::new(),
            modified_gmt: String::new(),
            parent: None,
            thumbnail: None,
            mime_type: String::new(),
            attachment: None,
            terms: Vec::new(),
        }
    }
}

impl Post {
    pub fn is_attachment(&self) -> bool {
        self.post_type == "attachment"
    }

    /// `true` for every singular entry except pages.
    pub fn is_single(&self) -> bool {
        self.post_type != "page"
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn has_format(&self, formats: &[&str]) -> bool {
        self.format().is_some_and(|f| formats.contains(&f))
    }

    /// Media kind of an attachment, from its MIME type.
    pub fn media_kind(&self) -> Option<MediaKind> {
        if !self.is_attachment() {
            return None;
        }
        MediaKind::from_mime(&self.mime_type)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub nicename: String,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    /// Contact methods as entered in the profile.
    pub twitter: String,
    pub facebook: String,
    pub google: String,
    /// Avatar base URL; the size is appended as `?s=N`.
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub name: String,
    pub label: String,
    pub singular_label: String,
    pub hierarchical: bool,
    pub public: bool,
    pub description: String,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            name: String::new(),
            label: String::new(),
            singular_label: String::new(),
            hierarchical: false,
            public: true,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Term {
    pub id: TermId,
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostType {
    pub name: String,
    pub label: String,
    pub description: String,
}

/// Read access to published content.
///
/// Required methods are raw lookups; link builders and media helpers are
/// provided on top of them.
pub trait ContentStore {
    fn site(&self) -> &SiteInfo;

    fn post(&self, id: PostId) -> Option<&Post>;

    /// Attachments of `kind` attached to `parent`, in attachment order.
    fn attached_media(&self, parent: PostId, kind: MediaKind) -> Vec<&Post>;

    /// Attachment whose upload-relative file path is `file`.
    fn attachment_by_file(&self, file: &str) -> Option<&Post>;

    fn user(&self, id: UserId) -> Option<&User>;

    fn user_by_nicename(&self, nicename: &str) -> Option<&User>;

    fn term(&self, id: TermId) -> Option<&Term>;

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Option<&Term>;

    /// Registered taxonomies, in registration order.
    fn taxonomies(&self) -> Vec<&Taxonomy>;

    fn taxonomy(&self, name: &str) -> Option<&Taxonomy>;

    fn post_type(&self, name: &str) -> Option<&PostType>;

    fn post_by_slug(&self, slug: &str) -> Option<&Post>;

    /// Resolve an embeddable URL to its player markup.
    fn oembed(&self, url: &str) -> Option<String>;

    /// Terms of `taxonomy` assigned to `post`.
    fn post_terms(&self, post: &Post, taxonomy: &str) -> Vec<&Term> {
        post.terms
            .iter()
            .filter_map(|id| self.term(*id))
            .filter(|term| term.taxonomy == taxonomy)
            .collect()
    }

    fn permalink(&self, post: &Post) -> String {
        let home = self.site().home();
        match post.parent.and_then(|id| self.post(id)) {
            Some(parent) if post.is_attachment() => format!("{home}/{}/{}/", parent.slug, post.slug),
            _ => format!("{home}/{}/", post.slug),
        }
    }

    /// Embeddable player URL of an entry.
    fn embed_url(&self, post: &Post) -> String {
        format!("{}embed/", self.permalink(post))
    }

    /// Direct URL of an uploaded file.
    fn attachment_url(&self, post: &Post) -> Option<String> {
        let meta = post.attachment.as_ref()?;
        Some(format!("{}/{}", self.site().uploads(), meta.file))
    }

    fn author_url(&self, user: &User) -> String {
        format!("{}/author/{}/", self.site().home(), user.nicename)
    }

    fn avatar_url(&self, user: &User, size: u32) -> Option<String> {
        user.avatar.as_ref().map(|base| format!("{base}?s={size}"))
    }

    fn term_link(&self, term: &Term) -> String {
        let base = match term.taxonomy.as_str() {
            "category" => "category",
            "post_tag" => "tag",
            other => other,
        };
        format!("{}/{base}/{}/", self.site().home(), term.slug)
    }

    fn search_link(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        format!("{}/search/{encoded}/", self.site().home())
    }

    fn post_type_archive_link(&self, post_type: &str) -> String {
        format!("{}/type/{post_type}/", self.site().home())
    }

    /// Image properties of an attachment, if it is an image with known metadata.
    fn image(&self, id: PostId) -> Option<MediaAsset> {
        let post = self.post(id)?;
        if post.media_kind() != Some(MediaKind::Image) {
            return None;
        }
        let meta = post.attachment.as_ref()?;
        let url = self.attachment_url(post)?;
        Some(MediaAsset::image(url, meta.width, meta.height, &post.mime_type))
    }
}
