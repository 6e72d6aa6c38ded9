//! Media extraction.
//!
//! Walks the content behind a [`Context`] and collects the images, audio
//! and video a page can be shared with. Sources are visited in priority
//! order:
//!
//! 1. the attachment itself or the featured image
//! 2. attached images, then `<img>` tags of the rendered content
//! 3. large-image card eligibility
//! 4. audio attachments (embedded + streamed rows)
//! 5. video attachments (embedded + streamed rows, player card)
//! 6. `[embed]` URLs resolved through oEmbed
//! 7. the site icon
//!
//! A step that cannot resolve its data is skipped; extraction never fails.

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;

use super::context::Context;
use super::engine::Scope;
use crate::site::{AttachmentMeta, ContentStore, Post, shortcode};
use crate::utils::mime;

/// Avatar size requested for author pages.
pub const AVATAR_SIZE: u32 = 300;

/// Content type announced for player card streams.
const PLAYER_STREAM_TYPE: &str = mime::types::MP4;

static RE_DERIVATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-\d+x\d+(\.(?:jpg|jpeg|png|gif))$").unwrap());
static RE_CONTENT_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)src\s*=\s*(?:"(https?:[^"]*?\.(?:gif|jpg|jpeg|png))"|'(https?:[^']*?\.(?:gif|jpg|jpeg|png))')"#,
    )
    .unwrap()
});
static RE_EMBED_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?si)\b(src|width|height)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Kind of a MIME type (`image/*`, `audio/*`, `video/*`).
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime::is_image(mime_type) {
            Some(Self::Image)
        } else if mime::is_audio(mime_type) {
            Some(Self::Audio)
        } else if mime::is_video(mime_type) {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

/// One shareable media row.
///
/// Zero dimensions and an empty MIME type mean "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaAsset {
    pub source_url: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub kind: MediaKind,
    /// Seconds.
    pub duration: u32,
    pub artist: String,
    pub album: String,
}

impl MediaAsset {
    pub fn image(url: impl Into<String>, width: u32, height: u32, mime_type: &str) -> Self {
        Self {
            source_url: url.into(),
            width,
            height,
            mime_type: mime_type.to_string(),
            kind: MediaKind::Image,
            ..Self::default()
        }
    }

    /// Dedup key: the URL with any derivative suffix removed.
    pub fn canonical_url(&self) -> Cow<'_, str> {
        canonicalize(&self.source_url)
    }
}

/// Twitter player card data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub player: String,
    pub width: u32,
    pub height: u32,
    pub stream: Option<String>,
    pub stream_content_type: Option<&'static str>,
}

/// Everything extracted for one page.
#[derive(Debug, Clone, Default)]
pub struct MediaSet {
    pub images: Vec<MediaAsset>,
    pub audio: Vec<MediaAsset>,
    pub video: Vec<MediaAsset>,
    /// Large-image card requested by the entry's kind or format.
    pub large_image: bool,
    pub player: Option<PlayerCard>,
}

impl MediaSet {
    pub fn primary_image(&self) -> Option<&MediaAsset> {
        self.images.first()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.audio.is_empty() && self.video.is_empty()
    }

    /// Add an image unless one with the same canonical URL is present.
    pub fn push_image(&mut self, image: MediaAsset) -> bool {
        let key = image.canonical_url();
        if self.images.iter().any(|i| i.canonical_url() == key) {
            return false;
        }
        self.images.push(image);
        true
    }
}

/// Strip a `-WIDTHxHEIGHT` derivative suffix before the extension.
pub fn canonicalize(url: &str) -> Cow<'_, str> {
    RE_DERIVATIVE.replace(url, "$1")
}

/// Leading integer of an attribute value (`"640px"` -> 640). Zero if none.
pub fn intval(value: &str) -> u32 {
    let value = value.trim_start();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0)
}

// ============================================================================
// Extraction
// ============================================================================

/// Collect media for the scope's context.
pub fn extract(scope: &Scope<'_>) -> MediaSet {
    let mut media = MediaSet::default();
    let store = scope.store;

    match &scope.context {
        Context::Article { post_id } | Context::Attachment { post_id, .. } => {
            if let Some(post) = store.post(*post_id) {
                Extractor {
                    scope,
                    post,
                    media: &mut media,
                }
                .run();
            }
        }
        Context::Author { user_id } => {
            if let Some(url) = store
                .user(*user_id)
                .and_then(|user| store.avatar_url(user, AVATAR_SIZE))
            {
                media.push_image(MediaAsset::image(url, AVATAR_SIZE, AVATAR_SIZE, ""));
            }
        }
        _ => {}
    }

    if media.images.is_empty()
        && let Some(icon) = store.site().icon.and_then(|id| store.image(id))
    {
        crate::debug!("media"; "using site icon {}", icon.source_url);
        media.push_image(icon);
    }

    media
}

struct Extractor<'s, 'a> {
    scope: &'s Scope<'a>,
    post: &'a Post,
    media: &'s mut MediaSet,
}

impl<'a> Extractor<'_, 'a> {
    fn store(&self) -> &'a dyn ContentStore {
        self.scope.store
    }

    fn is_attachment(&self) -> bool {
        self.scope.context.is_attachment()
    }

    /// Attachment context of the given kind.
    fn is_attachment_of(&self, kind: MediaKind) -> bool {
        self.scope.context.attachment_kind() == Some(kind)
    }

    fn run(mut self) {
        self.primary_image();
        self.content_images();
        self.large_image();
        self.audio();
        self.video();
        self.embeds();
    }

    fn primary_image(&mut self) {
        let own = if self.is_attachment() {
            self.store().image(self.post.id)
        } else {
            None
        };
        let image = own.or_else(|| self.post.thumbnail.and_then(|id| self.store().image(id)));
        if let Some(image) = image {
            self.media.push_image(image);
        }
    }

    fn content_images(&mut self) {
        let post = self.post;
        if !(self.media.images.is_empty()
            || post.content.contains("[gallery")
            || post.has_format(&["gallery", "image"]))
        {
            return;
        }

        let store = self.store();
        for attachment in store.attached_media(post.id, MediaKind::Image) {
            if let Some(image) = store.image(attachment.id) {
                self.media.push_image(image);
            }
        }

        let rendered = shortcode::render_content(store, post);
        let uploads = store.site().uploads();
        for caps in RE_CONTENT_IMAGE.captures_iter(&rendered) {
            let Some(src) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            let image = self.content_image(src.as_str(), &uploads);
            if !self.media.push_image(image) {
                crate::debug!("media"; "skipped duplicate image {}", src.as_str());
            }
        }
    }

    /// Resolve a content `<img>` against the media library.
    ///
    /// Only local uploads can be resolved; others keep unknown dimensions.
    fn content_image(&self, src: &str, uploads: &str) -> MediaAsset {
        if !src.contains(uploads) {
            return MediaAsset::image(src, 0, 0, "");
        }
        let original = canonicalize(src);
        let relative = original
            .strip_prefix(uploads)
            .map(|path| path.trim_start_matches('/'))
            .unwrap_or(&original);

        let store = self.store();
        store
            .attachment_by_file(relative)
            .and_then(|attachment| store.image(attachment.id))
            .unwrap_or_else(|| MediaAsset::image(original.to_string(), 0, 0, ""))
    }

    fn large_image(&mut self) {
        if self.media.images.is_empty() {
            return;
        }
        let by_kind = self.is_attachment_of(MediaKind::Image);
        let by_format = self.post.is_single() && self.post.has_format(&["gallery", "image"]);
        if by_kind || by_format {
            self.media.large_image = true;
        }
    }

    /// Attachments to emit rows for: the attachment itself, or the media
    /// attached to a single entry of the matching format.
    fn media_attachments(&self, kind: MediaKind) -> Vec<&'a Post> {
        if self.is_attachment_of(kind) {
            vec![self.post]
        } else if self.post.is_single() && self.post.format() == Some(kind.as_str()) {
            self.store().attached_media(self.post.id, kind)
        } else {
            Vec::new()
        }
    }

    fn audio(&mut self) {
        let facebook = self.scope.audience.is_agent("facebook");
        for attachment in self.media_attachments(MediaKind::Audio) {
            let meta = attachment.attachment.clone().unwrap_or_default();
            let row = MediaAsset {
                source_url: self.store().embed_url(attachment),
                mime_type: mime::types::HTML.into(),
                kind: MediaKind::Audio,
                duration: meta.length,
                artist: meta.artist.clone(),
                album: meta.album.clone(),
                ..MediaAsset::default()
            };
            if let Some(url) = self.store().attachment_url(attachment) {
                let stream_type = if facebook {
                    mime::types::FACEBOOK_AUDIO.to_string()
                } else {
                    stream_type(attachment, &meta, MediaKind::Audio)
                };
                let stream = MediaAsset {
                    source_url: url,
                    mime_type: stream_type,
                    ..row.clone()
                };
                self.media.audio.extend([row, stream]);
            } else {
                self.media.audio.push(row);
            }
            self.backfill_image(attachment);
        }
    }

    fn video(&mut self) {
        for attachment in self.media_attachments(MediaKind::Video) {
            let meta = attachment.attachment.clone().unwrap_or_default();
            let embed_url = self.store().embed_url(attachment);
            let row = MediaAsset {
                source_url: embed_url.clone(),
                width: meta.width,
                height: meta.height,
                mime_type: mime::types::HTML.into(),
                kind: MediaKind::Video,
                duration: meta.length,
                ..MediaAsset::default()
            };
            let stream_url = self.store().attachment_url(attachment);
            match &stream_url {
                Some(url) => {
                    let stream = MediaAsset {
                        source_url: url.clone(),
                        mime_type: stream_type(attachment, &meta, MediaKind::Video),
                        ..row.clone()
                    };
                    self.media.video.extend([row, stream]);
                }
                None => self.media.video.push(row),
            }
            self.backfill_image(attachment);

            if self.media.player.is_none()
                && !self.scope.audience.requires_live_data()
                && self.scope.config.whitelist.twitter
                && self.scope.request.https
                && meta.fileformat.eq_ignore_ascii_case("mp4")
                && let Some(stream) = stream_url
            {
                self.media.player = Some(PlayerCard {
                    player: embed_url,
                    width: meta.width,
                    height: meta.height,
                    stream: Some(stream),
                    stream_content_type: Some(PLAYER_STREAM_TYPE),
                });
            }
        }
    }

    /// Use a media attachment's own thumbnail when nothing else was found.
    fn backfill_image(&mut self, attachment: &Post) {
        if !self.media.images.is_empty() || self.is_attachment() {
            return;
        }
        if let Some(image) = attachment.thumbnail.and_then(|id| self.store().image(id)) {
            self.media.push_image(image);
        }
    }

    fn embeds(&mut self) {
        let post = self.post;
        let kind = match post.format() {
            Some("audio") => MediaKind::Audio,
            Some("video") => MediaKind::Video,
            _ => return,
        };
        if !post.is_single() {
            return;
        }

        for url in shortcode::embed_urls(&post.content) {
            let Some(markup) = self.store().oembed(&url) else {
                crate::debug!("media"; "no embed markup for {}", url);
                continue;
            };
            let attrs = embed_attributes(&markup);
            let Some(src) = attrs.get("src").filter(|src| !src.is_empty()) else {
                crate::debug!("media"; "embed {} has no src", url);
                continue;
            };
            match kind {
                MediaKind::Audio => self.embedded_audio(src),
                _ => self.embedded_video(src, &attrs),
            }
        }
    }

    fn embedded_audio(&mut self, src: &str) {
        let mime_type = if self.scope.audience.is_agent("facebook") {
            mime::types::FACEBOOK_AUDIO
        } else {
            mime::types::HTML
        };
        self.media.audio.push(MediaAsset {
            source_url: src.to_string(),
            mime_type: mime_type.into(),
            kind: MediaKind::Audio,
            ..MediaAsset::default()
        });
    }

    fn embedded_video(&mut self, src: &str, attrs: &FxHashMap<String, String>) {
        let width = attrs.get("width").map_or(0, |w| intval(w));
        let height = attrs.get("height").map_or(0, |h| intval(h));
        self.media.video.push(MediaAsset {
            source_url: src.to_string(),
            width,
            height,
            mime_type: mime::types::HTML.into(),
            kind: MediaKind::Video,
            ..MediaAsset::default()
        });

        if self.media.player.is_none()
            && self.scope.request.https
            && !self.media.images.is_empty()
            && src.starts_with("https")
            && attrs.contains_key("width")
            && attrs.contains_key("height")
        {
            self.media.player = Some(PlayerCard {
                player: src.to_string(),
                width,
                height,
                stream: None,
                stream_content_type: None,
            });
        }
    }
}

/// Native stream type: `audio/<fileformat>`, falling back to the MIME type.
fn stream_type(attachment: &Post, meta: &AttachmentMeta, kind: MediaKind) -> String {
    if meta.fileformat.is_empty() {
        attachment.mime_type.clone()
    } else {
        format!("{}/{}", kind.as_str(), meta.fileformat.to_ascii_lowercase())
    }
}

/// `src`/`width`/`height` of an embed's markup, last occurrence wins.
fn embed_attributes(markup: &str) -> FxHashMap<String, String> {
    RE_EMBED_ATTR
        .captures_iter(markup)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3))?;
            Some((caps[1].to_ascii_lowercase(), value.as_str().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheManager;
    use crate::config::ShareableConfig;
    use crate::seo::{Engine, Request};
    use crate::site::SiteData;

    const FIXTURE: &str = r#"
[site]
name = "Media Lab"
home_url = "https://m.example"
language = "en"
icon = 190

[[posts]]
id = 100
slug = "inline"
title = "Inline"
content = '''<p><img src="https://m.example/wp-content/uploads/2024/05/local-300x200.jpg"></p>
<img src='https://cdn.other/remote.png'>
<img src="https://m.example/wp-content/uploads/2024/05/missing-150x150.jpg">'''

[[posts]]
id = 101
post_type = "attachment"
slug = "attached"
parent = 100
mime_type = "image/jpeg"
attachment = { file = "2024/05/attached.jpg", width = 1200, height = 600 }

[[posts]]
id = 102
post_type = "attachment"
slug = "local"
parent = 999
mime_type = "image/jpeg"
attachment = { file = "2024/05/local.jpg", width = 600, height = 400 }

[[posts]]
id = 110
slug = "thumbed"
content = '<img src="https://cdn.other/x.png">'
thumbnail = 102

[[posts]]
id = 120
slug = "picture"
format = "image"
thumbnail = 102

[[posts]]
id = 130
slug = "song-post"
format = "audio"

[[posts]]
id = 131
post_type = "attachment"
slug = "song"
parent = 130
mime_type = "audio/mpeg"
thumbnail = 132
attachment = { file = "2024/05/song.mp3", length = 215, artist = "Ada", album = "Engines", fileformat = "mp3" }

[[posts]]
id = 132
post_type = "attachment"
slug = "cover"
mime_type = "image/jpeg"
attachment = { file = "2024/05/cover.jpg", width = 500, height = 500 }

[[posts]]
id = 150
slug = "clip-post"
format = "video"
thumbnail = 151

[[posts]]
id = 151
post_type = "attachment"
slug = "wide"
parent = 150
mime_type = "image/jpeg"
attachment = { file = "2024/05/wide.jpg", width = 900, height = 300 }

[[posts]]
id = 152
post_type = "attachment"
slug = "clip"
parent = 150
mime_type = "video/mp4"
thumbnail = 132
attachment = { file = "2024/05/clip.mp4", width = 640, height = 360, length = 30, fileformat = "mp4" }

[[posts]]
id = 160
slug = "webm-post"
format = "video"
thumbnail = 151

[[posts]]
id = 161
post_type = "attachment"
slug = "webm"
parent = 160
mime_type = "video/webm"
attachment = { file = "2024/05/clip.webm", width = 640, height = 360, fileformat = "webm" }

[[posts]]
id = 170
slug = "embed-video"
format = "video"
thumbnail = 151
content = """
[embed]https://v.example/1[/embed]
[embed]https://v.example/nosrc[/embed]
[embed]https://v.example/unknown[/embed]
"""

[[posts]]
id = 180
slug = "embed-audio"
format = "audio"
content = "[embed]https://a.example/1[/embed]"

[[posts]]
id = 190
post_type = "attachment"
slug = "icon"
mime_type = "image/png"
attachment = { file = "2024/05/icon.png", width = 512, height = 512 }

[[posts]]
id = 195
slug = "plain"
content = "Just words."

[oembed]
"https://v.example/1" = '<iframe src="https://v.example/e/1" width="640" height="360"></iframe>'
"https://v.example/nosrc" = '<div class="player"></div>'
"https://a.example/1" = "<iframe src='https://a.example/e/1'></iframe>"
"#;

    const UPLOADS: &str = "https://m.example/wp-content/uploads";

    fn engine(whitelist: bool) -> Engine {
        let site = SiteData::parse(FIXTURE).unwrap();
        let mut config = ShareableConfig::default();
        config.whitelist.twitter = whitelist;
        Engine::new(site, config, CacheManager::memory(3600))
    }

    fn extract_for(engine: &Engine, uri: &str, https: bool, user_agent: &str) -> MediaSet {
        let request = Request {
            https,
            user_agent: user_agent.into(),
            ..Request::new(uri)
        };
        let state = engine.route(&request).unwrap();
        extract(&engine.scope(&request, &state))
    }

    fn urls(rows: &[MediaAsset]) -> Vec<&str> {
        rows.iter().map(|row| row.source_url.as_str()).collect()
    }

    mod images {
        use super::*;

        #[test]
        fn test_attached_then_content_images() {
            let media = extract_for(&engine(false), "/?p=100", false, "");
            assert_eq!(
                urls(&media.images),
                [
                    format!("{UPLOADS}/2024/05/attached.jpg"),
                    format!("{UPLOADS}/2024/05/local.jpg"),
                    "https://cdn.other/remote.png".to_string(),
                    format!("{UPLOADS}/2024/05/missing.jpg"),
                ]
            );
            // resolved through the media library
            assert_eq!((media.images[1].width, media.images[1].height), (600, 400));
            assert_eq!((media.images[2].width, media.images[2].height), (0, 0));
            assert_eq!((media.images[3].width, media.images[3].height), (0, 0));
            assert!(!media.large_image);
        }

        #[test]
        fn test_featured_image_skips_content() {
            let media = extract_for(&engine(false), "/?p=110", false, "");
            assert_eq!(urls(&media.images), [format!("{UPLOADS}/2024/05/local.jpg")]);
        }

        #[test]
        fn test_large_image_by_format_or_kind() {
            let engine = engine(false);
            assert!(extract_for(&engine, "/?p=120", false, "").large_image);
            assert!(extract_for(&engine, "/?p=101", false, "").large_image);
            assert!(!extract_for(&engine, "/?p=110", false, "").large_image);
        }

        #[test]
        fn test_site_icon_fallback() {
            let engine = engine(false);
            let icon = format!("{UPLOADS}/2024/05/icon.png");
            assert_eq!(urls(&extract_for(&engine, "/", false, "").images), [icon.as_str()]);
            assert_eq!(urls(&extract_for(&engine, "/?p=195", false, "").images), [icon.as_str()]);
            let media = extract_for(&engine, "/?p=110", false, "");
            assert!(media.images.iter().all(|image| image.source_url != icon));
        }
    }

    mod audio {
        use super::*;

        #[test]
        fn test_embedded_and_streamed_rows() {
            let media = extract_for(&engine(false), "/?p=130", false, "");
            assert_eq!(
                urls(&media.audio),
                [
                    "https://m.example/song-post/song/embed/".to_string(),
                    format!("{UPLOADS}/2024/05/song.mp3"),
                ]
            );
            assert_eq!(media.audio[0].mime_type, mime::types::HTML);
            assert_eq!(media.audio[1].mime_type, "audio/mp3");
            assert_eq!(media.audio[1].duration, 215);
            assert_eq!(media.audio[1].artist, "Ada");
            assert_eq!(media.audio[1].album, "Engines");
        }

        #[test]
        fn test_facebook_stream_type() {
            let media = extract_for(&engine(false), "/?p=130", false, "facebookexternalhit/1.1");
            assert_eq!(media.audio[1].mime_type, mime::types::FACEBOOK_AUDIO);
        }

        #[test]
        fn test_missing_image_backfilled_from_attachment() {
            let media = extract_for(&engine(false), "/?p=130", false, "");
            assert_eq!(urls(&media.images), [format!("{UPLOADS}/2024/05/cover.jpg")]);

            // a featured image is kept as the only image
            let media = extract_for(&engine(false), "/?p=150", true, "");
            assert_eq!(urls(&media.images), [format!("{UPLOADS}/2024/05/wide.jpg")]);
        }
    }

    mod video {
        use super::*;

        #[test]
        fn test_rows_and_player_card() {
            let media = extract_for(&engine(true), "/?p=150", true, "");
            assert_eq!(
                urls(&media.video),
                [
                    "https://m.example/clip-post/clip/embed/".to_string(),
                    format!("{UPLOADS}/2024/05/clip.mp4"),
                ]
            );
            assert_eq!(media.video[1].mime_type, "video/mp4");
            assert_eq!((media.video[0].width, media.video[0].height), (640, 360));

            let player = media.player.unwrap();
            assert_eq!(player.player, "https://m.example/clip-post/clip/embed/");
            assert_eq!((player.width, player.height), (640, 360));
            assert_eq!(player.stream.unwrap(), format!("{UPLOADS}/2024/05/clip.mp4"));
            assert_eq!(player.stream_content_type, Some(mime::types::MP4));
        }

        #[test]
        fn test_player_requires_https() {
            let media = extract_for(&engine(true), "/?p=150", false, "");
            assert_eq!(media.video.len(), 2);
            assert!(media.player.is_none());
        }

        #[test]
        fn test_player_requires_whitelist() {
            assert!(extract_for(&engine(false), "/?p=150", true, "").player.is_none());
        }

        #[test]
        fn test_player_requires_mp4() {
            let media = extract_for(&engine(true), "/?p=160", true, "");
            assert_eq!(media.video[1].mime_type, "video/webm");
            assert!(media.player.is_none());
        }

        #[test]
        fn test_no_player_for_live_data_agents() {
            let media = extract_for(&engine(true), "/?p=150", true, "Googlebot/2.1");
            assert!(media.player.is_none());
        }
    }

    mod embeds {
        use super::*;

        #[test]
        fn test_embed_video_resolution() {
            let media = extract_for(&engine(false), "/?p=170", true, "");
            assert_eq!(urls(&media.video), ["https://v.example/e/1"]);
            assert_eq!((media.video[0].width, media.video[0].height), (640, 360));

            let player = media.player.unwrap();
            assert_eq!(player.player, "https://v.example/e/1");
            assert!(player.stream.is_none());
        }

        #[test]
        fn test_embed_player_requires_https() {
            let media = extract_for(&engine(false), "/?p=170", false, "");
            assert_eq!(media.video.len(), 1);
            assert!(media.player.is_none());
        }

        #[test]
        fn test_embed_audio() {
            let engine = engine(false);
            let media = extract_for(&engine, "/?p=180", false, "");
            assert_eq!(urls(&media.audio), ["https://a.example/e/1"]);
            assert_eq!(media.audio[0].mime_type, mime::types::HTML);

            let media = extract_for(&engine, "/?p=180", false, "Facebot");
            assert_eq!(media.audio[0].mime_type, mime::types::FACEBOOK_AUDIO);
        }
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(
            canonicalize("https://s.example/u/2024/a-300x200.jpg"),
            "https://s.example/u/2024/a.jpg"
        );
        assert_eq!(canonicalize("https://s.example/a-1x1.PNG"), "https://s.example/a.PNG");
        assert_eq!(canonicalize("https://s.example/a-300x200.webp"), "https://s.example/a-300x200.webp");
        assert_eq!(canonicalize("https://s.example/a-300x200b.jpg"), "https://s.example/a-300x200b.jpg");
    }

    #[test]
    fn test_push_image_dedups_derivatives() {
        let mut media = MediaSet::default();
        assert!(media.push_image(MediaAsset::image("https://s.example/a.jpg", 900, 300, "image/jpeg")));
        assert!(!media.push_image(MediaAsset::image("https://s.example/a-150x150.jpg", 0, 0, "")));
        assert!(media.push_image(MediaAsset::image("https://s.example/b.jpg", 0, 0, "")));
        assert_eq!(media.images.len(), 2);
        assert_eq!(media.images[0].width, 900);
    }

    #[test]
    fn test_intval() {
        assert_eq!(intval("640"), 640);
        assert_eq!(intval(" 360px"), 360);
        assert_eq!(intval("auto"), 0);
        assert_eq!(intval(""), 0);
    }

    #[test]
    fn test_embed_attributes() {
        let attrs = embed_attributes(
            r#"<iframe SRC='https://p.example/e/1' width="640" height="360" frameborder="0"></iframe>"#,
        );
        assert_eq!(attrs["src"], "https://p.example/e/1");
        assert_eq!(attrs["width"], "640");
        assert!(!attrs.contains_key("frameborder"));
    }

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("audio/mpeg"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
    }
}
