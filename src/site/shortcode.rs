//! Shortcode handling for post content.
//!
//! Only the shortcodes that influence metadata are understood:
//! `[gallery]` expands into thumbnail `<img>` tags, `[caption]` unwraps to
//! its inner markup and `[embed]URL[/embed]` URLs can be listed. Everything
//! else is left as-is by [`render_content`] and removed by
//! [`strip_shortcodes`].

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::{ContentStore, Post, PostId};
use crate::seo::media::MediaKind;
use crate::utils::html::{escape_attr, parse_attributes};

/// Size of the thumbnail derivative a gallery renders.
pub const THUMBNAIL_SIZE: u32 = 150;

/// Shortcodes removed from descriptions.
const STRIPPED_TAGS: [&str; 6] = ["gallery", "caption", "embed", "audio", "video", "playlist"];

static RE_GALLERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[gallery\b([^\]]*)\]").unwrap());
static RE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[caption\b[^\]]*\](.*?)\[/caption\]").unwrap());
static RE_EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)\[embed[^\]]*\](.*?)\[/embed\]").unwrap());

/// `(enclosing, self-closing)` pattern pair per stripped tag.
static RE_STRIP: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    STRIPPED_TAGS
        .iter()
        .map(|tag| {
            let enclosing = Regex::new(&format!(r"(?s)\[{tag}\b[^\]]*\].*?\[/{tag}\]")).unwrap();
            let single = Regex::new(&format!(r"\[{tag}\b[^\]]*\]")).unwrap();
            (enclosing, single)
        })
        .collect()
});

/// Content of `post` with gallery and caption shortcodes expanded.
pub fn render_content(store: &dyn ContentStore, post: &Post) -> String {
    let content = RE_GALLERY.replace_all(&post.content, |caps: &Captures| {
        render_gallery(store, post, &caps[1])
    });
    RE_CAPTION.replace_all(&content, "$1").into_owned()
}

/// Remove metadata-irrelevant shortcodes, including enclosed content.
pub fn strip_shortcodes(content: &str) -> String {
    if !content.contains('[') {
        return content.to_string();
    }
    RE_STRIP
        .iter()
        .fold(content.to_string(), |acc, (enclosing, single)| {
            let acc = enclosing.replace_all(&acc, "");
            single.replace_all(&acc, "").into_owned()
        })
}

/// URLs wrapped in `[embed]...[/embed]`, in document order.
pub fn embed_urls(content: &str) -> Vec<String> {
    RE_EMBED
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Thumbnail markup for one gallery shortcode.
///
/// `ids="1,2"` lists attachments explicitly; without it every image
/// attached to `post` is shown.
fn render_gallery(store: &dyn ContentStore, post: &Post, attrs: &str) -> String {
    let ids: Vec<PostId> = parse_attributes(attrs)
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("ids"))
        .map(|(_, value)| {
            value
                .split(',')
                .filter_map(|id| id.trim().parse().ok())
                .collect()
        })
        .unwrap_or_else(|| {
            store
                .attached_media(post.id, MediaKind::Image)
                .iter()
                .map(|attachment| attachment.id)
                .collect()
        });

    ids.into_iter()
        .filter_map(|id| store.post(id))
        .filter(|attachment| attachment.media_kind() == Some(MediaKind::Image))
        .filter_map(|attachment| {
            let meta = attachment.attachment.as_ref()?;
            let file = derivative_file(&meta.file, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
            Some(format!(
                r#"<img src="{}/{}" width="{THUMBNAIL_SIZE}" height="{THUMBNAIL_SIZE}" alt="{}"/>"#,
                store.site().uploads(),
                file,
                escape_attr(&attachment.title)
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name of a resized copy: `a/photo.jpg` -> `a/photo-150x150.jpg`.
pub fn derivative_file(file: &str, width: u32, height: u32) -> String {
    let name_start = file.rfind('/').map_or(0, |i| i + 1);
    match file[name_start..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = file.split_at(name_start + dot);
            format!("{stem}-{width}x{height}{ext}")
        }
        None => format!("{file}-{width}x{height}"),
    }
}
