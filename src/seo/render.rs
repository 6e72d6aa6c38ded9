//! Tag renderer.
//!
//! Serializes a [`MetaMap`] into head markup, one or more tags per value,
//! in map order. The syntax is picked from the key:
//!
//! | Key                         | Output                                   |
//! |-----------------------------|------------------------------------------|
//! | `image_width`, `audio_album`, ... | nothing (read by the `_src` key)   |
//! | `image_src`                 | `<link rel="image_src">` + `og:image*`   |
//! | `audio_src`                 | `og:audio*` + `music:*`                  |
//! | `video_src`                 | `og:video*`                              |
//! | `link:<rel>`                | `<link rel="<rel>" href=..>`             |
//! | `item:<prop>`               | `<meta itemprop="<prop>" ..>`            |
//! | `property:<p>`              | `<meta property="<p>" ..>`               |
//! | `og:`, `fb:`, `article:`, `profile:` | `<meta property=.. ..>`         |
//! | anything else               | `<meta name=.. ..>`                      |

use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

use super::hooks::Interceptors;
use super::meta::{MetaMap, MetaValue};
use crate::utils::html::escape_attr;

static RE_AUXILIARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(image_(width|height|type)|video_(width|height|duration|type)|audio_(type|duration|artist|album))$",
    )
    .unwrap()
});

/// Vocabularies rendered with `property=` without an explicit prefix.
const PROPERTY_VOCABULARIES: [&str; 4] = ["fb:", "og:", "article:", "profile:"];

/// One value about to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'t> {
    pub key: &'t str,
    pub value: &'t str,
    /// Position within a list or media value; 0 for text.
    pub index: usize,
    /// The whole map, for sibling lookups.
    pub meta: &'t MetaMap,
}

impl Tag<'_> {
    /// Value of a parallel column at this tag's index.
    fn sibling(&self, column: &str) -> String {
        self.meta
            .column(column)
            .and_then(|cells| cells.into_iter().nth(self.index))
            .unwrap_or_default()
    }
}

/// Keys that only carry data for their `_src` sibling.
pub fn is_auxiliary(key: &str) -> bool {
    RE_AUXILIARY.is_match(key)
}

/// Render every value of `meta` through the tag interceptors.
pub fn render(meta: &MetaMap, hooks: &Interceptors) -> String {
    let mut out = String::new();
    for (key, value) in meta.iter() {
        match value {
            MetaValue::Text(text) => out.push_str(&hooks.apply_tag(&Tag {
                key,
                value: text,
                index: 0,
                meta,
            })),
            MetaValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    out.push_str(&hooks.apply_tag(&Tag {
                        key,
                        value: item,
                        index,
                        meta,
                    }));
                }
            }
            MetaValue::Media(rows) => {
                for (index, row) in rows.iter().enumerate() {
                    out.push_str(&hooks.apply_tag(&Tag {
                        key,
                        value: &row.source_url,
                        index,
                        meta,
                    }));
                }
            }
        }
    }
    out
}

/// Built-in markup for one tag.
pub fn render_tag(tag: &Tag<'_>) -> String {
    let key = tag.key;
    let value = escape_attr(tag.value);

    if is_auxiliary(key) {
        return String::new();
    }
    match key {
        "image_src" => return render_image(tag),
        "audio_src" => return render_audio(tag),
        "video_src" => return render_video(tag),
        _ => {}
    }
    if let Some(rel) = key.strip_prefix("link:") {
        return format!("<link rel=\"{}\" href=\"{value}\"/>\n", escape_attr(rel));
    }
    if let Some(prop) = key.strip_prefix("item:") {
        return format!("<meta itemprop=\"{}\" content=\"{value}\"/>\n", escape_attr(prop));
    }
    if let Some(prop) = key.strip_prefix("property:") {
        return format!("<meta property=\"{}\" content=\"{value}\"/>\n", escape_attr(prop));
    }
    if PROPERTY_VOCABULARIES.iter().any(|p| key.starts_with(p)) {
        return format!("<meta property=\"{}\" content=\"{value}\"/>\n", escape_attr(key));
    }
    format!("<meta name=\"{}\" content=\"{value}\"/>\n", escape_attr(key))
}

fn property(out: &mut String, name: &str, content: &str) {
    let _ = writeln!(
        out,
        "<meta property=\"{name}\" content=\"{}\"/>",
        escape_attr(content)
    );
}

/// Property tag emitted only for a non-empty value.
fn optional(out: &mut String, name: &str, content: &str) {
    if !content.is_empty() {
        property(out, name, content);
    }
}

/// `url` and `secure_url` tags shared by every media family.
fn media_urls(out: &mut String, family: &str, value: &str) {
    property(out, &format!("og:{family}"), value);
    property(out, &format!("og:{family}:url"), value);
    if value.starts_with("https:") {
        property(out, &format!("og:{family}:secure_url"), value);
    }
}

fn render_image(tag: &Tag<'_>) -> String {
    let width = tag.sibling("image_width");
    let height = tag.sibling("image_height");
    let mime_type = tag.sibling("image_type");

    let mut out = format!("<link rel=\"image_src\" href=\"{}\"", escape_attr(tag.value));
    if !mime_type.is_empty() {
        let _ = write!(out, " type=\"{}\"", escape_attr(&mime_type));
    }
    // `sizes` is height first
    if !width.is_empty() && !height.is_empty() {
        let _ = write!(out, " sizes=\"{height}x{width}\"");
    }
    out.push_str("/>\n");

    media_urls(&mut out, "image", tag.value);
    optional(&mut out, "og:image:type", &mime_type);
    optional(&mut out, "og:image:width", &width);
    optional(&mut out, "og:image:height", &height);
    out
}

fn render_audio(tag: &Tag<'_>) -> String {
    let mut out = String::new();
    media_urls(&mut out, "audio", tag.value);
    optional(&mut out, "og:audio:type", &tag.sibling("audio_type"));
    optional(&mut out, "music:duration", &tag.sibling("audio_duration"));
    optional(&mut out, "music:musician", &tag.sibling("audio_artist"));
    optional(&mut out, "music:album", &tag.sibling("audio_album"));
    out
}

fn render_video(tag: &Tag<'_>) -> String {
    let mut out = String::new();
    media_urls(&mut out, "video", tag.value);
    optional(&mut out, "og:video:type", &tag.sibling("video_type"));
    optional(&mut out, "og:video:width", &tag.sibling("video_width"));
    optional(&mut out, "og:video:height", &tag.sibling("video_height"));
    optional(&mut out, "og:video:duration", &tag.sibling("video_duration"));
    out
}
