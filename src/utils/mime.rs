//! MIME type detection utilities.
//!
//! Provides consistent MIME type detection across the codebase.

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html";

    // Web feeds
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";
    pub const RDF: &str = "application/rdf+xml";

    // Binary
    pub const OCTET_STREAM: &str = "application/octet-stream";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";

    // Audio
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const FLAC: &str = "audio/flac";
    pub const AAC: &str = "audio/aac";

    /// Audio type Facebook requires for shared audio streams.
    pub const FACEBOOK_AUDIO: &str = "audio/vnd.facebook.bridge";

    // Video
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";
    pub const OGG_VIDEO: &str = "video/ogg";
    pub const MOV: &str = "video/quicktime";
}

/// Guess MIME type from a file extension string.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext.map(str::to_ascii_lowercase).as_deref() {
        // Images
        Some("svg") => types::SVG,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("ico") => types::ICO,

        // Audio
        Some("mp3") => types::MP3,
        Some("wav") => types::WAV,
        Some("ogg" | "oga") => types::OGG_AUDIO,
        Some("flac") => types::FLAC,
        Some("aac" | "m4a") => types::AAC,

        // Video
        Some("mp4" | "m4v") => types::MP4,
        Some("webm") => types::WEBM,
        Some("ogv") => types::OGG_VIDEO,
        Some("mov") => types::MOV,

        _ => types::OCTET_STREAM,
    }
}

/// Guess MIME type from the extension of a URL or file path.
///
/// Query strings and fragments are ignored.
pub fn from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    from_extension(file.rsplit_once('.').map(|(_, ext)| ext))
}

/// Content type of a syndication feed type id (`rss2`, `atom`, `rdf`).
pub fn for_feed(feed: &str) -> &'static str {
    match feed {
        "atom" => types::ATOM,
        "rdf" => types::RDF,
        _ => types::RSS,
    }
}

/// Check if the MIME type represents an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Check if the MIME type represents audio.
pub fn is_audio(mime: &str) -> bool {
    mime.starts_with("audio/")
}

/// Check if the MIME type represents video.
pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(from_url("https://a.test/u/photo.JPG"), types::JPEG);
        assert_eq!(from_url("https://a.test/u/song.mp3?v=2"), types::MP3);
        assert_eq!(from_url("https://a.test/u/clip.mp4#t=3"), types::MP4);
        assert_eq!(from_url("https://a.test/u/"), types::OCTET_STREAM);
    }

    #[test]
    fn test_for_feed() {
        assert_eq!(for_feed("rss2"), types::RSS);
        assert_eq!(for_feed("atom"), types::ATOM);
        assert_eq!(for_feed("rdf"), types::RDF);
    }

    #[test]
    fn test_is_media() {
        assert!(is_image(types::PNG));
        assert!(is_audio(types::MP3));
        assert!(is_video(types::MP4));
        assert!(!is_image(types::HTML));
    }
}
