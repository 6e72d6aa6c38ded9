//! Ordered metadata map.
//!
//! Keys keep the position of their first insertion; overwriting a value
//! does not move it. Render order is map order, so golden output depends
//! on it.
//!
//! Media rows live under `image_src`, `audio_src` and `video_src` as
//! per-asset records. The auxiliary parallel columns (`image_width`,
//! `audio_artist`, ...) are derived from those records by [`MetaMap::column`],
//! so the columns of one family always have equal length.

use rustc_hash::FxHashMap;

use super::media::MediaAsset;

/// Media families stored as records, keyed `<family>_src`.
pub const MEDIA_FAMILIES: [&str; 3] = ["image", "audio", "video"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Text(String),
    /// Each item renders as its own tag.
    List(Vec<String>),
    /// Media rows of one family.
    Media(Vec<MediaAsset>),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Media(rows) => rows.is_empty(),
        }
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<MediaAsset>> for MetaValue {
    fn from(value: Vec<MediaAsset>) -> Self {
        Self::Media(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaMap {
    entries: Vec<(String, MetaValue)>,
    index: FxHashMap<String, usize>,
}

impl MetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Append to a list value, creating it (or promoting a text value) as needed.
    pub fn push(&mut self, key: &str, item: impl Into<String>) {
        let item = item.into();
        match self.get_mut(key) {
            Some(MetaValue::List(items)) => items.push(item),
            Some(value @ MetaValue::Text(_)) => {
                if let MetaValue::Text(first) = std::mem::replace(value, MetaValue::List(Vec::new()))
                {
                    *value = MetaValue::List(vec![first, item]);
                }
            }
            Some(MetaValue::Media(_)) => {}
            None => self.insert(key, vec![item]),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut MetaValue> {
        self.index.get(key).map(|&i| &mut self.entries[i].1)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_text)
    }

    /// Media rows under `key`, empty if absent.
    pub fn media(&self, key: &str) -> &[MediaAsset] {
        match self.get(key) {
            Some(MetaValue::Media(rows)) => rows,
            _ => &[],
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for position in self.index.values_mut() {
            if *position > i {
                *position -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parallel column of a media family, e.g. `image_width` or `audio_album`.
    ///
    /// Unknown values (zero dimensions, missing MIME type) are empty strings.
    /// Returns `None` for keys that are not media columns.
    pub fn column(&self, key: &str) -> Option<Vec<String>> {
        let (family, field) = key.split_once('_')?;
        if !MEDIA_FAMILIES.contains(&family) {
            return None;
        }
        let rows = self.media(&format!("{family}_src"));
        let cell: fn(&MediaAsset) -> String = match field {
            "src" => |row: &MediaAsset| row.source_url.clone(),
            "width" => |row: &MediaAsset| nonzero(row.width),
            "height" => |row: &MediaAsset| nonzero(row.height),
            "type" => |row: &MediaAsset| row.mime_type.clone(),
            "duration" => |row: &MediaAsset| nonzero(row.duration),
            "artist" => |row: &MediaAsset| row.artist.clone(),
            "album" => |row: &MediaAsset| row.album.clone(),
            _ => return None,
        };
        Some(rows.iter().map(cell).collect())
    }
}

fn nonzero(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut meta = MetaMap::new();
        meta.insert("og:site_name", "Site");
        meta.insert("og:type", "website");
        meta.insert("twitter:card", "summary");
        meta.insert("og:type", "article");
        let keys: Vec<_> = meta.keys().collect();
        assert_eq!(keys, ["og:site_name", "og:type", "twitter:card"]);
        assert_eq!(meta.text("og:type"), Some("article"));
    }

    #[test]
    fn test_remove_reindexes() {
        let mut meta = MetaMap::new();
        meta.insert("a", "1");
        meta.insert("b", "2");
        meta.insert("c", "3");
        assert!(meta.remove("a").is_some());
        meta.insert("c", "4");
        assert_eq!(meta.text("c"), Some("4"));
        assert_eq!(meta.keys().collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn test_push_promotes_text() {
        let mut meta = MetaMap::new();
        meta.push("article:tag", "rust");
        meta.push("article:tag", "cache");
        meta.insert("keywords", "a");
        meta.push("keywords", "b");
        assert_eq!(
            meta.get("article:tag"),
            Some(&MetaValue::List(vec!["rust".into(), "cache".into()]))
        );
        assert_eq!(
            meta.get("keywords"),
            Some(&MetaValue::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_columns_stay_parallel() {
        let mut meta = MetaMap::new();
        meta.insert(
            "image_src",
            vec![
                MediaAsset::image("https://s.example/a.jpg", 900, 300, "image/jpeg"),
                MediaAsset::image("https://x.example/b.png", 0, 0, ""),
            ],
        );
        assert_eq!(meta.column("image_width").unwrap(), ["900", ""]);
        assert_eq!(meta.column("image_type").unwrap(), ["image/jpeg", ""]);
        assert_eq!(meta.column("video_width").unwrap(), Vec::<String>::new());
        assert!(meta.column("image_colour").is_none());
        assert!(meta.column("og:title").is_none());
    }
}
