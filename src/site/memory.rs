//! Fixture-backed content store.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Field Notes"
//! home_url = "https://notes.example"
//! language = "en-US"
//!
//! [[posts]]
//! id = 10
//! slug = "hello"
//! title = "Hello"
//! content = "First paragraph.\n\nSecond."
//! thumbnail = 11
//!
//! [[posts]]
//! id = 11
//! post_type = "attachment"
//! parent = 10
//! mime_type = "image/jpeg"
//! attachment = { file = "2024/06/hello.jpg", width = 900, height = 300 }
//!
//! [oembed]
//! "https://video.example/v/1" = '<iframe src="https://video.example/e/1" width="640" height="360"></iframe>'
//! ```

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use super::{ContentStore, Post, PostId, PostType, SiteInfo, Taxonomy, Term, TermId, User, UserId};
use crate::seo::media::MediaKind;

/// Serialized shape of a content fixture.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawSite {
    site: SiteInfo,
    posts: Vec<Post>,
    users: Vec<User>,
    taxonomies: Vec<Taxonomy>,
    terms: Vec<Term>,
    post_types: Vec<PostType>,
    oembed: FxHashMap<String, String>,
}

/// In-memory [`ContentStore`] loaded from a TOML fixture.
#[derive(Debug, Default)]
pub struct SiteData {
    site: SiteInfo,
    posts: Vec<Post>,
    users: Vec<User>,
    taxonomies: Vec<Taxonomy>,
    terms: Vec<Term>,
    post_types: Vec<PostType>,
    oembed: FxHashMap<String, String>,
    post_index: FxHashMap<PostId, usize>,
    user_index: FxHashMap<UserId, usize>,
    term_index: FxHashMap<TermId, usize>,
}

impl SiteData {
    /// Load a content fixture from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read content file `{}`", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse content file `{}`", path.display()))
    }

    /// Parse a content fixture from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawSite = toml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSite) -> Self {
        let mut data = Self {
            site: raw.site,
            posts: raw.posts,
            users: raw.users,
            taxonomies: raw.taxonomies,
            terms: raw.terms,
            post_types: raw.post_types,
            oembed: raw.oembed,
            ..Self::default()
        };
        data.register_builtins();
        data.reindex();
        data
    }

    /// Built-in taxonomies and post types unless the fixture redefines them.
    fn register_builtins(&mut self) {
        let builtin_taxonomies = [
            ("category", "Categories", "Category", true),
            ("post_tag", "Tags", "Tag", false),
        ];
        for (position, (name, label, singular, hierarchical)) in
            builtin_taxonomies.into_iter().enumerate()
        {
            if self.taxonomies.iter().all(|t| t.name != name) {
                self.taxonomies.insert(
                    position,
                    Taxonomy {
                        name: name.into(),
                        label: label.into(),
                        singular_label: singular.into(),
                        hierarchical,
                        ..Taxonomy::default()
                    },
                );
            }
        }

        for (name, label) in [("post", "Posts"), ("page", "Pages"), ("attachment", "Media")] {
            if self.post_types.iter().all(|t| t.name != name) {
                self.post_types.push(PostType {
                    name: name.into(),
                    label: label.into(),
                    description: String::new(),
                });
            }
        }
    }

    fn reindex(&mut self) {
        self.post_index = self.posts.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        self.user_index = self.users.iter().enumerate().map(|(i, u)| (u.id, i)).collect();
        self.term_index = self.terms.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
    }

    /// Add or replace a post (used by tests and fixture builders).
    pub fn insert_post(&mut self, post: Post) {
        match self.post_index.get(&post.id) {
            Some(&i) => self.posts[i] = post,
            None => {
                self.post_index.insert(post.id, self.posts.len());
                self.posts.push(post);
            }
        }
    }
}

impl ContentStore for SiteData {
    fn site(&self) -> &SiteInfo {
        &self.site
    }

    fn post(&self, id: PostId) -> Option<&Post> {
        self.post_index.get(&id).map(|&i| &self.posts[i])
    }

    fn attached_media(&self, parent: PostId, kind: MediaKind) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.parent == Some(parent) && p.media_kind() == Some(kind))
            .collect()
    }

    fn attachment_by_file(&self, file: &str) -> Option<&Post> {
        self.posts.iter().find(|p| {
            p.is_attachment() && p.attachment.as_ref().is_some_and(|meta| meta.file == file)
        })
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.user_index.get(&id).map(|&i| &self.users[i])
    }

    fn user_by_nicename(&self, nicename: &str) -> Option<&User> {
        self.users.iter().find(|u| u.nicename == nicename)
    }

    fn term(&self, id: TermId) -> Option<&Term> {
        self.term_index.get(&id).map(|&i| &self.terms[i])
    }

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Option<&Term> {
        self.terms
            .iter()
            .find(|t| t.taxonomy == taxonomy && t.slug == slug)
    }

    fn taxonomies(&self) -> Vec<&Taxonomy> {
        self.taxonomies.iter().collect()
    }

    fn taxonomy(&self, name: &str) -> Option<&Taxonomy> {
        self.taxonomies.iter().find(|t| t.name == name)
    }

    fn post_type(&self, name: &str) -> Option<&PostType> {
        self.post_types.iter().find(|t| t.name == name)
    }

    fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    fn oembed(&self, url: &str) -> Option<String> {
        self.oembed.get(url.trim()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
[site]
name = "Field Notes"
home_url = "https://notes.example/"
language = "en-US"

[[posts]]
id = 10
slug = "hello"
title = "Hello"
thumbnail = 11
terms = [1]

[[posts]]
id = 11
post_type = "attachment"
slug = "hello-jpg"
parent = 10
mime_type = "image/jpeg"
attachment = { file = "2024/06/hello.jpg", width = 900, height = 300 }

[[terms]]
id = 1
taxonomy = "category"
name = "News"
slug = "news"
"#;

    #[test]
    fn test_load_fixture() {
        let site = SiteData::parse(FIXTURE).unwrap();
        assert_eq!(site.site().home(), "https://notes.example");
        assert_eq!(site.post(10).unwrap().title, "Hello");
        assert_eq!(site.post(10).unwrap().post_type, "post");
        assert!(site.post(99).is_none());
    }

    #[test]
    fn test_builtin_taxonomies_come_first() {
        let site = SiteData::parse(FIXTURE).unwrap();
        let names: Vec<_> = site.taxonomies().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["category", "post_tag"]);
        assert!(site.taxonomy("category").unwrap().hierarchical);
        assert!(site.post_type("page").is_some());
    }

    #[test]
    fn test_links() {
        let site = SiteData::parse(FIXTURE).unwrap();
        let post = site.post(10).unwrap();
        let attachment = site.post(11).unwrap();
        assert_eq!(site.permalink(post), "https://notes.example/hello/");
        assert_eq!(site.permalink(attachment), "https://notes.example/hello/hello-jpg/");
        assert_eq!(site.embed_url(attachment), "https://notes.example/hello/hello-jpg/embed/");
        assert_eq!(
            site.attachment_url(attachment).unwrap(),
            "https://notes.example/wp-content/uploads/2024/06/hello.jpg"
        );
        assert_eq!(site.term_link(site.term(1).unwrap()), "https://notes.example/category/news/");
        assert_eq!(site.search_link("a b"), "https://notes.example/search/a%20b/");
    }

    #[test]
    fn test_image_lookup() {
        let site = SiteData::parse(FIXTURE).unwrap();
        let image = site.image(11).unwrap();
        assert_eq!(image.width, 900);
        assert_eq!(image.mime_type, "image/jpeg");
        assert!(site.image(10).is_none());
    }

    #[test]
    fn test_attached_media_and_file_lookup() {
        let site = SiteData::parse(FIXTURE).unwrap();
        assert_eq!(site.attached_media(10, MediaKind::Image).len(), 1);
        assert!(site.attached_media(10, MediaKind::Audio).is_empty());
        assert_eq!(site.attachment_by_file("2024/06/hello.jpg").unwrap().id, 11);
    }

    #[test]
    fn test_post_terms() {
        let site = SiteData::parse(FIXTURE).unwrap();
        let post = site.post(10).unwrap();
        assert_eq!(site.post_terms(post, "category")[0].name, "News");
        assert!(site.post_terms(post, "post_tag").is_empty());
    }
}
