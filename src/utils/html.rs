//! HTML utility functions.
//!
//! Provides common HTML processing functions:
//! - `escape_attr()` - HTML entity escaping
//! - `strip_tags()`, `strip_all_tags()` - markup removal for plain-text fields
//! - `parse_attributes()` - HTML attribute string parsing

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML attribute values.
///
/// Borrows the input when nothing needs escaping.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Markup Removal
// =============================================================================

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static RE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*?>.*?</script>").unwrap());
static RE_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*?>.*?</style>").unwrap());

/// Remove every tag (and comment) from a fragment, keeping the text between.
pub fn strip_tags(s: &str) -> Cow<'_, str> {
    if !s.contains('<') {
        return Cow::Borrowed(s);
    }
    RE_TAG.replace_all(s, "")
}

/// Remove tags including `<script>`/`<style>` bodies, then trim.
pub fn strip_all_tags(s: &str) -> String {
    let without_scripts = RE_SCRIPT.replace_all(s, "");
    let without_styles = RE_STYLE.replace_all(&without_scripts, "");
    strip_tags(&without_styles).trim().to_string()
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Parse HTML-style attributes from a string.
///
/// Input: `src="https://x" width="640" allowfullscreen`
/// Output: `vec![("src", "https://x"), ("width", "640"), ("allowfullscreen", "")]`
pub fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next.is_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        // Skip whitespace
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        // Check for value
        if chars.peek() == Some(&'=') {
            chars.next(); // consume '='

            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }

            let value = match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    let mut val = String::new();
                    for c in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        val.push(c);
                    }
                    val
                }
                _ => {
                    // Unquoted value (read until whitespace)
                    let mut val = String::new();
                    while let Some(&c) = chars.peek() {
                        if c.is_whitespace() {
                            break;
                        }
                        val.push(c);
                        chars.next();
                    }
                    val
                }
            };

            attrs.push((name, value));
        } else {
            // Boolean attribute (no value)
            attrs.push((name, String::new()));
        }
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("<b>\"hi\" & 'yo'</b>"), "&lt;b&gt;&quot;hi&quot; &amp; &#39;yo&#39;&lt;/b&gt;");
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <em>world</em></p>"), "Hello world");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("before<!--more-->after"), "beforeafter");
    }

    #[test]
    fn test_strip_all_tags_drops_script_bodies() {
        let html = "  <script>alert(1)</script><style>p{}</style><p>Text</p>  ";
        assert_eq!(strip_all_tags(html), "Text");
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"src="https://x" width='640' height=360 allowfullscreen"#);
        assert_eq!(
            attrs,
            vec![
                ("src".to_string(), "https://x".to_string()),
                ("width".to_string(), "640".to_string()),
                ("height".to_string(), "360".to_string()),
                ("allowfullscreen".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_self_closing() {
        let attrs = parse_attributes(r#"src="a.png" /"#);
        assert_eq!(attrs, vec![("src".to_string(), "a.png".to_string())]);
    }
}
