//! Social identity cleaners.
//!
//! Profile fields hold whatever the user typed: a bare name, an `@handle`
//! or a full profile URL. Each cleaner reduces the input to the account
//! name and re-emits it in the requested form.

use regex::Regex;
use std::sync::LazyLock;

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").unwrap());

const TWITTER_URL: &str = "https://twitter.com/";
const FACEBOOK_URL: &str = "https://www.facebook.com/";
const GOOGLE_URL: &str = "https://plus.google.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// Account name only.
    Name,
    /// `@name` (twitter only; other networks return the name).
    Handle,
    /// Profile URL.
    Url,
}

/// Last path component, ignoring trailing slashes.
fn basename(value: &str) -> &str {
    let trimmed = value.trim().trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub fn clean_twitter(value: &str, form: Form) -> String {
    let name = RE_NON_WORD.replace_all(basename(value), "");
    if name.is_empty() {
        return String::new();
    }
    match form {
        Form::Name => name.into_owned(),
        Form::Handle => format!("@{name}"),
        Form::Url => format!("{TWITTER_URL}{name}"),
    }
}

pub fn clean_facebook(value: &str, form: Form) -> String {
    let name = basename(value);
    match form {
        _ if name.is_empty() => String::new(),
        Form::Url => format!("{FACEBOOK_URL}{name}"),
        Form::Name | Form::Handle => name.to_string(),
    }
}

/// Google names always carry a `+` prefix.
pub fn clean_google(value: &str, form: Form) -> String {
    let name = basename(value);
    if name.is_empty() {
        return String::new();
    }
    let name = if name.starts_with('+') {
        name.to_string()
    } else {
        format!("+{name}")
    };
    match form {
        Form::Url => format!("{GOOGLE_URL}{name}"),
        Form::Name | Form::Handle => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitter_forms() {
        assert_eq!(clean_twitter("@ada", Form::Handle), "@ada");
        assert_eq!(clean_twitter("https://twitter.com/ada/", Form::Handle), "@ada");
        assert_eq!(clean_twitter("ada.l", Form::Name), "adal");
        assert_eq!(clean_twitter("ada", Form::Url), "https://twitter.com/ada");
        assert_eq!(clean_twitter("@", Form::Handle), "");
    }

    #[test]
    fn test_facebook_forms() {
        assert_eq!(
            clean_facebook("https://www.facebook.com/fieldnotes", Form::Url),
            "https://www.facebook.com/fieldnotes"
        );
        assert_eq!(clean_facebook("fieldnotes", Form::Name), "fieldnotes");
        assert_eq!(clean_facebook("", Form::Url), "");
    }

    #[test]
    fn test_google_prefix() {
        assert_eq!(clean_google("ada", Form::Name), "+ada");
        assert_eq!(clean_google("https://plus.google.com/+ada", Form::Url), "https://plus.google.com/+ada");
        assert_eq!(clean_google(" ", Form::Url), "");
    }
}
