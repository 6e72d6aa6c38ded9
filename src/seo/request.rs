//! Request-scoped inputs from the host.

/// Title separator used when the host computed none.
pub const DEFAULT_TITLE_SEPARATOR: &str = "/";

/// Separator between the site name and the feed name in feed titles.
pub const DEFAULT_FEED_SEPARATOR: &str = "»";

#[derive(Debug, Clone)]
pub struct Request {
    pub https: bool,
    pub host: String,
    /// Path plus query string, as requested.
    pub uri: String,
    pub user_agent: String,
    /// Response status the page is served with.
    pub status: u16,
    /// Title the host already computed for this document.
    pub document_title: Option<String>,
    /// Separator the host used when computing its document title.
    pub title_separator: Option<String>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            https: false,
            host: "localhost".into(),
            uri: "/".into(),
            user_agent: String::new(),
            status: 200,
            document_title: None,
            title_separator: None,
        }
    }
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    pub const fn scheme(&self) -> &'static str {
        if self.https { "https" } else { "http" }
    }

    /// Absolute URL of the request.
    pub fn current_url(&self) -> String {
        format!("{}://{}{}", self.scheme(), self.host, self.uri)
    }

    pub fn title_separator(&self) -> &str {
        self.title_separator
            .as_deref()
            .unwrap_or(DEFAULT_TITLE_SEPARATOR)
    }

    pub fn feed_separator(&self) -> &str {
        self.title_separator
            .as_deref()
            .unwrap_or(DEFAULT_FEED_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_gate() {
        let mut request = Request::new("/");
        assert!(request.is_success());
        request.status = 204;
        assert!(request.is_success());
        request.status = 404;
        assert!(!request.is_success());
        request.status = 301;
        assert!(!request.is_success());
    }

    #[test]
    fn test_current_url() {
        let request = Request {
            https: true,
            host: "s.example".into(),
            uri: "/a/?b=1".into(),
            ..Request::default()
        };
        assert_eq!(request.current_url(), "https://s.example/a/?b=1");
    }
}
