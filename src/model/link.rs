use serde::Serialize;

use super::parse_uri;
use crate::error::Result;

/// A GPX link (`<link href>`), attached to metadata, people, points, routes and tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    href: String,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
}

impl Link {
    /// Build a link to `href`. Fails with `InvalidUri` when `href` is not a URI reference.
    /// Relative references such as `photos/summit.jpg` are kept as written.
    pub fn new(href: &str) -> Result<Self> {
        Ok(Self {
            href: parse_uri(href)?,
            text: None,
            link_type: None,
        })
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// Replace the target. The old target is kept when `href` does not parse.
    pub fn set_href(&mut self, href: &str) -> Result<()> {
        self.href = parse_uri(href)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GpxError;

    #[test]
    fn test_new_link_has_no_text_or_type() {
        let link = Link::new("https://example.com/tokyo-tower").unwrap();
        assert_eq!(link.href(), "https://example.com/tokyo-tower");
        assert!(link.text.is_none());
        assert!(link.link_type.is_none());
    }

    #[test]
    fn test_builder_fields() {
        let link = Link::new("https://example.com")
            .unwrap()
            .with_text("Example")
            .with_type("text/html");
        assert_eq!(link.text.as_deref(), Some("Example"));
        assert_eq!(link.link_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_invalid_href_rejected() {
        assert!(matches!(
            Link::new("http://"),
            Err(GpxError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_relative_href_kept_as_written() {
        let link = Link::new("photos/summit.jpg").unwrap().with_type("image/jpeg");
        assert_eq!(link.href(), "photos/summit.jpg");

        let mut link = Link::new("https://example.com/a").unwrap();
        link.set_href("../index.html").unwrap();
        assert_eq!(link.href(), "../index.html");
    }

    #[test]
    fn test_failed_set_href_keeps_old_target() {
        let mut link = Link::new("https://example.com/a").unwrap();
        assert!(link.set_href("no scheme here").is_err());
        assert_eq!(link.href(), "https://example.com/a");

        link.set_href("https://example.com/b").unwrap();
        assert_eq!(link.href(), "https://example.com/b");
    }
}
