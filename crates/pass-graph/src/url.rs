//! Absolute resource locations inside a Pod

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// An absolute `http(s)` URL naming a Pod resource, container, or identity
///
/// Containers end with `/`. Only the scheme and host are validated; the
/// remote store owns everything else about addressing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceUrl(String);

impl ResourceUrl {
    /// Parse and validate an absolute URL
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidUrl`] if the scheme is not `http`/`https`
    /// or the host is empty
    pub fn parse(raw: impl Into<String>) -> Result<Self, GraphError> {
        let raw = raw.into();
        let rest = raw
            .strip_prefix("https://")
            .or_else(|| raw.strip_prefix("http://"));
        match rest {
            Some(rest) => {
                let host = rest.split(['/', '#', '?']).next().unwrap_or_default();
                if host.is_empty() || raw.chars().any(char::is_whitespace) {
                    Err(GraphError::InvalidUrl(raw))
                } else {
                    Ok(Self(raw))
                }
            }
            None => Err(GraphError::InvalidUrl(raw)),
        }
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme including the trailing colon (`https:`)
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.split("//").next().unwrap_or_default()
    }

    /// Host portion (`pod.example.org`)
    #[must_use]
    pub fn host(&self) -> &str {
        self.0
            .split("//")
            .nth(1)
            .and_then(|rest| rest.split(['/', '#', '?']).next())
            .unwrap_or_default()
    }

    /// Whether this URL names a container
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Append a path segment; spaces are percent-encoded
    ///
    /// A trailing `/` is inserted first when `self` is not a container.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        let mut joined = self.0.clone();
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(&encode_segment(segment));
        Self(joined)
    }

    /// Append a child container segment (always ends with `/`)
    #[must_use]
    pub fn join_container(&self, segment: &str) -> Self {
        let mut joined = self.join(segment);
        if !joined.0.ends_with('/') {
            joined.0.push('/');
        }
        joined
    }

    /// Subject identifier for a fragment of this document (`<url>#name`)
    #[must_use]
    pub fn with_fragment(&self, fragment: &str) -> String {
        format!("{}#{}", self.without_fragment(), fragment)
    }

    /// Document part of the URL, with any `#fragment` removed
    #[must_use]
    pub fn without_fragment(&self) -> &str {
        self.0.split('#').next().unwrap_or(&self.0)
    }

    /// The container holding this resource
    ///
    /// Returns `None` for the Pod root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let doc = self.without_fragment();
        let trimmed = doc.strip_suffix('/').unwrap_or(doc);
        let idx = trimmed.rfind('/')?;
        let parent = &trimmed[..=idx];
        // `https://host/` has exactly three slashes; anything shorter is the scheme
        if parent.matches('/').count() < 3 {
            return None;
        }
        Some(Self(parent.to_string()))
    }

    /// Last path segment (file or container name), without a trailing slash
    #[must_use]
    pub fn file_name(&self) -> &str {
        let doc = self.without_fragment();
        let trimmed = doc.strip_suffix('/').unwrap_or(doc);
        trimmed.rsplit('/').next().unwrap_or_default()
    }
}

/// Percent-encode the characters that are unsafe in a path segment
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
    out
}

impl Display for ResourceUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceUrl {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceUrl {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ResourceUrl> for String {
    fn from(value: ResourceUrl) -> Self {
        value.0
    }
}

impl AsRef<str> for ResourceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_http_and_https() {
        assert!(ResourceUrl::parse("https://alice.pod.example/").is_ok());
        assert!(ResourceUrl::parse("http://localhost:3000/profile/card#me").is_ok());
    }

    #[test]
    fn parse_rejects_relative_and_empty_host() {
        assert!(matches!(
            ResourceUrl::parse("alice/profile"),
            Err(GraphError::InvalidUrl(_))
        ));
        assert!(ResourceUrl::parse("https:///path").is_err());
        assert!(ResourceUrl::parse("https://host/with space").is_err());
    }

    #[test]
    fn join_encodes_spaces() {
        let base = ResourceUrl::parse("https://alice.pod.example/PASS/Passport/").unwrap();
        let file = base.join("my scan.pdf");
        assert_eq!(
            file.as_str(),
            "https://alice.pod.example/PASS/Passport/my%20scan.pdf"
        );
        assert_eq!(file.file_name(), "my%20scan.pdf");
    }

    #[test]
    fn join_container_appends_slash() {
        let base = ResourceUrl::parse("https://alice.pod.example/PASS").unwrap();
        let inbox = base.join_container("inbox");
        assert_eq!(inbox.as_str(), "https://alice.pod.example/PASS/inbox/");
        assert!(inbox.is_container());
    }

    #[test]
    fn parent_walks_up_to_root() {
        let file = ResourceUrl::parse("https://alice.pod.example/PASS/Passport/doc.pdf").unwrap();
        let container = file.parent().unwrap();
        assert_eq!(container.as_str(), "https://alice.pod.example/PASS/Passport/");
        let pass = container.parent().unwrap();
        assert_eq!(pass.as_str(), "https://alice.pod.example/PASS/");
        let root = pass.parent().unwrap();
        assert_eq!(root.as_str(), "https://alice.pod.example/");
        assert!(root.parent().is_none());
    }

    #[test]
    fn fragment_helpers() {
        let doc = ResourceUrl::parse("https://bob.pod.example/PASS/inbox/hi.ttl").unwrap();
        assert_eq!(
            doc.with_fragment("message"),
            "https://bob.pod.example/PASS/inbox/hi.ttl#message"
        );
        assert_eq!(doc.host(), "bob.pod.example");
        assert_eq!(doc.scheme(), "https:");
    }

    #[test]
    fn serde_validates() {
        let ok: Result<ResourceUrl, _> = serde_json::from_str("\"https://a.example/\"");
        assert!(ok.is_ok());
        let bad: Result<ResourceUrl, _> = serde_json::from_str("\"ftp://a.example/\"");
        assert!(bad.is_err());
    }
}
