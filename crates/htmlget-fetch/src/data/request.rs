use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::{FetchError, Result};

/// A single GET request. Built per fetch and never shared.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

impl FetchRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Parse `url` into a request with no headers.
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self::new(parsed))
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add the `Accept: text/html` hint.
    #[must_use]
    pub fn accept_html(self) -> Self {
        self.header(ACCEPT, HeaderValue::from_static("text/html"))
    }
}

/// Status line and headers of a response, available before the body is read.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    /// Final URL after redirects.
    pub url: Url,
    pub status: u16,
    /// Reason phrase sent by the server, else the canonical one, else `"Unknown"`.
    pub status_text: String,
    pub headers: HeaderMap,
    /// Body length as reported by the transport.
    pub content_length: Option<u64>,
}

impl ResponseHead {
    pub fn content_type(&self) -> Option<&str> {
        header_str(&self.headers, CONTENT_TYPE)
    }

    /// The `Content-Length` header value, if present and numeric.
    pub fn declared_length(&self) -> Option<u64> {
        header_str(&self.headers, CONTENT_LENGTH).and_then(|v| v.trim().parse().ok())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A completed fetch: status, headers and the raw body bytes.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub url: Url,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchOutcome {
    pub fn content_type(&self) -> Option<&str> {
        header_str(&self.headers, CONTENT_TYPE)
    }
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(headers: &[(HeaderName, &'static str)]) -> ResponseHead {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        ResponseHead {
            url: Url::parse("http://example.com/").unwrap(),
            status: 200,
            status_text: "OK".to_string(),
            headers: map,
            content_length: None,
        }
    }

    #[test]
    fn test_parse_rejects_relative_url() {
        let err = FetchRequest::parse("/index.html").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { url, .. } if url == "/index.html"));
    }

    #[test]
    fn test_accept_html_header() {
        let request = FetchRequest::parse("http://example.com/").unwrap().accept_html();
        assert_eq!(request.headers.get(ACCEPT).unwrap(), "text/html");
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_declared_length() {
        assert_eq!(head(&[(CONTENT_LENGTH, "20000000")]).declared_length(), Some(20_000_000));
        assert_eq!(head(&[(CONTENT_LENGTH, "nope")]).declared_length(), None);
        assert_eq!(head(&[]).declared_length(), None);
    }

    #[test]
    fn test_content_type() {
        let h = head(&[(CONTENT_TYPE, "text/html; charset=EUC-JP")]);
        assert_eq!(h.content_type(), Some("text/html; charset=EUC-JP"));
        assert_eq!(head(&[]).content_type(), None);
    }

    #[test]
    fn test_is_success() {
        let mut h = head(&[]);
        assert!(h.is_success());
        h.status = 299;
        assert!(h.is_success());
        h.status = 304;
        assert!(!h.is_success());
        h.status = 404;
        assert!(!h.is_success());
    }
}
