//! Incoming request as seen by the engine.

use crate::types::route::HttpMethod;

/// Immutable view of one request: method, path, raw query and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: String,
    path: String,
    query: String,
    body: Option<String>,
}

impl RequestContext {
    /// Build a request from a method and a URL (`path?query`).
    pub fn new(method: impl Into<String>, url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        Self {
            method: method.into(),
            path: path.to_owned(),
            query: query.to_owned(),
            body: None,
        }
    }

    /// Parse a request line such as `GET /api/users?page=2 HTTP/1.1`.
    ///
    /// The protocol version is optional and ignored.
    pub fn parse(request_line: &str) -> Option<Self> {
        let mut parts = request_line.split_whitespace();
        let method = parts.next()?;
        let url = parts.next()?;
        Some(Self::new(method, url))
    }

    /// Attach the request body text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Method as a known [`HttpMethod`], `None` for anything else.
    pub fn http_method(&self) -> Option<HttpMethod> {
        self.method.parse().ok()
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string without the leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
