use super::HeaderVec;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use std::sync::Arc;
use tracing::debug;

/// Inbound request record handed to the router by the host transport.
///
/// The router only reads the method and the pathname. The pathname is
/// parsed lazily from the raw url and cached; the cache is keyed by the raw
/// string, so changing the url through [`Request::set_url`] (for example in
/// a handler that rewrites the path before passing control on) is picked up
/// on the next access.
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    method: String,
    url: String,
    headers: HeaderVec,
    parsed: Option<ParsedUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedUrl {
    raw: String,
    pathname: String,
    query: Option<String>,
}

impl ParsedUrl {
    fn parse(raw: &str) -> Self {
        // Absolute-form request targets (`GET http://host/path HTTP/1.1`)
        if raw.contains("://") {
            if let Ok(url) = url::Url::parse(raw) {
                return Self {
                    raw: raw.to_string(),
                    pathname: url.path().to_string(),
                    query: url.query().map(str::to_string),
                };
            }
        }

        let without_fragment = raw.split('#').next().unwrap_or_default();
        let (pathname, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (without_fragment, None),
        };
        let pathname = if pathname.is_empty() { "/" } else { pathname };

        Self {
            raw: raw.to_string(),
            pathname: pathname.to_string(),
            query,
        }
    }
}

impl Request {
    /// Create a request for `method` and raw request target `url`
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            method: method.into(),
            url: url.into(),
            headers: HeaderVec::new(),
            parsed: None,
        }
    }

    /// Builder-style header insertion
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Request identifier used to correlate logs
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// HTTP method as received
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Raw request target, including any query string
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replace the raw request target
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The path component of the url, without query string or fragment
    pub fn pathname(&mut self) -> &str {
        &self.parsed().pathname
    }

    /// Raw query string, if any
    pub fn query_string(&mut self) -> Option<&str> {
        self.parsed().query.as_deref()
    }

    /// Get a decoded query parameter by name
    ///
    /// Uses "last write wins" semantics for repeated keys.
    pub fn query_param(&mut self, name: &str) -> Option<String> {
        let query = self.query_string()?;
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| k == name)
            .last()
            .map(|(_, v)| v.into_owned())
    }

    fn parsed(&mut self) -> &ParsedUrl {
        if self.parsed.as_ref().is_some_and(|p| p.raw != self.url) {
            debug!(request_id = %self.id, url = %self.url, "Request url changed, re-parsing");
            self.parsed = None;
        }
        let url = &self.url;
        self.parsed.get_or_insert_with(|| ParsedUrl::parse(url))
    }
}

impl<B> From<&http::Request<B>> for Request {
    fn from(req: &http::Request<B>) -> Self {
        let headers: HeaderVec = req
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (Arc::from(k.as_str()), v.to_string())))
            .collect();
        let id = RequestId::from_upstream(
            req.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
        );
        let url = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.uri().path().to_string(), |pq| pq.as_str().to_string());

        Self {
            id,
            method: req.method().as_str().to_string(),
            url,
            headers,
            parsed: None,
        }
    }
}
