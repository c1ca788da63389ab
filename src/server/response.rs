use super::HeaderVec;
use std::sync::Arc;
use tracing::debug;

pub(crate) fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

/// Mutable response sink shared by the handlers of one request.
///
/// The router never writes to it; handlers do. Once [`Response::end`] has
/// been called the response is finished and every further write is a
/// no-op, which keeps a stale handler chain from producing a second
/// response.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderVec,
    body: Vec<u8>,
    finished: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// A fresh `200 OK` response with no headers and no body
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Vec::new(),
            finished: false,
        }
    }

    /// HTTP status code
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Set the status code
    pub fn set_status(&mut self, status: u16) {
        if self.finished {
            debug!(status, "Ignoring status change on finished response");
            return;
        }
        self.status = status;
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        if self.finished {
            debug!(header = name, "Ignoring header on finished response");
            return;
        }
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    /// Append to the body without finishing the response
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        if self.finished {
            debug!("Ignoring write on finished response");
            return;
        }
        self.body.extend_from_slice(chunk.as_ref());
    }

    /// Append a final chunk and finish the response
    pub fn end(&mut self, chunk: impl AsRef<[u8]>) {
        if self.finished {
            debug!("Ignoring end on finished response");
            return;
        }
        self.body.extend_from_slice(chunk.as_ref());
        self.finished = true;
    }

    /// Whether [`Response::end`] has been called
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Body bytes written so far
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Standard reason phrase for the current status
    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }

    /// Convert into an [`http::Response`] for the host transport
    ///
    /// # Errors
    ///
    /// Fails when the status code or a header is not valid HTTP.
    pub fn into_http(self) -> Result<http::Response<Vec<u8>>, http::Error> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_ref(), value.as_str());
        }
        builder.body(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(503), "Service Unavailable");
        assert_eq!(status_reason(799), "Unknown");
    }

    #[test]
    fn test_writes_after_end_are_ignored() {
        let mut res = Response::new();
        res.write("foo");
        res.end("bar");
        res.end("baz");
        res.set_status(500);
        res.set_header("x-late", "1");
        assert_eq!(res.body_str(), Some("foobar"));
        assert_eq!(res.status(), 200);
        assert_eq!(res.header("x-late"), None);
        assert!(res.is_finished());
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut res = Response::new();
        res.set_header("Content-Type", "text/plain");
        res.set_header("content-type", "application/json");
        assert_eq!(res.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_into_http() {
        let mut res = Response::new();
        res.set_status(404);
        res.set_header("content-type", "text/plain");
        res.end("Not Found");
        let http_res = res.into_http().unwrap();
        assert_eq!(http_res.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(http_res.body(), b"Not Found");
    }
}
