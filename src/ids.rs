//! Request correlation ids.
//!
//! Every [`crate::server::Request`] carries a [`RequestId`] that shows up in
//! the `dispatch` and `request` spans. When a request arrives from an
//! `http` transport with a valid ULID in `x-request-id`, that id is reused
//! so logs line up with whatever sits in front of the router; anything else
//! gets a fresh ULID.

use std::fmt;
use std::str::FromStr;

/// Header an upstream proxy uses to hand over its request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ULID-backed request identifier
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(pub ulid::Ulid);

impl RequestId {
    /// A fresh id
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Reuse the upstream id from [`REQUEST_ID_HEADER`] when it parses
    #[must_use]
    pub fn from_upstream(header_value: Option<&str>) -> Self {
        header_value
            .map(str::trim)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(RequestId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_reused() {
        let upstream = RequestId::new();
        let header = format!(" {upstream} ");
        assert_eq!(RequestId::from_upstream(Some(&header)), upstream);
    }

    #[test]
    fn test_missing_or_invalid_upstream_id_is_replaced() {
        let generated = RequestId::from_upstream(Some("not-a-ulid"));
        assert_eq!(generated.to_string().len(), 26);
        assert_ne!(RequestId::from_upstream(None), generated);
    }
}
