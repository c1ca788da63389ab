//! Request and response records exchanged with the host transport.
//!
//! The router treats these as opaque collaborators: it reads the method and
//! pathname of a [`Request`] and hands the [`Response`] sink to handlers.
//! Conversions from [`http::Request`] and into [`http::Response`] let any
//! `http`-based server host the router.

mod request;
mod response;

use smallvec::SmallVec;
use std::sync::Arc;

pub use request::Request;
pub use response::Response;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;
