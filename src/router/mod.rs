//! # Router Module
//!
//! Route registration and first-match route lookup.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route specs into matchers at registration time
//! - Keeping routes per lowercase method in registration order
//! - Matching a request pathname against candidates from a resume index
//! - Extracting path parameters from the matched route
//!
//! ## Architecture
//!
//! 1. **Compilation**: [`Router::route`] hands the spec to
//!    [`crate::pattern::compile`] with the router's `sensitive`/`strict`
//!    options and appends the result to the [`RouteTable`].
//!
//! 2. **Matching**: [`Router::match_request`] walks the candidates for the
//!    request's method starting at a given index and returns the first
//!    route whose matcher accepts the pathname.
//!
//! ## Example
//!
//! ```rust
//! use chainrouter::handler::{handler, Flow};
//! use chainrouter::router::Router;
//! use chainrouter::server::Request;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.get("/user/:user", [handler(|_| Ok(Flow::Halt))])?;
//!
//! let mut req = Request::new("GET", "/user/kazupon?tab=repos");
//! let found = router.match_request(&mut req, 0).expect("route");
//! assert_eq!(found.index, 0);
//! assert_eq!(found.params.get("user"), Some("kazupon"));
//! # Ok(())
//! # }
//! ```

mod core;
mod table;
#[cfg(test)]
mod tests;

pub use core::{RouteMatch, Router, STANDARD_METHODS};
pub use table::{CompiledRoute, RouteTable};
