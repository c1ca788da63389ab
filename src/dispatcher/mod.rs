//! # Dispatcher Module
//!
//! The dispatcher drives one request through the route table and the
//! matched routes' handler chains.
//!
//! ## Overview
//!
//! For each request the dispatcher:
//! - Searches the routes for the request's method from a resume index
//! - Runs the first matching route's handlers in order
//! - Threads a pending error between handlers, offering it only to
//!   error-aware handlers
//! - Falls through to the next matching route when a chain finishes
//!   without halting, or when a handler asks for [`Flow::NextRoute`]
//! - Hands control to the caller's fallback once the table is exhausted
//!   or an error outlives its route
//!
//! ## Handler Selection
//!
//! | Pending error | Handler kind   | Action                              |
//! |---------------|----------------|-------------------------------------|
//! | none          | `Normal`       | invoke                              |
//! | none          | `ErrorAware`   | skip                                |
//! | some          | `ErrorAware`   | invoke with the error               |
//! | some          | `Normal`       | skip, keep carrying the error       |
//!
//! When the chain runs out: no pending error means the next matching route
//! is tried; a pending error goes to the fallback.
//!
//! ## Example
//!
//! ```rust
//! use chainrouter::handler::{handler, Flow};
//! use chainrouter::router::Router;
//! use chainrouter::server::{Request, Response};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.get("/foo", [handler(|_| Ok(Flow::Next))])?;
//! router.get("/foo", [handler(|cx| {
//!     cx.response.end("second");
//!     Ok(Flow::Halt)
//! })])?;
//!
//! let mut req = Request::new("GET", "/foo");
//! let mut res = Response::new();
//! router.dispatch(&mut req, &mut res, |_, res, _| res.end("not found"));
//! assert_eq!(res.body_str(), Some("second"));
//! # Ok(())
//! # }
//! ```
//!
//! [`Flow::NextRoute`]: crate::handler::Flow::NextRoute

mod core;

pub use core::DispatchCursor;
