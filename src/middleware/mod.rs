//! # Middleware Module
//!
//! The boundary between a host HTTP transport and the router.
//!
//! A [`Middleware`] receives the request, the response sink and a `next`
//! continuation, in the shape of connect-style `(req, res, next)` layers.
//! [`crate::Router`] implements it by running [`crate::Router::dispatch`]
//! and passing its fallback on to `next`. A [`MiddlewareStack`] chains
//! layers for a host and answers whatever is left unanswered at the end
//! with `404` (no error) or `500` (error in flight).

mod core;
mod tracing;

pub use core::{error_middleware, Middleware, MiddlewareStack, Next};
pub use tracing::TracingMiddleware;
