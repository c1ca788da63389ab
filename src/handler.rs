//! # Handlers
//!
//! A route owns an ordered chain of [`Handler`]s. Each handler plays one of
//! two roles, fixed when it is constructed:
//!
//! - [`Handler::Normal`] runs while no error is in flight.
//! - [`Handler::ErrorAware`] runs only while an error is in flight and
//!   receives that error.
//!
//! A handler tells the dispatcher what to do next by returning a [`Flow`]:
//!
//! | Return                         | Meaning                                       |
//! |--------------------------------|-----------------------------------------------|
//! | `Ok(Flow::Halt)`               | response handled, dispatch ends               |
//! | `Ok(Flow::Next)`               | continue with the next handler or route       |
//! | `Ok(Flow::Fail(e))` / `Err(e)` | propagate `e` to the next error-aware handler |
//! | `Ok(Flow::NextRoute)`          | abandon this route, resume the route search   |
//!
//! A panic inside a handler is treated exactly like `Err`.
//!
//! ```rust
//! use chainrouter::handler::{error_handler, handler, Flow};
//!
//! let load = handler(|cx| {
//!     let id = cx.params.get("id").unwrap_or_default().to_string();
//!     if id == "0" {
//!         anyhow::bail!("no such user");
//!     }
//!     cx.response.end(id);
//!     Ok(Flow::Halt)
//! });
//!
//! let recover = error_handler(|cx, err| {
//!     cx.response.set_status(404);
//!     cx.response.end(err.to_string());
//!     Ok(Flow::Halt)
//! });
//! # let _ = (load, recover);
//! ```

use crate::params::Params;
use crate::server::{Request, Response};
use std::fmt;
use std::sync::Arc;

/// What a handler asks the dispatcher to do next
#[derive(Debug)]
pub enum Flow {
    /// Stop dispatching; the handler has dealt with the response
    Halt,
    /// Continue with the next handler in this route, or the next matching
    /// route once this one is exhausted
    Next,
    /// Skip the rest of this route and resume the route search after it
    NextRoute,
    /// Propagate an error to the next error-aware handler of this route
    Fail(anyhow::Error),
}

impl Flow {
    /// Shorthand for `Flow::Fail` from any error type
    pub fn fail(err: impl Into<anyhow::Error>) -> Self {
        Flow::Fail(err.into())
    }
}

/// Value returned by every handler
pub type HandlerResult = anyhow::Result<Flow>;

/// Execution scope of one matched route
///
/// Created once per matched route and reused by every handler in its chain.
pub struct Context<'a> {
    /// The inbound request
    pub request: &'a mut Request,
    /// The response sink
    pub response: &'a mut Response,
    /// Parameters captured by the matched route
    pub params: Params,
    route: &'a str,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        request: &'a mut Request,
        response: &'a mut Response,
        params: Params,
        route: &'a str,
    ) -> Self {
        Self {
            request,
            response,
            params,
            route,
        }
    }

    /// Template (or regex source) of the matched route
    #[must_use]
    pub fn route(&self) -> &str {
        self.route
    }
}

type NormalFn = dyn Fn(&mut Context<'_>) -> HandlerResult + Send + Sync;
type ErrorFn = dyn Fn(&mut Context<'_>, anyhow::Error) -> HandlerResult + Send + Sync;

/// One entry of a route's handler chain
#[derive(Clone)]
pub enum Handler {
    /// Invoked while no error is in flight
    Normal(Arc<NormalFn>),
    /// Invoked only while an error is in flight; receives the error
    ErrorAware(Arc<ErrorFn>),
}

impl Handler {
    /// Whether this handler accepts an error
    #[must_use]
    pub fn is_error_aware(&self) -> bool {
        matches!(self, Handler::ErrorAware(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Normal(_) => f.write_str("Handler::Normal"),
            Handler::ErrorAware(_) => f.write_str("Handler::ErrorAware"),
        }
    }
}

/// Wrap a closure as a [`Handler::Normal`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
{
    Handler::Normal(Arc::new(f))
}

/// Wrap a closure as a [`Handler::ErrorAware`]
pub fn error_handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context<'_>, anyhow::Error) -> HandlerResult + Send + Sync + 'static,
{
    Handler::ErrorAware(Arc::new(f))
}
