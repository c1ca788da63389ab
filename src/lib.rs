//! # chainrouter
//!
//! **chainrouter** is a sequential HTTP request router: Express-style path
//! templates compiled to regular expressions, tried in registration order,
//! with each route owning a chain of handlers that can halt, continue,
//! skip to the next matching route, or propagate an error.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Path template compiler (`/user/:id.:format?` to regex + parameter names)
//! - **[`router`]** - Per-method route table and first-match lookup
//! - **[`dispatcher`]** - The route/handler state machine behind [`Router::dispatch`]
//! - **[`handler`]** - Normal and error-aware handlers, [`Flow`], [`Context`]
//! - **[`params`]** - Named and positional parameter access
//! - **[`server`]** - [`Request`] and [`Response`] records the router works on
//! - **[`middleware`]** - Connect-style boundary to a host transport
//! - **[`config`]** - `sensitive`/`strict` options from env, YAML or TOML
//! - **[`logging`]** - `tracing-subscriber` setup for binaries
//! - **[`cli`]** - The `chainrouter` command line
//!
//! ## Request flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Router
//!     participant Route as Route N
//!     participant Fallback
//!
//!     Host->>Router: dispatch(req, res, fallback)
//!     Router->>Router: match_request(req, search_from)
//!     Router->>Route: run handler chain
//!     alt Flow::Halt
//!         Route-->>Host: done
//!     else chain exhausted / Flow::NextRoute
//!         Router->>Router: match_request(req, N + 1)
//!     else error outlives route
//!         Router->>Fallback: fallback(req, res, Some(err))
//!     end
//!     Router->>Fallback: fallback(req, res, None) when nothing matches
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chainrouter::{handler, Flow, Request, Response, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router
//!     .get("/user/:id", [handler(|cx| {
//!         let id = cx.params.get("id").unwrap_or_default().to_string();
//!         cx.response.end(format!("user {id}"));
//!         Ok(Flow::Halt)
//!     })])?;
//!
//! let mut req = Request::new("GET", "/user/42");
//! let mut res = Response::new();
//! router.dispatch(&mut req, &mut res, |_, res, _| {
//!     res.set_status(404);
//!     res.end("not found");
//! });
//! assert_eq!(res.body_str(), Some("user 42"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod params;
pub mod pattern;
pub mod router;
pub mod server;

pub use config::RouterConfig;
pub use error::{CompilationError, HandlerFault};
pub use handler::{error_handler, handler, Context, Flow, Handler, HandlerResult};
pub use middleware::{Middleware, MiddlewareStack};
pub use params::Params;
pub use pattern::{compile, CompileOptions, CompiledPattern, RouteSpec};
pub use router::Router;
pub use server::{Request, Response};
