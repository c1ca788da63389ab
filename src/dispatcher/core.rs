//! Dispatcher core module - the route/handler state machine.
//!
//! Dispatch is an explicit loop over `(route index, handler index, pending
//! error)` rather than nested continuations, so a long handler chain or a
//! long run of fall-through routes never grows the call stack.

use crate::error::HandlerFault;
use crate::handler::{Context, Flow, Handler};
use crate::router::{CompiledRoute, RouteMatch, Router};
use crate::server::{Request, Response};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, debug_span, error};

/// Per-request dispatch position
///
/// Owned by a single in-flight [`Router::dispatch`] call and threaded
/// through its loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchCursor {
    resume_index: usize,
    handler_index: usize,
    search_from: usize,
}

impl DispatchCursor {
    /// Index of the route currently being run
    #[must_use]
    pub fn resume_index(&self) -> usize {
        self.resume_index
    }

    /// Index of the next handler to consider within the current route
    #[must_use]
    pub fn handler_index(&self) -> usize {
        self.handler_index
    }

    /// Where the next route search starts
    #[must_use]
    pub fn search_from(&self) -> usize {
        self.search_from
    }

    fn enter_route(&mut self, index: usize) {
        self.resume_index = index;
        self.handler_index = 0;
    }

    fn skip_route(&mut self) {
        self.search_from = self.resume_index + 1;
    }
}

/// How a route's handler chain ended
#[derive(Debug)]
enum ChainExit {
    /// A handler returned `Flow::Halt`
    Halted,
    /// Chain exhausted without error, or a handler asked for the next route
    NextRoute,
    /// Chain exhausted with an error still in flight
    Failed(anyhow::Error),
}

impl Router {
    /// Dispatch one request through the route table
    ///
    /// Routes for the request's method are tried in registration order.
    /// The first match runs its handler chain; the chain can halt, move on
    /// to the next handler, skip to the next matching route, or propagate
    /// an error to the route's error-aware handlers. When no route is left
    /// (or an error outlives its route) `fallback` is called with the
    /// request, the response and the error in flight, if any.
    ///
    /// Dispatch never panics to its caller: handler panics are caught and
    /// propagated as [`HandlerFault::Panicked`] errors.
    pub fn dispatch<F>(&self, req: &mut Request, res: &mut Response, fallback: F)
    where
        F: FnOnce(&mut Request, &mut Response, Option<anyhow::Error>),
    {
        let span = debug_span!(
            "dispatch",
            request_id = %req.id(),
            method = %req.method(),
            url = %req.url()
        );
        let _entered = span.enter();

        let mut cursor = DispatchCursor::default();
        loop {
            let Some(RouteMatch {
                index,
                route,
                params,
            }) = self.match_request(req, cursor.search_from)
            else {
                debug!(search_from = cursor.search_from, "Route table exhausted, passing to fallback");
                fallback(req, res, None);
                return;
            };

            cursor.enter_route(index);
            let exit = {
                let mut cx = Context::new(req, res, params, route.spec().as_str());
                run_chain(route, &mut cx, &mut cursor)
            };

            match exit {
                ChainExit::Halted => {
                    if !res.is_finished() {
                        debug!(
                            route = %route.spec(),
                            handler_index = cursor.handler_index,
                            "Dispatch halted without a finished response"
                        );
                    }
                    return;
                }
                ChainExit::NextRoute => {
                    debug!(route = %route.spec(), route_index = index, "Advancing to next route");
                    cursor.skip_route();
                }
                ChainExit::Failed(err) => {
                    debug!(
                        route = %route.spec(),
                        error = %err,
                        "Error outlived its route, passing to fallback"
                    );
                    fallback(req, res, Some(err));
                    return;
                }
            }
        }
    }
}

fn run_chain(route: &CompiledRoute, cx: &mut Context<'_>, cursor: &mut DispatchCursor) -> ChainExit {
    let mut pending: Option<anyhow::Error> = None;

    loop {
        let Some(handler) = route.handlers().get(cursor.handler_index) else {
            return match pending {
                Some(err) => ChainExit::Failed(err),
                None => ChainExit::NextRoute,
            };
        };
        let position = cursor.handler_index;
        cursor.handler_index += 1;

        let flow = match (handler, pending.take()) {
            (Handler::Normal(f), None) => invoke(route, position, || f(cx)),
            (Handler::ErrorAware(f), Some(err)) => invoke(route, position, || f(cx, err)),
            (Handler::Normal(_), Some(err)) => {
                pending = Some(err);
                continue;
            }
            (Handler::ErrorAware(_), None) => continue,
        };

        match flow {
            Flow::Halt => return ChainExit::Halted,
            Flow::Next => {}
            Flow::NextRoute => return ChainExit::NextRoute,
            Flow::Fail(err) => {
                debug!(
                    route = %route.spec(),
                    handler_index = position,
                    error = %err,
                    "Handler propagated error"
                );
                pending = Some(err);
            }
        }
    }
}

/// Run one handler inside a failure boundary
///
/// `Err` returns and panics both come back as `Flow::Fail`.
fn invoke<F>(route: &CompiledRoute, position: usize, call: F) -> Flow
where
    F: FnOnce() -> anyhow::Result<Flow>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(flow)) => flow,
        Ok(Err(err)) => Flow::Fail(err),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(
                route = %route.spec(),
                handler_index = position,
                panic_message = %message,
                "Handler panicked"
            );
            Flow::Fail(anyhow::Error::new(HandlerFault::Panicked {
                route: route.spec().as_str().to_string(),
                message,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_skip_resumes_after_current_route() {
        let mut cursor = DispatchCursor::default();
        cursor.enter_route(3);
        cursor.handler_index = 2;
        cursor.skip_route();
        assert_eq!(cursor.search_from(), 4);
        cursor.enter_route(5);
        assert_eq!(cursor.resume_index(), 5);
        assert_eq!(cursor.handler_index(), 0);
    }

    #[test]
    fn test_long_chain_does_not_grow_stack() {
        use crate::handler::handler;

        let mut router = Router::new();
        let chain: Vec<_> = (0..100_000).map(|_| handler(|_| Ok(Flow::Next))).collect();
        router.get("/deep", chain).unwrap();
        router
            .get(
                "/deep",
                [handler(|cx| {
                    cx.response.end("bottom");
                    Ok(Flow::Halt)
                })],
            )
            .unwrap();

        let mut req = Request::new("GET", "/deep");
        let mut res = Response::new();
        router.dispatch(&mut req, &mut res, |_, _, _| tracing::warn!("unexpected fallback"));
        assert_eq!(res.body_str(), Some("bottom"));
    }
}
