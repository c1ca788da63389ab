use crate::router::Router;
use crate::server::{Request, Response};
use std::sync::Arc;
use tracing::{debug, error};

/// Continuation handed to a middleware: call it to pass control on,
/// optionally with an error
pub type Next<'n> = &'n mut dyn FnMut(&mut Request, &mut Response, Option<anyhow::Error>);

/// One layer of request handling in front of (or behind) the router
pub trait Middleware: Send + Sync {
    /// Handle a request with no error in flight
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>);

    /// Handle a request while an error is in flight
    ///
    /// The default passes the error straight on.
    fn handle_error(
        &self,
        err: anyhow::Error,
        req: &mut Request,
        res: &mut Response,
        next: Next<'_>,
    ) {
        next(req, res, Some(err));
    }
}

impl Middleware for Router {
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        self.dispatch(req, res, |req, res, err| next(req, res, err));
    }
}

struct ErrorFn<F>(F);

impl<F> Middleware for ErrorFn<F>
where
    F: Fn(anyhow::Error, &mut Request, &mut Response) + Send + Sync,
{
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        next(req, res, None);
    }

    fn handle_error(
        &self,
        err: anyhow::Error,
        req: &mut Request,
        res: &mut Response,
        _next: Next<'_>,
    ) {
        (self.0)(err, req, res);
    }
}

/// Wrap a closure as an error-only middleware that terminates the stack
pub fn error_middleware<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(anyhow::Error, &mut Request, &mut Response) + Send + Sync + 'static,
{
    Arc::new(ErrorFn(f))
}

/// Ordered chain of middleware for a host transport
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer
    #[must_use]
    pub fn with(mut self, layer: Arc<dyn Middleware>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Append a layer in place
    pub fn push(&mut self, layer: Arc<dyn Middleware>) {
        self.layers.push(layer);
    }

    /// Run a request through every layer
    pub fn run(&self, req: &mut Request, res: &mut Response) {
        self.step(0, req, res, None);
    }

    fn step(&self, index: usize, req: &mut Request, res: &mut Response, err: Option<anyhow::Error>) {
        let Some(layer) = self.layers.get(index) else {
            finish(req, res, err);
            return;
        };
        let mut next = |req: &mut Request, res: &mut Response, err: Option<anyhow::Error>| {
            self.step(index + 1, req, res, err);
        };
        match err {
            None => layer.handle(req, res, &mut next),
            Some(err) => layer.handle_error(err, req, res, &mut next),
        }
    }
}

fn finish(req: &mut Request, res: &mut Response, err: Option<anyhow::Error>) {
    if res.is_finished() {
        return;
    }
    match err {
        Some(err) => {
            error!(request_id = %req.id(), error = %err, "Unhandled error reached end of middleware stack");
            res.set_status(500);
            res.set_header("content-type", "text/plain");
            let reason = res.reason();
            res.end(reason);
        }
        None => {
            let path = req.pathname().to_string();
            let body = format!("Cannot {} {}", req.method(), path);
            debug!(request_id = %req.id(), "No middleware answered the request");
            res.set_status(404);
            res.set_header("content-type", "text/plain");
            res.end(body);
        }
    }
}
