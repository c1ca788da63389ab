use std::time::Instant;

use tracing::{info, info_span};

use super::{Middleware, Next};
use crate::server::{Request, Response};

/// Wraps the rest of the stack in a `request` span and logs the outcome
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        let span = info_span!(
            "request",
            request_id = %req.id(),
            method = %req.method(),
            url = %req.url()
        );
        let _entered = span.enter();
        let start = Instant::now();

        next(req, res, None);

        info!(
            status = res.status(),
            finished = res.is_finished(),
            latency_us = start.elapsed().as_micros(),
            "Request complete"
        );
    }
}
