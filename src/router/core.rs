//! Router core module - route registration and first-match lookup.

use super::table::{CompiledRoute, RouteTable};
use crate::config::RouterConfig;
use crate::error::CompilationError;
use crate::handler::Handler;
use crate::params::Params;
use crate::pattern::{compile, CompileOptions, RouteSpec};
use crate::server::Request;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Methods a route registered through [`Router::all`] is added under
pub const STANDARD_METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "options", "head"];

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// Position of the route within its method's list
    pub index: usize,
    /// The matched route
    pub route: &'r CompiledRoute,
    /// Parameters captured from the pathname
    pub params: Params,
}

/// Sequential router: routes are tried in registration order and the
/// first one whose pattern matches wins
///
/// Registration compiles the path spec immediately, so malformed templates
/// fail here and never at dispatch time. Dispatch itself lives in
/// [`crate::dispatcher`].
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
    config: RouterConfig,
}

macro_rules! method_shortcuts {
    ($($(#[$doc:meta])* $name:ident => $method:literal;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns a [`CompilationError`] when `spec` is malformed.
            pub fn $name<S, H>(&mut self, spec: S, handlers: H) -> Result<&mut Self, CompilationError>
            where
                S: Into<RouteSpec>,
                H: IntoIterator<Item = Handler>,
            {
                self.route($method, spec, handlers)
            }
        )*
    };
}

impl Router {
    /// Create a router with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with the given matching configuration
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            table: RouteTable::new(),
            config,
        }
    }

    /// Matching configuration fixed at construction
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The underlying route table
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Register a route
    ///
    /// `method` is case-normalised to lowercase. Returns the router so
    /// registrations can be chained with `?`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompilationError`] when `spec` is malformed.
    pub fn route<M, S, H>(
        &mut self,
        method: M,
        spec: S,
        handlers: H,
    ) -> Result<&mut Self, CompilationError>
    where
        M: AsRef<str>,
        S: Into<RouteSpec>,
        H: IntoIterator<Item = Handler>,
    {
        let method = method.as_ref().to_ascii_lowercase();
        let pattern = compile(spec, CompileOptions::from(&self.config)).inspect_err(|err| {
            warn!(method = %method, error = %err, "Route registration failed");
        })?;
        let handlers: Vec<Handler> = handlers.into_iter().collect();

        info!(
            method = %method,
            spec = %pattern.spec(),
            regex = %pattern.matcher().as_str(),
            handler_count = handlers.len(),
            route_index = self.table.routes(&method).len(),
            "Route registered"
        );

        self.table
            .push(CompiledRoute::new(method, pattern, handlers));
        Ok(self)
    }

    method_shortcuts! {
        /// Register a `GET` route
        get => "get";
        /// Register a `POST` route
        post => "post";
        /// Register a `PUT` route
        put => "put";
        /// Register a `PATCH` route
        patch => "patch";
        /// Register a `DELETE` route
        delete => "delete";
        /// Register a `HEAD` route
        head => "head";
        /// Register an `OPTIONS` route
        options => "options";
    }

    /// Register the same route under every method in [`STANDARD_METHODS`]
    ///
    /// The spec is compiled once.
    ///
    /// # Errors
    ///
    /// Returns a [`CompilationError`] when `spec` is malformed.
    pub fn all<S, H>(&mut self, spec: S, handlers: H) -> Result<&mut Self, CompilationError>
    where
        S: Into<RouteSpec>,
        H: IntoIterator<Item = Handler>,
    {
        let pattern = compile(spec, CompileOptions::from(&self.config))?;
        let handlers: Vec<Handler> = handlers.into_iter().collect();
        for method in STANDARD_METHODS {
            self.table.push(CompiledRoute::new(
                method.to_string(),
                pattern.clone(),
                handlers.clone(),
            ));
        }
        info!(
            spec = %pattern.spec(),
            regex = %pattern.matcher().as_str(),
            handler_count = handlers.len(),
            "Route registered for all methods"
        );
        Ok(self)
    }

    /// Remove every route under `method` registered with exactly `spec`
    pub fn remove(&mut self, method: &str, spec: &str) -> usize {
        let removed = self.table.remove(method, spec);
        info!(method = %method, spec = %spec, removed, "Routes removed");
        removed
    }

    /// Find the first route for the request's method, starting at `start`,
    /// whose pattern matches the request pathname
    ///
    /// This is first-match, not best-match: registration order decides.
    /// The returned index is what a "next route" search resumes after.
    pub fn match_request<'r>(&'r self, req: &mut Request, start: usize) -> Option<RouteMatch<'r>> {
        let routes = self.table.routes(req.method());
        let request_id = req.id();
        if routes.is_empty() {
            debug!(
                request_id = %request_id,
                method = %req.method(),
                "No routes registered for method"
            );
            return None;
        }

        let match_start = Instant::now();
        let path = req.pathname();

        for (index, route) in routes.iter().enumerate().skip(start) {
            let Some(params) = route.pattern().captures(path) else {
                continue;
            };
            let match_duration = match_start.elapsed();
            if match_duration > Duration::from_millis(1) {
                warn!(
                    request_id = %request_id,
                    path = %path,
                    route = %route.spec(),
                    route_index = index,
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                debug!(
                    request_id = %request_id,
                    path = %path,
                    route = %route.spec(),
                    route_index = index,
                    param_count = params.len(),
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }
            return Some(RouteMatch {
                index,
                route,
                params,
            });
        }

        debug!(
            request_id = %request_id,
            path = %path,
            start,
            candidates = routes.len(),
            "No route matched"
        );
        None
    }

    /// Log every registered route
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes(&self) {
        info!(count = self.table.len(), "Registered routes");
        for route in self.table.iter() {
            info!(
                method = %route.method(),
                spec = %route.spec(),
                regex = %route.pattern().matcher().as_str(),
                handlers = route.handlers().len(),
                "Route"
            );
        }
    }
}
