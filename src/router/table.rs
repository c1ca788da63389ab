use crate::handler::Handler;
use crate::pattern::{CompiledPattern, RouteSpec};
use std::collections::HashMap;

/// A registered route: method, compiled pattern and handler chain
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    method: String,
    pattern: CompiledPattern,
    handlers: Vec<Handler>,
}

impl CompiledRoute {
    pub(crate) fn new(method: String, pattern: CompiledPattern, handlers: Vec<Handler>) -> Self {
        Self {
            method,
            pattern,
            handlers,
        }
    }

    /// Lowercase HTTP method
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The spec the route was registered with
    #[must_use]
    pub fn spec(&self) -> &RouteSpec {
        self.pattern.spec()
    }

    /// Compiled matcher and parameter names
    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Handler chain in registration order
    #[must_use]
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }
}

/// Lowercase method → routes in registration order
///
/// Registration order is match priority; routes are never reordered.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Vec<CompiledRoute>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route under its method
    pub fn push(&mut self, route: CompiledRoute) {
        self.routes
            .entry(route.method.clone())
            .or_default()
            .push(route);
    }

    /// Candidate routes for a method (any case), in priority order
    #[must_use]
    pub fn routes(&self, method: &str) -> &[CompiledRoute] {
        let found = match self.routes.get(method) {
            Some(routes) => Some(routes),
            None => self.routes.get(&method.to_ascii_lowercase()),
        };
        found.map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove every route under `method` registered with exactly `spec`
    ///
    /// Returns the number of routes removed.
    pub fn remove(&mut self, method: &str, spec: &str) -> usize {
        let method = method.to_ascii_lowercase();
        let Some(routes) = self.routes.get_mut(&method) else {
            return 0;
        };
        let before = routes.len();
        routes.retain(|route| route.spec().as_str() != spec);
        let removed = before - routes.len();
        if routes.is_empty() {
            self.routes.remove(&method);
        }
        removed
    }

    /// Methods that have at least one route, sorted
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Iterate all routes, grouped by sorted method
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.methods()
            .into_iter()
            .flat_map(move |method| self.routes(method).iter())
    }

    /// Total number of routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
