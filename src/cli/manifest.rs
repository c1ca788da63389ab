use crate::config::{load_document, RouterConfig};
use crate::handler::{handler, Flow};
use crate::pattern::RouteSpec;
use crate::router::Router;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Route manifest consumed by `chainrouter match`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub config: RouterConfig,
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
}

/// One manifest entry
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRoute {
    pub method: String,
    pub path: String,
    /// Treat `path` as a raw regular expression instead of a template
    #[serde(default)]
    pub regex: bool,
}

impl ManifestRoute {
    fn spec(&self) -> Result<RouteSpec> {
        if self.regex {
            let re = Regex::new(&self.path)
                .with_context(|| format!("Invalid route regex: {}", self.path))?;
            Ok(RouteSpec::Pattern(re))
        } else {
            Ok(RouteSpec::from(self.path.as_str()))
        }
    }
}

impl RouteManifest {
    /// Load a manifest from a `.yaml`/`.yml` or `.toml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_document(path.as_ref())
    }

    /// Compile every entry into a router, in manifest order
    ///
    /// Each route gets a single handler that ends the response with the
    /// route's template, so the router can also be dispatched against.
    pub fn build_router(&self) -> Result<Router> {
        let mut router = Router::with_config(self.config);
        for (position, route) in self.routes.iter().enumerate() {
            let label = route.path.clone();
            let respond = handler(move |cx| {
                cx.response.end(label.as_str());
                Ok(Flow::Halt)
            });
            router
                .route(&route.method, route.spec()?, [respond])
                .with_context(|| {
                    format!("Route #{position} ({} {}) failed to compile", route.method, route.path)
                })?;
        }
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_defaults() {
        let manifest: RouteManifest = serde_yaml::from_str("routes: []").unwrap();
        assert!(!manifest.config.sensitive);
        assert!(manifest.routes.is_empty());
    }

    #[test]
    fn test_build_router_keeps_order_and_regex_routes() {
        let manifest: RouteManifest = serde_yaml::from_str(
            r#"
config:
  strict: true
routes:
  - method: GET
    path: /user/:id
  - method: get
    path: ^/files/(.*)$
    regex: true
"#,
        )
        .unwrap();
        let router = manifest.build_router().unwrap();
        assert!(router.config().strict);
        let routes = router.table().routes("get");
        assert_eq!(routes.len(), 2);
        assert!(routes[1].spec().is_pattern());
    }

    #[test]
    fn test_build_router_reports_bad_template() {
        let manifest: RouteManifest =
            serde_yaml::from_str("routes:\n  - method: get\n    path: /a/(b\n").unwrap();
        let err = manifest.build_router().unwrap_err();
        assert!(format!("{err:#}").contains("Route #0"));
    }
}
