//! # CLI Module
//!
//! Command-line access to the pattern compiler and route matcher.
//!
//! ## Commands
//!
//! ### `compile`
//!
//! Print the regex and parameter list a path template compiles to:
//!
//! ```bash
//! chainrouter compile '/user/:id.:format?' --strict
//! ```
//!
//! ### `match`
//!
//! Load a route manifest (YAML or TOML) and report the first route a
//! request would reach, as JSON on stdout. Exits with status 1 when no
//! route matches.
//!
//! ```bash
//! chainrouter match --routes routes.yaml --method GET /user/42
//! ```
//!
//! A manifest looks like:
//!
//! ```yaml
//! config:
//!   strict: true
//! routes:
//!   - method: get
//!     path: /user/:id
//!   - method: get
//!     path: ^/files/(.*)$
//!     regex: true
//! ```

mod commands;
mod manifest;

pub use commands::{run_cli, Cli, Commands};
pub use manifest::{ManifestRoute, RouteManifest};
