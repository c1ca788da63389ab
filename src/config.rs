//! # Router Configuration
//!
//! Matching behaviour that is fixed when a [`crate::Router`] is constructed.
//!
//! ## Options
//!
//! - `sensitive` (default `false`) - case-sensitive path matching
//! - `strict` (default `false`) - `/user` and `/user/` are different routes
//!
//! ## Sources
//!
//! ```rust
//! use chainrouter::config::RouterConfig;
//!
//! let config = RouterConfig::from_yaml_str("strict: true").unwrap();
//! assert!(config.strict);
//! assert!(!config.sensitive);
//! ```
//!
//! ### Environment Variables
//!
//! - `CHAINROUTER_SENSITIVE` - `1`, `true`, `yes` or `on` enables case sensitivity
//! - `CHAINROUTER_STRICT` - same values enable strict trailing-slash matching
//!
//! ### Files
//!
//! [`RouterConfig::load`] accepts `.yaml`/`.yml` and `.toml` files.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Router construction options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Case-sensitive matching
    pub sensitive: bool,
    /// Exact trailing-slash matching
    pub strict: bool,
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            sensitive: env_flag("CHAINROUTER_SENSITIVE"),
            strict: env_flag("CHAINROUTER_STRICT"),
        }
    }

    /// Parse a YAML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this shape.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse router config YAML")
    }

    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this shape.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse router config TOML")
    }

    /// Load configuration from a YAML or TOML file, chosen by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_document(path.as_ref())
    }
}

/// Read a YAML or TOML document into `T`, dispatching on the file extension
pub(crate) fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display())),
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML in {}", path.display())),
        _ => bail!(
            "Unsupported config format for {} (expected .yaml, .yml or .toml)",
            path.display()
        ),
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
