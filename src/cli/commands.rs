use super::manifest::RouteManifest;
use crate::params::Params;
use crate::pattern::{compile, CompileOptions, ParamName};
use crate::server::Request;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

/// Command-line interface for chainrouter
#[derive(Parser)]
#[command(name = "chainrouter")]
#[command(about = "Express-style path compiler and route matcher", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a path template and print the resulting regex and parameters
    Compile {
        /// Path template, e.g. `/user/:id.:format?`
        template: String,

        /// Case-sensitive matching
        #[arg(long, default_value_t = false)]
        sensitive: bool,

        /// Exact trailing-slash matching
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Match the template as a prefix instead of the whole path
        #[arg(long, default_value_t = false)]
        prefix: bool,
    },
    /// Report which route in a manifest a request would reach
    Match {
        /// Route manifest (.yaml, .yml or .toml)
        #[arg(short, long)]
        routes: PathBuf,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request target, e.g. `/user/42?tab=posts`
        url: String,
    },
}

/// Run a parsed command line
///
/// # Errors
///
/// Returns an error when a template fails to compile or the manifest cannot
/// be loaded. A request that matches nothing is not an error; it yields
/// exit status 1.
pub fn run_cli(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Compile {
            template,
            sensitive,
            strict,
            prefix,
        } => {
            let options = CompileOptions {
                sensitive,
                strict,
                end: !prefix,
            };
            let pattern = compile(template.as_str(), options)
                .with_context(|| format!("Failed to compile '{template}'"))?;
            println!("regex:  {}", pattern.matcher().as_str());
            println!("params: {}", describe_params(pattern.param_names()));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Match {
            routes,
            method,
            url,
        } => {
            let manifest = RouteManifest::load(&routes)?;
            let router = manifest.build_router()?;
            info!(routes = router.table().len(), manifest = %routes.display(), "Manifest loaded");

            let mut req = Request::new(method, url);
            let Some(found) = router.match_request(&mut req, 0) else {
                debug!(method = %req.method(), url = %req.url(), "No route matched");
                println!("{}", json!({ "matched": false }));
                return Ok(ExitCode::FAILURE);
            };

            let report = json!({
                "matched": true,
                "method": found.route.method(),
                "route": found.route.spec().as_str(),
                "index": found.index,
                "regex": found.route.pattern().matcher().as_str(),
                "pathname": req.pathname(),
                "params": params_json(&found.params),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn describe_params(names: &[ParamName]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    let mut positional = 0usize;
    names
        .iter()
        .map(|name| match name.name() {
            Some(name) => name.to_string(),
            None => {
                positional += 1;
                format!("${}", positional - 1)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn params_json(params: &Params) -> Value {
    let named: Map<String, Value> = params
        .named()
        .map(|(k, v)| (k.to_string(), v.map_or(Value::Null, Value::from)))
        .collect();
    let positional: Vec<Value> = params
        .positionals()
        .map(|v| v.map_or(Value::Null, Value::from))
        .collect();
    json!({ "named": named, "positional": positional })
}
