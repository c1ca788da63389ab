//! # Pattern Module
//!
//! The pattern module turns route templates and raw expressions into compiled matchers.
//!
//! ## Overview
//!
//! A route is registered with either a string template or a raw [`regex::Regex`].
//! Templates are scanned left to right and rewritten into a regular expression,
//! collecting one [`ParamName`] per capture group as it goes:
//!
//! | Template        | Matches                  | Captures                      |
//! |-----------------|--------------------------|-------------------------------|
//! | `/user/:user`   | `/user/kazupon`          | `user = "kazupon"`            |
//! | `/user/:op?`    | `/user`, `/user/edit`    | `op` absent or `"edit"`       |
//! | `/:name.:fmt`   | `/foo.json`              | `name = "foo"`, `fmt = "json"`|
//! | `/user/:user*`  | `/user/122/aaa`          | `user = "122"`                |
//! | `/api/:res(*)`  | `/api/users/0.json`      | `res = "users/0.json"`        |
//! | `/file/*`       | `/file/js/app.js`        | positional `"js/app.js"`      |
//!
//! Raw expressions are used verbatim and every group in them is positional.
//!
//! ## Escaping
//!
//! Only delimiter-level syntax is rewritten: `/` and `.` match literally, `*`
//! becomes a wildcard capture and `:name` becomes a parameter. Everything
//! else, including pre-escaped sequences such as `\d+`, character classes
//! and parenthesized groups, is handed to the regex engine untouched.
//! Parenthesized groups count as positional captures.
//!
//! ## Example
//!
//! ```rust
//! use chainrouter::pattern::{compile, CompileOptions};
//!
//! let pattern = compile("/user/:user/:op?", CompileOptions::default()).unwrap();
//! let params = pattern.captures("/user/kazupon/edit").unwrap();
//! assert_eq!(params.get("user"), Some("kazupon"));
//! assert_eq!(params.get("op"), Some("edit"));
//! assert!(pattern.captures("/user/kazupon/edit/more").is_none());
//! ```

mod core;

pub use core::{compile, CompileOptions, CompiledPattern, ParamName, RouteSpec};
