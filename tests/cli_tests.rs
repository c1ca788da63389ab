use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const MANIFEST: &str = r#"
config:
  strict: false
routes:
  - method: get
    path: /user/:user/:op?
  - method: GET
    path: /files/*
  - method: post
    path: /user
  - method: get
    path: ^/raw/([0-9]+)$
    regex: true
"#;

fn chainrouter(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chainrouter"))
        .args(args)
        .env("CHAINROUTER_LOG_LEVEL", "error")
        .env_remove("RUST_LOG")
        .output()
        .expect("run chainrouter")
}

fn manifest(dir: &TempDir) -> String {
    let path = dir.path().join("routes.yaml");
    fs::write(&path, MANIFEST).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_compile_prints_regex_and_params() {
    let out = chainrouter(&["compile", "/user/:id.:format?"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("regex:  (?i)^/user/"), "{stdout}");
    assert!(stdout.contains("params: id, format"), "{stdout}");
}

#[test]
fn test_compile_honours_flags() {
    let out = chainrouter(&["compile", "/api", "--sensitive", "--strict", "--prefix"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("regex:  ^/api(?:/|$)"), "{stdout}");
    assert!(stdout.contains("params: (none)"), "{stdout}");
}

#[test]
fn test_compile_rejects_malformed_template() {
    let out = chainrouter(&["compile", "/user/(oops"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Failed to compile"), "{stderr}");
}

#[test]
fn test_match_reports_first_route_as_json() {
    let dir = TempDir::new().unwrap();
    let routes = manifest(&dir);
    let out = chainrouter(&["match", "--routes", &routes, "--method", "GET", "/user/kazupon?tab=1"]);
    assert!(out.status.success());

    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["matched"], true);
    assert_eq!(report["route"], "/user/:user/:op?");
    assert_eq!(report["index"], 0);
    assert_eq!(report["pathname"], "/user/kazupon");
    assert_eq!(report["params"]["named"]["user"], "kazupon");
    assert_eq!(report["params"]["named"]["op"], Value::Null);
}

#[test]
fn test_match_positional_and_raw_regex_routes() {
    let dir = TempDir::new().unwrap();
    let routes = manifest(&dir);

    let out = chainrouter(&["match", "--routes", &routes, "/files/a/b.txt"]);
    assert!(out.status.success());
    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["route"], "/files/*");
    assert_eq!(report["params"]["positional"][0], "a/b.txt");

    let out = chainrouter(&["match", "--routes", &routes, "/raw/42"]);
    assert!(out.status.success());
    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["index"], 2);
    assert_eq!(report["params"]["positional"][0], "42");
}

#[test]
fn test_match_without_route_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let routes = manifest(&dir);
    let out = chainrouter(&["match", "--routes", &routes, "--method", "DELETE", "/user"]);
    assert_eq!(out.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["matched"], false);
}
