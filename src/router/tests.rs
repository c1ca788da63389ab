use super::{Router, STANDARD_METHODS};
use crate::config::RouterConfig;
use crate::error::CompilationError;
use crate::handler::{handler, Flow, Handler};
use crate::server::Request;

fn noop() -> Handler {
    handler(|_| Ok(Flow::Halt))
}

#[test]
fn test_method_is_normalised() {
    let mut router = Router::new();
    router.route("GET", "/foo", [noop()]).unwrap();
    assert_eq!(router.table().methods(), vec!["get"]);
    assert_eq!(router.table().routes("GET").len(), 1);
    assert_eq!(router.table().routes("get")[0].method(), "get");
}

#[test]
fn test_registration_is_chainable() {
    let mut router = Router::new();
    router
        .get("/a", [noop()])
        .unwrap()
        .post("/a", [noop()])
        .unwrap()
        .delete("/b", [noop()])
        .unwrap();
    assert_eq!(router.table().len(), 3);
    assert_eq!(router.table().methods(), vec!["delete", "get", "post"]);
}

#[test]
fn test_compilation_error_at_registration() {
    let mut router = Router::new();
    let err = router.get("/user/(oops", [noop()]).unwrap_err();
    assert!(matches!(err, CompilationError::UnbalancedGroup { .. }));
    assert!(router.table().is_empty());
}

#[test]
fn test_first_match_in_registration_order() {
    let mut router = Router::new();
    router.get("/foo/:bar?", [noop()]).unwrap();
    router.get("/bar", [noop()]).unwrap();
    router.get("/foo", [noop()]).unwrap();

    let mut req = Request::new("GET", "/foo");
    let found = router.match_request(&mut req, 0).unwrap();
    assert_eq!(found.index, 0);
    assert_eq!(found.route.spec().as_str(), "/foo/:bar?");

    let found = router.match_request(&mut req, found.index + 1).unwrap();
    assert_eq!(found.index, 2);

    assert!(router.match_request(&mut req, 3).is_none());
}

#[test]
fn test_unknown_method_is_no_match() {
    let mut router = Router::new();
    router.get("/foo", [noop()]).unwrap();
    let mut req = Request::new("POST", "/foo");
    assert!(router.match_request(&mut req, 0).is_none());
}

#[test]
fn test_config_reaches_compiler() {
    let mut router = Router::with_config(RouterConfig {
        sensitive: true,
        strict: true,
    });
    router.get("/uSer", [noop()]).unwrap();
    assert!(router.match_request(&mut Request::new("GET", "/uSer"), 0).is_some());
    assert!(router.match_request(&mut Request::new("GET", "/user"), 0).is_none());
    assert!(router.match_request(&mut Request::new("GET", "/uSer/"), 0).is_none());
}

#[test]
fn test_all_registers_every_standard_method() {
    let mut router = Router::new();
    router.all("/ping", [noop()]).unwrap();
    assert_eq!(router.table().len(), STANDARD_METHODS.len());
    for method in STANDARD_METHODS {
        let mut req = Request::new(method.to_uppercase(), "/ping");
        assert!(router.match_request(&mut req, 0).is_some(), "{method}");
    }
}

#[test]
fn test_remove_by_spec() {
    let mut router = Router::new();
    router.get("/a", [noop()]).unwrap();
    router.get("/b", [noop()]).unwrap();
    router.get("/a", [noop()]).unwrap();
    assert_eq!(router.remove("GET", "/a"), 2);
    assert_eq!(router.table().len(), 1);
    assert_eq!(router.remove("get", "/b"), 1);
    assert!(router.table().is_empty());
    assert_eq!(router.remove("get", "/b"), 0);
}
