use chainrouter::middleware::{error_middleware, TracingMiddleware};
use chainrouter::{
    error_handler, handler, Flow, HandlerFault, MiddlewareStack, Request, Response, Router,
};
use std::sync::{Arc, Mutex};

type Trace = Arc<Mutex<Vec<String>>>;

fn step(trace: &Trace, label: &'static str, flow: fn() -> Flow) -> chainrouter::Handler {
    let trace = Arc::clone(trace);
    handler(move |_| {
        trace.lock().unwrap().push(label.to_string());
        Ok(flow())
    })
}

fn run(router: &Router, method: &str, url: &str) -> (Response, Option<Option<String>>) {
    let mut req = Request::new(method, url);
    let mut res = Response::new();
    let mut fallback = None;
    router.dispatch(&mut req, &mut res, |_, _, err| {
        fallback = Some(err.map(|e| e.to_string()));
    });
    (res, fallback)
}

#[test]
fn test_handlers_run_in_order_until_halt() {
    let trace = Trace::default();
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                step(&trace, "one", || Flow::Next),
                step(&trace, "two", || Flow::Halt),
                step(&trace, "three", || Flow::Next),
            ],
        )
        .unwrap();

    let (_, fallback) = run(&router, "GET", "/a");
    assert!(fallback.is_none());
    assert_eq!(*trace.lock().unwrap(), vec!["one", "two"]);
}

#[test]
fn test_exhausted_chain_falls_through_then_to_fallback() {
    let trace = Trace::default();
    let mut router = Router::new();
    router
        .get("/a", [step(&trace, "first", || Flow::Next)])
        .unwrap()
        .get("/b", [step(&trace, "other path", || Flow::Halt)])
        .unwrap()
        .get("/:any", [step(&trace, "second", || Flow::Next)])
        .unwrap();

    let (_, fallback) = run(&router, "GET", "/a");
    assert_eq!(fallback, Some(None));
    assert_eq!(*trace.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_error_skips_normal_handlers_until_error_aware() {
    let trace = Trace::default();
    let seen = Arc::clone(&trace);
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                handler(|_| Err(anyhow::anyhow!("bad input"))),
                step(&trace, "skipped", || Flow::Halt),
                error_handler(move |cx, err| {
                    seen.lock().unwrap().push(format!("recovered: {err}"));
                    cx.response.set_status(400);
                    cx.response.end(err.to_string());
                    Ok(Flow::Halt)
                }),
            ],
        )
        .unwrap();

    let (res, fallback) = run(&router, "GET", "/a");
    assert!(fallback.is_none());
    assert_eq!(res.status(), 400);
    assert_eq!(res.body_str(), Some("bad input"));
    assert_eq!(*trace.lock().unwrap(), vec!["recovered: bad input"]);
}

#[test]
fn test_error_aware_handler_skipped_without_error() {
    let trace = Trace::default();
    let seen = Arc::clone(&trace);
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                error_handler(move |_, _| {
                    seen.lock().unwrap().push("error handler".to_string());
                    Ok(Flow::Halt)
                }),
                step(&trace, "normal", || Flow::Halt),
            ],
        )
        .unwrap();

    run(&router, "GET", "/a");
    assert_eq!(*trace.lock().unwrap(), vec!["normal"]);
}

#[test]
fn test_error_handler_can_clear_error() {
    let trace = Trace::default();
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                handler(|_| Ok(Flow::fail(std::io::Error::other("disk")))),
                error_handler(|_, _| Ok(Flow::Next)),
                step(&trace, "after recovery", || Flow::Halt),
            ],
        )
        .unwrap();

    let (_, fallback) = run(&router, "GET", "/a");
    assert!(fallback.is_none());
    assert_eq!(*trace.lock().unwrap(), vec!["after recovery"]);
}

#[test]
fn test_error_does_not_leak_into_next_route() {
    let trace = Trace::default();
    let mut router = Router::new();
    router
        .get("/a", [handler(|_| anyhow::bail!("first route failed"))])
        .unwrap()
        .get("/a", [step(&trace, "second route", || Flow::Halt)])
        .unwrap();

    let (_, fallback) = run(&router, "GET", "/a");
    assert_eq!(fallback, Some(Some("first route failed".to_string())));
    assert!(trace.lock().unwrap().is_empty());
}

#[test]
fn test_panic_is_folded_into_error_channel() {
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                handler(|_| panic!("handler exploded")),
                error_handler(|cx, err| {
                    let fault = err.downcast_ref::<HandlerFault>().expect("handler fault");
                    let HandlerFault::Panicked { message, .. } = fault;
                    cx.response.set_status(500);
                    cx.response.end(message.clone());
                    Ok(Flow::Halt)
                }),
            ],
        )
        .unwrap();

    let (res, fallback) = run(&router, "GET", "/a");
    assert!(fallback.is_none());
    assert_eq!(res.status(), 500);
    assert_eq!(res.body_str(), Some("handler exploded"));
}

#[test]
fn test_next_route_abandons_remaining_handlers() {
    let trace = Trace::default();
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                step(&trace, "skip", || Flow::NextRoute),
                step(&trace, "never", || Flow::Halt),
            ],
        )
        .unwrap()
        .get("/a", [step(&trace, "next route", || Flow::Halt)])
        .unwrap();

    let (_, fallback) = run(&router, "GET", "/a");
    assert!(fallback.is_none());
    assert_eq!(*trace.lock().unwrap(), vec!["skip", "next route"]);
}

#[test]
fn test_no_route_calls_fallback_without_error() {
    let router = Router::new();
    let (res, fallback) = run(&router, "GET", "/missing");
    assert_eq!(fallback, Some(None));
    assert!(!res.is_finished());
}

#[test]
fn test_url_rewrite_is_seen_by_later_routes() {
    let mut router = Router::new();
    router
        .get(
            "/old/:id",
            [handler(|cx| {
                let id = cx.params.get("id").unwrap_or_default().to_string();
                cx.request.set_url(format!("/new/{id}"));
                Ok(Flow::Next)
            })],
        )
        .unwrap()
        .get(
            "/new/:id",
            [handler(|cx| {
                cx.response.end(format!("new {}", cx.params.get("id").unwrap_or_default()));
                Ok(Flow::Halt)
            })],
        )
        .unwrap();

    let (res, _) = run(&router, "GET", "/old/7?x=1");
    assert_eq!(res.body_str(), Some("new 7"));
}

#[test]
fn test_context_exposes_request_and_route() {
    let mut router = Router::new();
    router
        .get(
            "/search",
            [handler(|cx| {
                let q = cx.request.query_param("q").unwrap_or_default();
                let body = format!("{} {q}", cx.route());
                cx.response.end(body);
                Ok(Flow::Halt)
            })],
        )
        .unwrap();

    let (res, _) = run(&router, "GET", "/search?q=rust");
    assert_eq!(res.body_str(), Some("/search rust"));
}

#[test]
fn test_writes_after_end_are_ignored() {
    let mut router = Router::new();
    router
        .get(
            "/a",
            [
                handler(|cx| {
                    cx.response.end("first");
                    Ok(Flow::Next)
                }),
                handler(|cx| {
                    cx.response.set_status(500);
                    cx.response.end(" second");
                    Ok(Flow::Halt)
                }),
            ],
        )
        .unwrap();

    let (res, _) = run(&router, "GET", "/a");
    assert_eq!(res.status(), 200);
    assert_eq!(res.body_str(), Some("first"));
}

#[test]
fn test_stack_answers_unmatched_request_with_404() {
    let stack = MiddlewareStack::new()
        .with(Arc::new(TracingMiddleware))
        .with(Arc::new(Router::new()));

    let mut req = Request::new("GET", "/nowhere?x=1");
    let mut res = Response::new();
    stack.run(&mut req, &mut res);
    assert_eq!(res.status(), 404);
    assert_eq!(res.body_str(), Some("Cannot GET /nowhere"));
}

#[test]
fn test_stack_404_uses_pathname_after_fallthrough() {
    let trace = Trace::default();
    let mut router = Router::new();
    router.get("/foo", [step(&trace, "first", || Flow::Next)]).unwrap();

    let stack = MiddlewareStack::new().with(Arc::new(router));
    let mut req = Request::new("GET", "/FOO/?x=1");
    let mut res = Response::new();
    stack.run(&mut req, &mut res);

    assert_eq!(*trace.lock().unwrap(), vec!["first"]);
    assert_eq!(res.status(), 404);
    assert_eq!(res.body_str(), Some("Cannot GET /FOO/"));
    assert_eq!(res.header("content-type"), Some("text/plain"));
}

#[test]
fn test_stack_routes_errors_to_error_middleware() {
    let mut router = Router::new();
    router.get("/a", [handler(|_| anyhow::bail!("kaboom"))]).unwrap();

    let stack = MiddlewareStack::new()
        .with(Arc::new(router))
        .with(error_middleware(|err, _, res| {
            res.set_status(503);
            res.end(format!("handled: {err}"));
        }));

    let mut req = Request::new("GET", "/a");
    let mut res = Response::new();
    stack.run(&mut req, &mut res);
    assert_eq!(res.status(), 503);
    assert_eq!(res.body_str(), Some("handled: kaboom"));
}

#[test]
fn test_stack_unhandled_error_becomes_500() {
    let mut router = Router::new();
    router.get("/a", [handler(|_| anyhow::bail!("kaboom"))]).unwrap();

    let stack = MiddlewareStack::new().with(Arc::new(router));
    let mut req = Request::new("GET", "/a");
    let mut res = Response::new();
    stack.run(&mut req, &mut res);
    assert_eq!(res.status(), 500);
    assert_eq!(res.body_str(), Some("Internal Server Error"));
}

#[test]
fn test_stack_leaves_finished_response_alone() {
    let mut router = Router::new();
    router
        .get(
            "/a",
            [handler(|cx| {
                cx.response.end("done");
                Ok(Flow::Next)
            })],
        )
        .unwrap();

    let stack = MiddlewareStack::new().with(Arc::new(router));
    let mut req = Request::new("GET", "/a");
    let mut res = Response::new();
    stack.run(&mut req, &mut res);
    assert_eq!(res.status(), 200);
    assert_eq!(res.body_str(), Some("done"));
}
