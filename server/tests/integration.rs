//! Full CRUD lifecycle over real HTTP.
//!
//! # Design
//! Binds the app, backed by an `InMemoryStore`, to a random port on a
//! background thread, then drives every endpoint with ureq. Covers what the
//! oneshot tests cannot: the listener, the serve loop and CORS headers on a
//! live connection.

use std::sync::Arc;

use serde_json::Value;
use todo_core::InMemoryStore;
use todo_server::{app, TodoService};

struct Response {
    status: u16,
    body: Value,
    allow_origin: Option<String>,
}

fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let service = TodoService::new(Arc::new(InMemoryStore::new()));
            todo_server::run(listener, app(service, None), std::future::pending()).await
        })
    });

    format!("http://{addr}/api/todos")
}

fn call(method: &str, url: &str, body: Option<&str>) -> Response {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let origin = "http://localhost:5173";

    let result = match (method, body) {
        ("GET", _) => agent.get(url).header("Origin", origin).call(),
        ("DELETE", _) => agent.delete(url).header("Origin", origin).call(),
        ("POST", Some(body)) => agent
            .post(url)
            .header("Origin", origin)
            .content_type("application/json")
            .send(body.as_bytes()),
        ("PATCH", Some(body)) => agent
            .patch(url)
            .header("Origin", origin)
            .content_type("application/json")
            .send(body.as_bytes()),
        ("PUT", Some(body)) => agent
            .put(url)
            .header("Origin", origin)
            .content_type("application/json")
            .send(body.as_bytes()),
        _ => panic!("unsupported request {method} {url}"),
    };
    let mut response = result.expect("HTTP transport error");

    let status = response.status().as_u16();
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.body_mut().read_to_string().unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);

    Response {
        status,
        body,
        allow_origin,
    }
}

#[test]
fn crud_lifecycle() {
    let base = spawn_server();

    // empty list is an array, with CORS headers on the live response
    let resp = call("GET", &base, None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, Value::Array(Vec::new()));
    assert_eq!(resp.allow_origin.as_deref(), Some("*"));

    // create
    let resp = call("POST", &base, Some(r#"{"title":"Walk dog","body":"Around the park"}"#));
    assert_eq!(resp.status, 201);
    let id = resp.body["_id"].as_str().unwrap().to_string();
    assert_eq!(resp.body["completed"], false);
    let item = format!("{base}/{id}");

    // get
    let resp = call("GET", &item, None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["title"], "Walk dog");

    // partial update
    let resp = call("PATCH", &item, Some(r#"{"completed":true}"#));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["success"], true);
    let resp = call("GET", &item, None);
    assert_eq!(resp.body["completed"], true);
    assert_eq!(resp.body["body"], "Around the park");

    // replace
    let resp = call("PUT", &item, Some(r#"{"title":"Walk cat","body":"Indoors"}"#));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["_id"], id.as_str());
    let resp = call("GET", &item, None);
    assert_eq!(resp.body["title"], "Walk cat");
    assert_eq!(resp.body["completed"], false);

    // list
    let resp = call("GET", &base, None);
    assert_eq!(resp.body.as_array().unwrap().len(), 1);

    // delete, then it is gone
    let resp = call("DELETE", &item, None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["success"], true);
    assert_eq!(call("GET", &item, None).status, 404);
    assert_eq!(call("DELETE", &item, None).status, 404);
}
