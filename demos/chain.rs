//! Minimal tsu-middleware example — a request-id, auth, and timing chain in
//! front of a JSON endpoint.
//!
//! Run with:
//!   RUST_LOG=trace cargo run --example chain

use std::time::Instant;

use http::{HeaderValue, StatusCode};
use tsu_middleware::middleware::{from_fn, terminal};
use tsu_middleware::{Error, Handler, Layer, Middleware, MiddlewareRunner, Request, Response, response};

fn main() {
    tracing_subscriber::fmt::init();

    let mut app = MiddlewareRunner::new(vec![
        Layer::middleware(RequireToken),
        Layer::middleware(terminal(get_user)),
    ]);
    // `add` prepends, so these end up in front of the auth check.
    app.add(from_fn("timing", |req, next| {
        let start = Instant::now();
        let res = next.handle(req);
        tracing::info!(elapsed_us = start.elapsed().as_micros() as u64, "request served");
        res
    }))
    .add(from_fn("request_id", |mut req, next| {
        let id = HeaderValue::from_static("req-0001");
        req.headers_mut().insert("x-request-id", id.clone());
        let mut res = next.handle(req)?;
        res.headers_mut().insert("x-request-id", id);
        Ok(res)
    }));

    for token in [Some("Bearer s3cr3t"), None] {
        let mut req = http::Request::builder().uri("/users/42");
        if let Some(token) = token {
            req = req.header("authorization", token);
        }
        let req = req.body(Default::default()).expect("valid request");

        match app.run(req) {
            Ok(res) => println!("{} {}", res.status(), String::from_utf8_lossy(res.body())),
            Err(e) => eprintln!("chain error: {e}"),
        }
    }
}

// Short-circuits with 401 when the request carries no bearer token.
struct RequireToken;

impl Middleware for RequireToken {
    fn name(&self) -> &'static str {
        "require_token"
    }

    fn process(&self, req: Request, next: &mut dyn Handler) -> Result<Response, Error> {
        let authorized = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Bearer "));

        if authorized {
            next.handle(req)
        } else {
            Ok(response::status(StatusCode::UNAUTHORIZED))
        }
    }
}

// GET /users/:id
fn get_user(req: Request) -> Response {
    let id = req.uri().path().rsplit('/').next().unwrap_or("unknown");
    response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#))
}
