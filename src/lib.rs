//! # tsu-middleware
//!
//! A single-pass middleware chain for tsu services.
//! One queue in, one response out.
//!
//! ## The contract
//!
//! Give the runner an ordered queue of [`Middleware`]. On every
//! [`run`](MiddlewareRunner::run) it compiles that queue into a fresh set of
//! [`Stages`] and walks them front to back, exactly once. Each middleware
//! receives the request plus a [`Handler`] for the rest of the chain and
//! decides whether to call it.
//!
//! What the runner deliberately does not do:
//!
//! - **Parallel stages**: the chain is a plain call stack, one stage at a time.
//! - **Retries or re-entry**: the stage cursor only moves forward.
//! - **Unwinding hooks**: stages skipped by a short-circuit simply never run.
//! - **Error recovery**: a misconfigured chain fails loudly; a middleware's own
//!   error travels back to the caller untouched.
//!
//! Routing and transport are someone else's job. The runner only needs a
//! [`Request`] and produces a [`Response`], both plain [`http`] types.
//!
//! ## Quick start
//!
//! ```rust
//! use http::StatusCode;
//! use tsu_middleware::middleware::{from_fn, terminal};
//! use tsu_middleware::{Handler, Layer, MiddlewareRunner, Request};
//!
//! let mut runner = MiddlewareRunner::new(vec![
//!     Layer::middleware(terminal(|req: Request| format!("hello {}", req.uri().path()))),
//! ]);
//!
//! // `add` prepends: the auth check runs before the endpoint.
//! runner.add(from_fn("auth", |req, next| {
//!     if req.headers().contains_key("authorization") {
//!         next.handle(req)
//!     } else {
//!         Ok(tsu_middleware::response::status(StatusCode::UNAUTHORIZED))
//!     }
//! }));
//!
//! let req = http::Request::builder()
//!     .uri("/world")
//!     .header("authorization", "Bearer t0k3n")
//!     .body(Default::default())
//!     .unwrap();
//! let res = runner.run(req).unwrap();
//! assert_eq!(res.body().as_ref(), b"hello /world");
//!
//! let res = runner.run(Request::new(Default::default())).unwrap();
//! assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
//! ```
//!
//! ## Logging
//!
//! The runner emits [`tracing`] events: a `middleware_chain` debug span per
//! run, one trace event per dispatched stage, and an error event for every
//! configuration failure. Install any subscriber to see them.

mod error;
mod handler;
mod request;
mod runner;
mod stages;

pub mod middleware;
pub mod response;

pub use error::{BoxError, Error};
pub use handler::Handler;
pub use middleware::{Layer, Middleware};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use runner::MiddlewareRunner;
pub use stages::Stages;
