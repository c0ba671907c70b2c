//! The middleware chain runner.
//!
//! # Two roles, two instances
//!
//! A [`MiddlewareRunner`] you build holds a queue and nothing else. Calling
//! [`run`](MiddlewareRunner::run) compiles the queue into [`Stages`], moves
//! them into a *second*, execution-scoped runner, and lets that one drive the
//! request. The runner you hold never gets a cursor, so it can serve any
//! number of runs, one after another or from several threads at once.
//!
//! ```rust
//! use tsu_middleware::{Handler, Layer, MiddlewareRunner, Request, response};
//! use tsu_middleware::middleware::{from_fn, terminal};
//!
//! let mut runner = MiddlewareRunner::new(vec![
//!     Layer::middleware(terminal(|_req| response::text("hello"))),
//! ]);
//! runner.add(from_fn("request_id", |mut req, next| {
//!     req.headers_mut().insert("x-request-id", "42".parse().unwrap());
//!     next.handle(req)
//! }));
//!
//! let res = runner.run(Request::new(Default::default())).unwrap();
//! assert_eq!(res.body().as_ref(), b"hello");
//! ```

use tracing::{debug, debug_span, error, trace};

use crate::error::Error;
use crate::handler::Handler;
use crate::middleware::{Layer, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::stages::Stages;

/// An ordered middleware queue that runs as a single-pass chain.
///
/// The most recently [`add`](MiddlewareRunner::add)ed middleware runs first.
/// The queue is validated lazily: entries are only checked when
/// [`run`](MiddlewareRunner::run) compiles them.
#[derive(Clone, Debug, Default)]
pub struct MiddlewareRunner {
    middleware: Vec<Layer>,
    stages: Option<Stages>,
}

impl MiddlewareRunner {
    /// Creates a runner with `middleware` as its queue, in execution order.
    pub fn new(middleware: Vec<Layer>) -> Self {
        Self { middleware, stages: None }
    }

    /// Creates an execution-scoped runner around already compiled stages.
    ///
    /// The queue stays empty; [`handle`](Handler::handle) drives the stages
    /// directly. This is what [`run`](MiddlewareRunner::run) does internally.
    pub fn with_stages(stages: Stages) -> Self {
        Self { middleware: Vec::new(), stages: Some(stages) }
    }

    /// Prepends `middleware` to the queue, so it runs before everything
    /// already queued. Returns `self` for chaining.
    pub fn add(&mut self, middleware: impl Middleware) -> &mut Self {
        self.add_layer(Layer::middleware(middleware))
    }

    /// Prepends an arbitrary queue entry. Not validated until the next run.
    pub fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.middleware.insert(0, layer);
        self
    }

    pub fn middleware(&self) -> &[Layer] {
        &self.middleware
    }

    /// Replaces the whole queue. Not validated until the next run.
    pub fn set_middleware(&mut self, middleware: Vec<Layer>) -> &mut Self {
        self.middleware = middleware;
        self
    }

    /// The stages this runner executes, if it is an execution-scoped runner.
    pub fn stages(&self) -> Option<&Stages> {
        self.stages.as_ref()
    }

    pub fn set_stages(&mut self, stages: Stages) -> &mut Self {
        self.stages = Some(stages);
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Runs `request` through the queue and returns the response the first
    /// stage produced.
    ///
    /// Fails with [`Error::EmptyQueue`] or [`Error::InvalidMiddleware`] before
    /// any middleware runs. After that, whatever the chain returns is passed
    /// back unchanged, errors included.
    pub fn run(&self, request: Request) -> Result<Response, Error> {
        if self.middleware.is_empty() {
            error!("middleware queue is empty");
            return Err(Error::EmptyQueue);
        }

        let stages = Stages::compile(&self.middleware).inspect_err(|e| error!("{e}"))?;
        let total = stages.len();

        let span = debug_span!("middleware_chain", stages = total);
        let _guard = span.enter();

        let mut runner = MiddlewareRunner::with_stages(stages);
        let result = runner.handle(request);

        let executed = runner.stages.as_ref().map_or(0, Stages::position);
        debug!(executed, total, ok = result.is_ok(), "middleware chain finished");
        result
    }
}

impl Handler for MiddlewareRunner {
    /// Dispatches the current stage and advances past it.
    ///
    /// The stage receives this runner as its `next` handler, so each call
    /// moves one step further down the chain.
    fn handle(&mut self, request: Request) -> Result<Response, Error> {
        let Some(stages) = self.stages.as_mut() else {
            error!("handle called on a runner without stages");
            return Err(Error::StagesNotInitialized);
        };

        let position = stages.position();
        let stage = stages.advance().inspect_err(|e| error!("{e}"))?;
        trace!(stage = stage.name(), position, "dispatching middleware");

        stage.process(request, self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::middleware::{from_fn, terminal};

    fn request() -> Request {
        http::Request::builder().uri("/").body(Bytes::new()).unwrap()
    }

    fn tracing_layer(name: &'static str, trace: &Arc<Mutex<Vec<&'static str>>>) -> Layer {
        let trace = Arc::clone(trace);
        Layer::middleware(from_fn(name, move |req, next| {
            trace.lock().unwrap().push(name);
            next.handle(req)
        }))
    }

    #[test]
    fn add_prepends() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let mut runner = MiddlewareRunner::new(vec![tracing_layer("a", &trace)]);
        runner.add_layer(tracing_layer("b", &trace)).add_layer(tracing_layer("c", &trace));

        let names: Vec<_> = runner.middleware().iter().map(Layer::name).collect();
        assert_eq!(names, ["c", "b", "a"]);
        assert_eq!(runner.len(), 3);
    }

    #[test]
    fn set_middleware_does_not_touch_stages() {
        let mut runner = MiddlewareRunner::default();
        runner.set_middleware(vec![Layer::handler(|_req: Request| "x")]);
        assert!(runner.stages().is_none());
        assert!(!runner.is_empty());
    }

    #[test]
    fn handle_on_injected_stages() {
        let stages = Stages::compile(&[Layer::middleware(terminal(|_req: Request| StatusCode::IM_A_TEAPOT))]).unwrap();
        let mut runner = MiddlewareRunner::with_stages(stages);

        let res = runner.handle(request()).unwrap();
        assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(runner.stages().map(Stages::position), Some(1));

        // the cursor does not rewind
        assert!(matches!(runner.handle(request()), Err(Error::ChainExhausted { stages: 1 })));
    }

    #[test]
    fn run_leaves_caller_without_stages() {
        let runner = MiddlewareRunner::new(vec![Layer::middleware(terminal(|_req: Request| "ok"))]);
        runner.run(request()).unwrap();
        assert!(runner.stages().is_none());
    }
}
