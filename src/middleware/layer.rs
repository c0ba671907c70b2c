//! Queue entries.

use std::fmt;
use std::sync::Arc;

use super::Middleware;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A type-erased request handler, shared across concurrent runs.
pub type BoxedEndpoint = Arc<dyn Fn(Request) -> Response + Send + Sync + 'static>;

/// One entry in a [`MiddlewareRunner`](crate::MiddlewareRunner) queue.
///
/// The queue accepts any layer; whether every entry actually is middleware is
/// checked when the chain is compiled, at the start of each
/// [`run`](crate::MiddlewareRunner::run). `Arc` makes cloning a queue (and
/// compiling it) one reference-count bump per entry.
#[derive(Clone)]
pub enum Layer {
    /// A middleware stage.
    Middleware(Arc<dyn Middleware>),
    /// A bare request handler. It has no way to receive the rest of the chain
    /// and is rejected at compilation; adapt it with
    /// [`terminal`](super::terminal) instead.
    Handler(BoxedEndpoint),
}

impl Layer {
    pub fn middleware(middleware: impl Middleware) -> Self {
        Self::Middleware(Arc::new(middleware))
    }

    pub fn handler<F, R>(func: F) -> Self
    where
        F: Fn(Request) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        Self::Handler(Arc::new(move |req: Request| func(req).into_response()))
    }

    /// What kind of entry this is, as reported in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Middleware(_) => "middleware",
            Self::Handler(_) => "request handler",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Middleware(m) => m.name(),
            Self::Handler(_) => "handler",
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind()).field(&self.name()).finish()
    }
}
