//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: tracing, request-id injection, authentication
//! checks, response decoration. Each middleware gets the request and a
//! [`Handler`] for the rest of the chain, and decides for itself:
//!
//! - call `next.handle(req)` to continue, optionally rewriting the request
//!   first and the response afterwards, or
//! - return a response without calling `next`, which short-circuits every
//!   stage after it.
//!
//! Three ways to get one:
//!
//! - implement [`Middleware`] on your own type,
//! - wrap a closure with [`from_fn`],
//! - adapt a plain request handler with [`terminal`] (it always answers and
//!   never delegates, so it belongs at the end of the queue).

mod layer;

pub use layer::{BoxedEndpoint, Layer};

use crate::error::Error;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A unit of request processing.
///
/// Implementations must return a response and may call `next.handle(..)` at
/// most once. Errors coming back from `next` should be returned as they are;
/// the chain does not wrap them.
///
/// ```rust
/// use http::HeaderValue;
/// use tsu_middleware::{Error, Handler, Middleware, Request, Response};
///
/// struct PoweredBy;
///
/// impl Middleware for PoweredBy {
///     fn name(&self) -> &'static str { "powered_by" }
///
///     fn process(&self, req: Request, next: &mut dyn Handler) -> Result<Response, Error> {
///         let mut res = next.handle(req)?;
///         res.headers_mut().insert("x-powered-by", HeaderValue::from_static("tsu"));
///         Ok(res)
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs and stage listings. Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn process(&self, request: Request, next: &mut dyn Handler) -> Result<Response, Error>;
}

// ── Closure middleware ────────────────────────────────────────────────────────

/// Middleware built from a closure. Obtain via [`from_fn`].
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

/// Turns a closure into middleware.
///
/// ```rust
/// use tsu_middleware::Handler;
/// use tsu_middleware::middleware::from_fn;
///
/// let strip_prefix = from_fn("strip_api_prefix", |mut req, next| {
///     let path = req.uri().path().trim_start_matches("/api").to_owned();
///     *req.uri_mut() = path.parse::<http::Uri>().map_err(tsu_middleware::Error::middleware)?;
///     next.handle(req)
/// });
/// ```
pub fn from_fn<F>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: Fn(Request, &mut dyn Handler) -> Result<Response, Error> + Send + Sync + 'static,
{
    FnMiddleware { name, func }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Request, &mut dyn Handler) -> Result<Response, Error> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process(&self, request: Request, next: &mut dyn Handler) -> Result<Response, Error> {
        (self.func)(request, next)
    }
}

// ── Terminal adapter ──────────────────────────────────────────────────────────

/// Middleware that answers every request itself. Obtain via [`terminal`].
pub struct Terminal<F> {
    func: F,
}

/// Adapts a request handler into middleware that never delegates.
///
/// This is how an endpoint joins the queue: a bare handler placed there with
/// [`Layer::handler`] is rejected when the chain is compiled.
///
/// ```rust
/// use http::StatusCode;
/// use tsu_middleware::middleware::terminal;
///
/// let not_found = terminal(|_req| StatusCode::NOT_FOUND);
/// ```
pub fn terminal<F, R>(func: F) -> Terminal<F>
where
    F: Fn(Request) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    Terminal { func }
}

impl<F, R> Middleware for Terminal<F>
where
    F: Fn(Request) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn process(&self, request: Request, _next: &mut dyn Handler) -> Result<Response, Error> {
        Ok((self.func)(request).into_response())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::response;

    fn request(path: &str) -> Request {
        http::Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    struct Named;

    impl Middleware for Named {
        fn process(&self, req: Request, next: &mut dyn Handler) -> Result<Response, Error> {
            next.handle(req)
        }
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Named.name().ends_with("Named"));
    }

    #[test]
    fn from_fn_rewrites_request_and_response() {
        let mw = from_fn("upper", |mut req, next| {
            req.headers_mut().insert("x-seen", "1".parse().unwrap());
            let res = next.handle(req)?;
            Ok(response::text(String::from_utf8_lossy(res.body()).to_uppercase()))
        });
        assert_eq!(mw.name(), "upper");

        let mut next = |req: Request| -> Result<Response, Error> {
            assert_eq!(req.headers()["x-seen"], "1");
            Ok(response::text("inner"))
        };
        let res = mw.process(request("/"), &mut next).unwrap();
        assert_eq!(res.body().as_ref(), b"INNER");
    }

    #[test]
    fn terminal_never_calls_next() {
        let mw = terminal(|req: Request| (StatusCode::ACCEPTED, req.uri().path().to_owned()));
        let mut next = |_req: Request| -> Result<Response, Error> {
            panic!("terminal middleware must not delegate")
        };
        let res = mw.process(request("/jobs"), &mut next).unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        assert_eq!(res.body().as_ref(), b"/jobs");
    }
}
