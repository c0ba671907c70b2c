//! The Handler contract.
//!
//! A [`Handler`] turns a request into a response. Middleware receive one as
//! their continuation: calling it runs the rest of the chain.
//!
//! ```text
//! runner.run(req)
//!        ↓ compile queue into Stages
//! MiddlewareRunner { stages }              ← execution-scoped runner
//!        ↓ handle(req)
//! stage[0].process(req, &mut runner)       ← runner passed as `next`
//!        ↓ next.handle(req)
//! stage[1].process(req, &mut runner)
//!        ↓ …returns a Response, which bubbles back up the call stack
//! ```
//!
//! Plain closures are handlers too, which makes driving a single middleware
//! in isolation a one-liner:
//!
//! ```rust
//! use tsu_middleware::{Handler, Request, Response, response};
//!
//! let mut ok = |_req: Request| Ok::<Response, tsu_middleware::Error>(response::text("ok"));
//! let res = ok.handle(Request::new(Default::default())).unwrap();
//! assert_eq!(res.body().as_ref(), b"ok");
//! ```

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Anything that can turn a [`Request`] into a [`Response`].
///
/// `handle` takes `&mut self` because the chain runner advances its stage
/// cursor on every call. It is total: it produces a response or fails with an
/// [`Error`]; there are no partial results.
pub trait Handler {
    fn handle(&mut self, request: Request) -> Result<Response, Error>;
}

/// Any `FnMut(Request) -> Result<Response, Error>` is a handler.
impl<F> Handler for F
where
    F: FnMut(Request) -> Result<Response, Error>,
{
    fn handle(&mut self, request: Request) -> Result<Response, Error> {
        self(request)
    }
}
