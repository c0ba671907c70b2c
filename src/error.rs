//! Unified error type.

use std::fmt;

/// A boxed, thread-safe error produced by a middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by the chain's fallible operations.
///
/// Application-level outcomes (401, 404, 422, etc.) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// two things only: a misconfigured chain, and a middleware's own failure.
///
/// The configuration variants are programming mistakes. The runner never
/// recovers from them and never skips a bad stage; it fails the current
/// [`run`](crate::MiddlewareRunner::run) and hands the error back.
#[derive(Debug)]
pub enum Error {
    /// [`run`](crate::MiddlewareRunner::run) was called on an empty queue.
    EmptyQueue,

    /// [`handle`](crate::Handler::handle) was called on a runner that never
    /// received compiled stages.
    StagesNotInitialized,

    /// A queue entry does not implement [`Middleware`](crate::Middleware).
    InvalidMiddleware {
        /// Zero-based position of the entry in the queue.
        position: usize,
        /// What was found there instead, e.g. `"request handler"`.
        found: &'static str,
    },

    /// The last stage delegated to its handler; there is nothing left to run.
    ChainExhausted {
        /// Number of stages the chain was compiled with.
        stages: usize,
    },

    /// A middleware failed. Passed through the chain untouched.
    Middleware(BoxError),
}

impl Error {
    /// Wraps a middleware's own failure.
    ///
    /// ```rust
    /// use tsu_middleware::Error;
    ///
    /// let err = Error::middleware("upstream unavailable");
    /// assert!(!err.is_configuration());
    /// assert_eq!(err.to_string(), "middleware: upstream unavailable");
    /// ```
    pub fn middleware(err: impl Into<BoxError>) -> Self {
        Self::Middleware(err.into())
    }

    /// `true` for errors caused by how the chain was put together, as opposed
    /// to a middleware failing while processing a request.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Middleware(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQueue => f.write_str("middleware queue should not be empty"),
            Self::StagesNotInitialized => f.write_str(
                "middleware queue stages have not been set yet; use `MiddlewareRunner::run()`",
            ),
            Self::InvalidMiddleware { position, found } => write!(
                f,
                "queue entry #{position} is a {found}: all middleware should implement \
                 `Middleware`; wrap request handlers with `middleware::terminal`",
            ),
            Self::ChainExhausted { stages } => write!(
                f,
                "middleware chain exhausted after {stages} stage(s): \
                 the last middleware must produce a response",
            ),
            Self::Middleware(e) => write!(f, "middleware: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Middleware(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn configuration_family() {
        assert!(Error::EmptyQueue.is_configuration());
        assert!(Error::StagesNotInitialized.is_configuration());
        assert!(Error::InvalidMiddleware { position: 0, found: "request handler" }.is_configuration());
        assert!(Error::ChainExhausted { stages: 1 }.is_configuration());
        assert!(!Error::middleware("boom").is_configuration());
    }

    #[test]
    fn invalid_middleware_names_the_contract() {
        let msg = Error::InvalidMiddleware { position: 2, found: "request handler" }.to_string();
        assert!(msg.contains("#2"));
        assert!(msg.contains("`Middleware`"));
        assert!(msg.contains("middleware::terminal"));
    }

    #[test]
    fn middleware_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "db timed out");
        let err = Error::middleware(io);
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("db timed out"));
        assert!(Error::EmptyQueue.source().is_none());
    }
}
