//! Compiled execution plan.
//!
//! [`Stages`] is what a queue becomes at the start of a run: a frozen,
//! ordered slice of middleware plus a forward-only cursor. Each run compiles
//! its own, so two runs never share a cursor.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::middleware::{Layer, Middleware};

/// An ordered, single-traversal sequence of middleware.
///
/// Positions are tracked by index, so the same middleware instance queued
/// twice runs twice. The cursor only moves forward.
#[derive(Clone)]
pub struct Stages {
    plan: Arc<[Arc<dyn Middleware>]>,
    cursor: usize,
}

impl Stages {
    /// Compiles `queue` into stages positioned at the first entry.
    ///
    /// Every entry must be [`Layer::Middleware`]; the first one that is not
    /// fails the whole compilation with [`Error::InvalidMiddleware`].
    ///
    /// ```rust
    /// use tsu_middleware::{Layer, Stages};
    /// use tsu_middleware::middleware::terminal;
    ///
    /// let stages = Stages::compile(&[Layer::middleware(terminal(|_req| "ok"))]).unwrap();
    /// assert_eq!(stages.len(), 1);
    /// assert_eq!(stages.position(), 0);
    ///
    /// let err = Stages::compile(&[Layer::handler(|_req| "ok")]).unwrap_err();
    /// assert!(err.is_configuration());
    /// ```
    pub fn compile(queue: &[Layer]) -> Result<Self, Error> {
        let plan = queue
            .iter()
            .enumerate()
            .map(|(position, layer)| match layer {
                Layer::Middleware(m) => Ok(Arc::clone(m)),
                other => Err(Error::InvalidMiddleware { position, found: other.kind() }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { plan: plan.into(), cursor: 0 })
    }

    /// Total number of stages.
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// Number of stages already dispatched.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Stage names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.plan.iter().map(|m| m.name()).collect()
    }

    /// Returns the current stage and moves the cursor past it.
    pub(crate) fn advance(&mut self) -> Result<Arc<dyn Middleware>, Error> {
        let stage = self
            .plan
            .get(self.cursor)
            .cloned()
            .ok_or(Error::ChainExhausted { stages: self.plan.len() })?;
        self.cursor += 1;
        Ok(stage)
    }
}

impl fmt::Debug for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stages")
            .field("plan", &self.names())
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::middleware::{from_fn, terminal};
    use crate::request::Request;

    fn pass(name: &'static str) -> Layer {
        Layer::middleware(from_fn(name, |req: Request, next: &mut dyn Handler| next.handle(req)))
    }

    #[test]
    fn compile_keeps_queue_order() {
        let stages = Stages::compile(&[pass("a"), pass("b"), pass("c")]).unwrap();
        assert_eq!(stages.names(), ["a", "b", "c"]);
        assert_eq!(stages.position(), 0);
    }

    #[test]
    fn same_instance_queued_twice_is_two_stages() {
        let shared = pass("twice");
        let stages = Stages::compile(&[shared.clone(), shared]).unwrap();
        assert_eq!(stages.len(), 2);
    }

    #[test]
    fn compile_reports_first_invalid_position() {
        let queue = [pass("a"), Layer::handler(|_req: Request| "x"), Layer::handler(|_req: Request| "y")];
        match Stages::compile(&queue) {
            Err(Error::InvalidMiddleware { position, found }) => {
                assert_eq!(position, 1);
                assert_eq!(found, "request handler");
            }
            other => panic!("expected InvalidMiddleware, got {other:?}"),
        }
    }

    #[test]
    fn advance_is_forward_only_and_bounded() {
        let end = Layer::middleware(terminal(|_req: Request| "end"));
        let mut stages = Stages::compile(&[pass("a"), end]).unwrap();

        assert_eq!(stages.advance().unwrap().name(), "a");
        assert_eq!(stages.advance().unwrap().name(), "terminal");
        assert_eq!(stages.position(), 2);

        let err = stages.advance().map(|_| ()).unwrap_err();
        assert!(matches!(err, Error::ChainExhausted { stages: 2 }));
        assert_eq!(stages.position(), 2);
    }

    #[test]
    fn empty_queue_compiles_to_empty_stages() {
        let stages = Stages::compile(&[]).unwrap();
        assert!(stages.is_empty());
        assert!(stages.names().is_empty());
    }
}
