//! Incoming request type.
//!
//! The chain does not parse or inspect requests; it only moves them from one
//! stage to the next. A standard [`http::Request`] with a [`Bytes`] body is
//! all it needs, and lets middleware use the whole `http` API (headers,
//! extensions, URI) to read and rewrite what they pass along.

use bytes::Bytes;

/// A request travelling through the chain.
pub type Request = http::Request<Bytes>;
