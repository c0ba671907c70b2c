//! Outgoing response type, shortcuts, and the [`IntoResponse`] conversion trait.
//!
//! A middleware either returns what the rest of the chain produced or builds
//! its own [`Response`]. The shortcuts cover the common 200/status-only cases;
//! reach for [`http::Response::builder`] for anything else.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;

/// A response travelling back up the chain.
pub type Response = http::Response<Bytes>;

// ── Shortcuts ─────────────────────────────────────────────────────────────────

/// `200 OK` — `text/plain; charset=utf-8`.
///
/// ```rust
/// use tsu_middleware::response;
///
/// let res = response::text("hello");
/// assert_eq!(res.status(), 200);
/// assert_eq!(res.body().as_ref(), b"hello");
/// ```
pub fn text(body: impl Into<String>) -> Response {
    with_content_type("text/plain; charset=utf-8", Bytes::from(body.into()))
}

/// `200 OK` — `application/json`.
///
/// Pass bytes from your serialiser directly; the chain never looks at them.
pub fn json(body: impl Into<Bytes>) -> Response {
    with_content_type("application/json", body.into())
}

/// Response with the given status and no body.
pub fn status(code: StatusCode) -> Response {
    let mut res = Response::new(Bytes::new());
    *res.status_mut() = code;
    res
}

fn with_content_type(content_type: &'static str, body: Bytes) -> Response {
    let mut res = Response::new(body);
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    res
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into a [`Response`].
///
/// Used by [`terminal`](crate::middleware::terminal) so endpoint closures can
/// return whatever reads best at the call site.
///
/// ```rust
/// use http::StatusCode;
/// use tsu_middleware::IntoResponse;
///
/// let res = (StatusCode::UNAUTHORIZED, "missing token").into_response();
/// assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
/// assert_eq!(res.body().as_ref(), b"missing token");
/// ```
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { text(self) }
}

/// Return a [`StatusCode`] directly: `StatusCode::NO_CONTENT`.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { status(self) }
}

impl IntoResponse for (StatusCode, &'static str) {
    fn into_response(self) -> Response {
        let mut res = text(self.1);
        *res.status_mut() = self.0;
        res
    }
}

impl IntoResponse for (StatusCode, String) {
    fn into_response(self) -> Response {
        let mut res = text(self.1);
        *res.status_mut() = self.0;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_set_content_type() {
        let res = json(r#"{"id":1}"#);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");

        let res = text(String::from("hi"));
        assert_eq!(res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    }

    #[test]
    fn status_only_has_no_body() {
        let res = StatusCode::NO_CONTENT.into_response();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(res.body().is_empty());
        assert!(res.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn owned_message_with_status() {
        let res = (StatusCode::FORBIDDEN, format!("user {} denied", 7)).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.body().as_ref(), b"user 7 denied");
    }
}
