//! Request ID middleware for request tracing.
//!
//! Every request gets an identifier, taken from the `x-request-id` header or
//! generated as a UUID v4. It is stored in request extensions, echoed in the
//! response header, and kept in task-local storage so error bodies can carry
//! it without threading it through handlers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tokio::task_local;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

task_local! {
    static CURRENT_REQUEST_ID: RequestId;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// The id of the request being handled on this task, if any.
    pub fn current() -> Option<RequestId> {
        CURRENT_REQUEST_ID.try_with(|id| id.clone()).ok()
    }

    fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
            .map(|v| RequestId(v.to_string()))
            .unwrap_or_else(|| RequestId(Uuid::new_v4().to_string()))
    }
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_header(request.headers().get(REQUEST_ID_HEADER));

    request.extensions_mut().insert(request_id.clone());

    let mut response = CURRENT_REQUEST_ID
        .scope(request_id.clone(), next.run(request))
        .await;

    if let Ok(value) = HeaderValue::from_str(&request_id.0) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_is_reused() {
        let header = HeaderValue::from_static("abc-123");
        assert_eq!(RequestId::from_header(Some(&header)), RequestId("abc-123".into()));
    }

    #[test]
    fn test_missing_or_oversized_header_generates_uuid() {
        let generated = RequestId::from_header(None);
        assert!(Uuid::parse_str(&generated.0).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let header = HeaderValue::from_str(&long).unwrap();
        assert_ne!(RequestId::from_header(Some(&header)).0, long);
    }

    #[tokio::test]
    async fn test_current_is_scoped() {
        assert!(RequestId::current().is_none());
        let seen = CURRENT_REQUEST_ID
            .scope(RequestId("r-1".into()), async { RequestId::current() })
            .await;
        assert_eq!(seen, Some(RequestId("r-1".into())));
    }
}
