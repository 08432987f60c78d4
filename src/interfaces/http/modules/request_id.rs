//! Request correlation IDs
//!
//! Each request runs inside a `request` span carrying its `x-request-id`,
//! which is echoed in the response.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// The correlation ID of the current request, available as `Extension<RequestId>`.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

fn accept_incoming(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let acceptable = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| id.to_string())
}

/// Reuse a well-formed incoming `x-request-id` or generate a UUID v4.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(accept_incoming)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
