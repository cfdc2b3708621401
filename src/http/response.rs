//! Responses synthesized by the gateway itself.
//!
//! # Responsibilities
//! - Plain-text error responses (503 when no backend can be used, 404 for
//!   unrouted paths, 400/500 for unforwardable requests)
//!
//! # Design Decisions
//! - Every other status is passthrough from the upstream
//! - Body is the message plus a trailing newline, served as `text/plain`

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

/// Plain-text error response.
pub fn error(status: StatusCode, message: &str) -> Response {
    let mut response = Response::new(Body::from(format!("{}\n", message)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

pub fn service_unavailable(message: &str) -> Response {
    error(StatusCode::SERVICE_UNAVAILABLE, message)
}

pub fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "404 page not found")
}

pub fn bad_request(message: &str) -> Response {
    error(StatusCode::BAD_REQUEST, message)
}

pub fn internal_error(message: &str) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, message)
}
