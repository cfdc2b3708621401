//! Upstream forwarding.
//!
//! # Responsibilities
//! - Build the outbound HTTP client
//! - Rebuild the inbound request against the chosen target, method, headers
//!   and body untouched
//! - Classify the outcome and feed it to the target's circuit breaker
//! - Relay the upstream response unmodified
//!
//! # Design Decisions
//! - One attempt per request; a transport error is final
//! - 5xx counts as a breaker failure but is still relayed to the caller
//! - Bodies are streamed in both directions, never buffered
//! - Redirects are relayed, not followed

use std::time::Duration;
use axum::{
    body::{Body, HttpBody},
    http::{HeaderMap, Method, StatusCode},
    response::Response,
};
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::resilience::{BreakerState, CircuitBreaker};

/// Build the shared outbound client.
pub fn build_client(config: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build()
}

/// How a response affects the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Any 5xx is a failure; everything else, 4xx included, is a success.
pub fn classify(status: StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::Failure
    } else {
        Outcome::Success
    }
}

/// Join an instance URL with the forwarded path and query.
///
/// The instance's own path (if any) is kept as a base, joined with exactly
/// one `/`. Instance query parameters come first, then the request's.
pub fn instance_target(base: &Url, path: &str, query: Option<&str>) -> Url {
    let mut target = base.clone();

    let base_path = base.path().trim_end_matches('/');
    let path = if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
    target.set_path(&format!("{}{}", base_path, path));

    let query = match (base.query().filter(|q| !q.is_empty()), query.filter(|q| !q.is_empty())) {
        (Some(b), Some(q)) => Some(format!("{}&{}", b, q)),
        (Some(b), None) => Some(b.to_string()),
        (None, Some(q)) => Some(q.to_string()),
        (None, None) => None,
    };
    target.set_query(query.as_deref());
    target
}

/// Send one request upstream and relay the response.
///
/// The breaker is updated from the outcome. On a transport error the
/// failure is recorded and the error handed back so the caller can
/// synthesize its own response.
pub async fn relay(
    client: &reqwest::Client,
    breaker: &CircuitBreaker,
    upstream: &str,
    method: Method,
    target: Url,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, reqwest::Error> {
    let mut outbound = client.request(method, target).headers(headers);
    if body.size_hint().exact() != Some(0) {
        outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    let response = match outbound.send().await {
        Ok(response) => response,
        Err(e) => {
            note_transition(upstream, breaker.record_failure());
            return Err(e);
        }
    };

    let status = response.status();
    let transition = match classify(status) {
        Outcome::Failure => breaker.record_failure(),
        Outcome::Success => breaker.record_success(),
    };
    note_transition(upstream, transition);

    Ok(into_response(response))
}

fn into_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = upstream.headers().clone();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn note_transition(upstream: &str, transition: Option<BreakerState>) {
    let Some(state) = transition else { return };
    match state {
        BreakerState::Open => tracing::warn!(upstream = %upstream, "Circuit breaker opened"),
        BreakerState::Closed => tracing::info!(upstream = %upstream, "Circuit breaker closed"),
        BreakerState::HalfOpen => tracing::info!(upstream = %upstream, "Circuit breaker half-open"),
    }
    metrics::record_breaker_transition(upstream, state);
}
