//! # Request Metrics
//!
//! Counts every request by method and status class. Recorded through the
//! `metrics` facade, so the counters reach `/metrics` once the binary
//! installs the Prometheus recorder and are no-ops otherwise.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Requests served, labelled by `method` and `status` class.
pub const HTTP_REQUESTS: &str = "vouch_http_requests_total";

/// Middleware that increments the request counter.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();

    let response = next.run(request).await;

    let class = match response.status().as_u16() {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    ::metrics::counter!(HTTP_REQUESTS, "method" => method, "status" => class).increment(1);

    response
}
