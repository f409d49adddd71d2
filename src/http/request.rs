//! Request context and the tracing middleware.
//!
//! # Responsibilities
//! - Generate a fresh correlation id (UUID v4) for every request
//! - Record the caller's address and the start instant
//! - Hand that context to handlers explicitly as a request extension
//! - Stamp `X-Request-ID` and `X-Request-Duration-Ms` on every response
//!
//! # Design Decisions
//! - Incoming `X-Request-ID` headers are ignored; ids are always ours
//! - Runs outermost so fallbacks and caught panics are decorated too

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub static X_REQUEST_DURATION_MS: HeaderName = HeaderName::from_static("x-request-duration-ms");

/// Per-request facts shared by the middleware, the handler and the pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    /// Caller IP for logs, `N/A` when the transport did not provide one.
    pub source: String,
    pub source_addr: Option<SocketAddr>,
    pub received_at: DateTime<Utc>,
    started: Instant,
}

impl RequestContext {
    pub fn new(source_addr: Option<SocketAddr>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            source: source_addr
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            source_addr,
            received_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// A context with no caller address, for driving the pipeline directly.
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// Whole milliseconds since the request entered the middleware.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Wraps every request with a correlation id and a duration measurement.
pub async fn trace_request(mut request: Request, next: Next) -> Response {
    let source_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ctx = RequestContext::new(source_addr);

    let method = request.method().to_string();
    let route = route_label(request.uri().path());
    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id,
        source = %ctx.source,
        method = %method,
        path = %request.uri().path(),
    );

    request.extensions_mut().insert(ctx.clone());
    let mut response = next.run(request).instrument(span.clone()).await;

    let duration_ms = ctx.elapsed_ms();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id.to_string()) {
        headers.insert(X_REQUEST_ID.clone(), value);
    }
    headers.insert(X_REQUEST_DURATION_MS.clone(), HeaderValue::from(duration_ms));

    let status = response.status().as_u16();
    metrics::record_request(&method, route, status, ctx.started);
    span.in_scope(|| {
        tracing::debug!(status, duration_ms, "Request completed");
    });

    response
}

/// Bounded label set for metrics; arbitrary 404 paths collapse into one.
fn route_label(path: &str) -> &'static str {
    match path {
        "/wake" => "/wake",
        "/health" => "/health",
        _ => "unmatched",
    }
}
