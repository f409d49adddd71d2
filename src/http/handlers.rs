//! Endpoint handlers and fallbacks.

use std::any::Any;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::http::request::RequestContext;
use crate::http::response::{timestamp, ResponseCode, ResponseEnvelope};
use crate::http::server::AppState;
use crate::pipeline::WakeParams;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// `GET /wake?id=..&key=..`
///
/// The query is taken as raw pairs; a repeated parameter keeps its first value.
pub async fn wake(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = WakeParams::from_pairs(pairs);

    match state.pipeline.run(&params, &ctx).await {
        Ok(receipt) => ResponseEnvelope::success(receipt).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /health`. No downstream calls, no authentication.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: timestamp(),
    })
}

pub async fn not_found() -> ResponseEnvelope {
    ResponseEnvelope::error(ResponseCode::NotFound, "Endpoint not found")
}

pub async fn method_not_allowed() -> ResponseEnvelope {
    ResponseEnvelope::error(
        ResponseCode::MethodNotAllowed,
        "HTTP method not allowed for this endpoint",
    )
}

/// Last-resort handler for panics escaping a handler. Full detail goes to
/// the log; the caller only sees `INTERNAL_ERROR`.
pub fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(error = %detail, "Internal server error");
    ResponseEnvelope::error(ResponseCode::InternalError, "Internal server error").into_response()
}
