//! Response envelope and status mapping.
//!
//! # Responsibilities
//! - Define the JSON envelope every endpoint answers with
//! - Map outcome codes to HTTP status codes
//! - Render request errors without leaking internals
//!
//! # Design Decisions
//! - Error bodies and success bodies share one struct
//! - Timestamps are UTC, millisecond precision, `Z` suffix

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::pipeline::{RequestError, WakeReceipt};

/// Symbolic outcome tag carried in every envelope's `code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    SendSuccess,
    MissingParameter,
    InvalidParameter,
    InvalidKey,
    UnknownId,
    PermissionDenied,
    NetworkError,
    SendFailed,
    NotFound,
    MethodNotAllowed,
    InternalError,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::SendSuccess => "SEND_SUCCESS",
            ResponseCode::MissingParameter => "MISSING_PARAMETER",
            ResponseCode::InvalidParameter => "INVALID_PARAMETER",
            ResponseCode::InvalidKey => "INVALID_KEY",
            ResponseCode::UnknownId => "UNKNOWN_ID",
            ResponseCode::PermissionDenied => "PERMISSION_DENIED",
            ResponseCode::NetworkError => "NETWORK_ERROR",
            ResponseCode::SendFailed => "SEND_FAILED",
            ResponseCode::NotFound => "NOT_FOUND",
            ResponseCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ResponseCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ResponseCode::SendSuccess => StatusCode::OK,
            ResponseCode::MissingParameter | ResponseCode::InvalidParameter => {
                StatusCode::BAD_REQUEST
            }
            ResponseCode::InvalidKey => StatusCode::FORBIDDEN,
            ResponseCode::UnknownId | ResponseCode::NotFound => StatusCode::NOT_FOUND,
            ResponseCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ResponseCode::PermissionDenied
            | ResponseCode::NetworkError
            | ResponseCode::SendFailed
            | ResponseCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The body of every `/wake` response and every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub status: Status,
    pub code: ResponseCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    pub timestamp: String,
}

impl ResponseEnvelope {
    pub fn error(code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            code,
            message: message.into(),
            id: None,
            mac: None,
            timestamp: timestamp(),
        }
    }

    pub fn success(receipt: WakeReceipt) -> Self {
        Self {
            status: Status::Success,
            code: ResponseCode::SendSuccess,
            message: format!("Wake-on-LAN packet sent to {}", receipt.address),
            id: Some(receipt.device_id),
            mac: Some(receipt.address),
            timestamp: timestamp(),
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        ResponseEnvelope::error(self.code(), self.public_message()).into_response()
    }
}

/// Current time as ISO-8601 UTC, e.g. `2026-02-10T20:12:52.493Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
