//! API error handling.
//!
//! Structured error responses with proper HTTP status codes and request
//! tracking.

use crate::errors::EngineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level API error response with request tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub request_id: String,
    pub error: ErrorBody,
}

/// Error body with structured information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (BAD_REQUEST, CONFLICT, INSUFFICIENT_FUNDS, ...)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// API error types with request tracking
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub request_id: String,
}

#[derive(Debug)]
pub enum ApiErrorKind {
    NotFound(String),
    BadRequest(String),
    /// Retryable concurrency conflict (session already active, rotation
    /// blocked)
    Conflict(String),
    /// Stake exceeds the available balance
    InsufficientFunds(String),
    InternalError(String),
}

impl ApiError {
    pub fn bad_request(request_id: String, message: String) -> Self {
        Self {
            kind: ApiErrorKind::BadRequest(message),
            request_id,
        }
    }

    /// Map an engine error onto the HTTP taxonomy. Integrity faults are
    /// logged before being masked as internal errors.
    pub fn from_engine(err: EngineError, request_id: String) -> Self {
        let kind = match err {
            EngineError::Validation(_) | EngineError::InvalidAction(_) => {
                ApiErrorKind::BadRequest(err.to_string())
            }
            EngineError::InsufficientFunds { .. } => {
                ApiErrorKind::InsufficientFunds(err.to_string())
            }
            EngineError::SessionActive { .. } | EngineError::RotationBlocked => {
                ApiErrorKind::Conflict(err.to_string())
            }
            EngineError::SessionNotFound { .. } | EngineError::SessionMismatch { .. } => {
                ApiErrorKind::NotFound(err.to_string())
            }
            EngineError::Integrity(_) => {
                tracing::error!(request_id, error = %err, "integrity fault");
                ApiErrorKind::InternalError(err.to_string())
            }
        };
        Self { kind, request_id }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::NotFound(msg) => write!(f, "[{}] Not Found: {}", self.request_id, msg),
            ApiErrorKind::BadRequest(msg) => {
                write!(f, "[{}] Bad Request: {}", self.request_id, msg)
            }
            ApiErrorKind::Conflict(msg) => write!(f, "[{}] Conflict: {}", self.request_id, msg),
            ApiErrorKind::InsufficientFunds(msg) => {
                write!(f, "[{}] Insufficient Funds: {}", self.request_id, msg)
            }
            ApiErrorKind::InternalError(msg) => {
                write!(f, "[{}] Internal Error: {}", self.request_id, msg)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.kind {
            ApiErrorKind::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiErrorKind::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiErrorKind::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiErrorKind::InsufficientFunds(msg) => (
                StatusCode::PAYMENT_REQUIRED,
                "INSUFFICIENT_FUNDS",
                msg.clone(),
            ),
            ApiErrorKind::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = Json(ErrorResponse {
            request_id: self.request_id.clone(),
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
