//! Gateway error types with HTTP status and wire code mapping.
//!
//! [`GatewayError`] is the central error type. REST handlers map it to a
//! structured JSON body via [`IntoResponse`]; the WebSocket layer maps it
//! to an outbound `error` frame with a symbolic code, sent to the
//! requesting connection only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::ConnectionId;

/// Structured JSON error response body.
///
/// All REST error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "order id must not be empty",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                |
/// |-----------|-------------------|----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request            |
/// | 2000–2999 | Policy / State    | 403 Forbidden / 409 Conflict |
/// | 3000–3999 | Internal          | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request carried a missing or empty order id.
    #[error("order id must not be empty")]
    InvalidOrderId,

    /// The session's role does not permit joining the requested channel.
    #[error("role is not permitted to join this channel")]
    Forbidden,

    /// A session already exists for this connection id.
    #[error("connection {0} already has a session")]
    DuplicateConnection(ConnectionId),

    /// No session exists for an active connection. This is a lifecycle bug
    /// upstream: fatal to the operation, never to the process.
    #[error("no session for active connection {0}")]
    SessionMissing(ConnectionId),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidOrderId => 1001,
            Self::Forbidden => 2001,
            Self::DuplicateConnection(_) => 2002,
            Self::SessionMissing(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the symbolic code used in outbound WebSocket error frames.
    #[must_use]
    pub const fn ws_code(&self) -> &'static str {
        match self {
            Self::InvalidOrderId => "invalid_order_id",
            Self::Forbidden => "forbidden",
            Self::DuplicateConnection(_) | Self::SessionMissing(_) | Self::Internal(_) => {
                "internal"
            }
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidOrderId => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::DuplicateConnection(_) => StatusCode::CONFLICT,
            Self::SessionMissing(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
