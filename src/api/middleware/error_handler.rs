//! Error handler for converting AppError to HTTP responses.
//!
//! Every failure leaves the service as an [`ErrorResponse`] envelope.
//! Status mapping:
//! - `NotFound` → 404
//! - everything else → 400, including storage and internal failures

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Returns true for failures the caller did not cause.
fn is_unexpected(error: &AppError) -> bool {
    matches!(
        error,
        AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::ConnectionPool { .. }
            | AppError::Internal { .. }
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let messages = self.messages();

        if is_unexpected(&self) {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(messages = ?messages, status = status.as_u16(), "Request rejected");
        }

        (status, Json(ErrorResponse::new(status, messages))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

/// Wraps error responses that are not already JSON in the error envelope.
///
/// Covers responses produced outside the handlers, such as unmatched
/// routes. 404 and 405 keep their status; any other failure becomes 400.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    if is_json {
        return response;
    }

    let (_parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let original_message = String::from_utf8_lossy(&body_bytes).trim().to_string();

    let (status, default_message) = match status {
        StatusCode::NOT_FOUND => (status, "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => (status, "HTTP method not allowed for this endpoint"),
        _ => (StatusCode::BAD_REQUEST, "Bad request - invalid or malformed request"),
    };

    let message = if original_message.is_empty() {
        default_message.to_string()
    } else {
        original_message
    };

    (status, Json(ErrorResponse::single(status, message))).into_response()
}
