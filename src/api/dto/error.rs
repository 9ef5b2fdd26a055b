//! Error response DTOs.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::envelope::now_timestamp;

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": 400,
    "timestamp": "2024-01-01T12:00:00Z",
    "message": ["'email' is a required field.", "'lastname' is a required field."]
}))]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// RFC 3339 instant the response was produced
    pub timestamp: String,
    /// One entry per violation or failure
    pub message: Vec<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: Vec<String>) -> Self {
        Self {
            status: status.as_u16(),
            timestamp: now_timestamp(),
            message,
        }
    }

    pub fn single(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, vec![message.into()])
    }
}
