//! Success envelope for single-record responses.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current UTC instant in RFC 3339 form.
pub(crate) fn now_timestamp() -> String {
    jiff::Timestamp::now().to_string()
}

/// One record plus the absolute URL it can be fetched from.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordResponse<T> {
    pub status: u16,
    pub timestamp: String,
    pub data: T,
    #[schema(example = "http://127.0.0.1:8080/users/1")]
    pub location: String,
}

impl<T> RecordResponse<T> {
    pub fn new(status: StatusCode, data: T, location: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            timestamp: now_timestamp(),
            data,
            location: location.into(),
        }
    }

    pub fn ok(data: T, location: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, location)
    }

    pub fn created(data: T, location: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, location)
    }
}
