//! Data Transfer Objects for API requests and responses.
//!
//! Every response body is an envelope carrying `status` and `timestamp`:
//! - `envelope` - single-record success envelope
//! - `pagination` - list query parameters and the paged envelope
//! - `error` - error envelope
//! - `user` - user request/response bodies
//! - `health` - health check bodies

mod envelope;
mod error;
mod health;
mod pagination;
mod user;

pub use envelope::RecordResponse;
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::{ListUsersParams, PageLinksResponse, PagedResponse, PaginationMeta};
pub use user::{UserRequest, UserResponse};
