//! Repository layer for data access operations.
//!
//! [`UserStore`] is the storage boundary the service layer depends on. Two
//! backends implement it: PostgreSQL through diesel_async, and an in-process
//! map used by tests and local runs.

mod memory_user_repo;
mod user_repo;

pub use memory_user_repo::MemoryUserRepository;
pub use user_repo::PgUserRepository;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewUser, Page, User, UserFilter};

/// Storage operations for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Inserts when `id` is `None`, otherwise overwrites every column of the
    /// existing row. A taken email surfaces as `AppError::Duplicate`.
    async fn save(&self, id: Option<i64>, user: NewUser) -> AppResult<User>;

    /// Removes the user if present. Missing ids are not an error.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    /// Returns page `page` (zero-based) of `size` users matching `filter`,
    /// ordered by id.
    async fn find_page(&self, filter: &UserFilter, page: i64, size: i64)
    -> AppResult<Page<User>>;

    /// Cheap round trip used by health checks.
    async fn ping(&self) -> AppResult<()>;
}
