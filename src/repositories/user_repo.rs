//! PostgreSQL user repository.
//!
//! Provides the `UserStore` operations for the users table using diesel_async.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, Page, User, UserChangeset, UserFilter, UserRow};
use crate::repositories::UserStore;
use crate::schema::users;

/// User repository holding an async connection pool.
///
/// `AsyncDbPool` (bb8::Pool) is `Arc`-backed, so cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn pool_error<E>(error: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::ConnectionPool {
        source: anyhow::Error::from(error),
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(users::id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find user"))?;

        Ok(row.map(User::from))
    }

    async fn save(&self, user_id: Option<i64>, user: NewUser) -> AppResult<User> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = UserChangeset::from(&user);

        let row = match user_id {
            None => diesel::insert_into(users::table)
                .values(&changes)
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert user"))?,
            Some(user_id) => diesel::update(users::table.filter(users::id.eq(user_id)))
                .set(&changes)
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))?,
        };

        Ok(User::from(row))
    }

    async fn delete_by_id(&self, user_id: i64) -> AppResult<()> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let affected = diesel::delete(users::table.filter(users::id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete user"))?;

        tracing::debug!(user_id, affected, "Delete executed");
        Ok(())
    }

    async fn find_page(&self, filter: &UserFilter, page: i64, size: i64) -> AppResult<Page<User>> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut rows_query = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .into_boxed();
        let mut count_query = users::table.count().into_boxed();

        // Half-open range: from <= birthdate < to
        if let UserFilter::DateRange { from, to } = filter {
            rows_query = rows_query
                .filter(users::birthdate.ge(from.to_diesel()))
                .filter(users::birthdate.lt(to.to_diesel()));
            count_query = count_query
                .filter(users::birthdate.ge(from.to_diesel()))
                .filter(users::birthdate.lt(to.to_diesel()));
        }

        let rows = rows_query
            .offset(page.saturating_mul(size))
            .limit(size)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list users"))?;

        let total = count_query
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count users"))?;

        Ok(Page::new(
            rows.into_iter().map(User::from).collect(),
            total,
            page,
            size,
        ))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping"))?;

        Ok(())
    }
}
