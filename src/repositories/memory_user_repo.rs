//! In-process user repository.
//!
//! Keeps users in a `BTreeMap` keyed by id so iteration order matches the
//! PostgreSQL backend's `ORDER BY id`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Page, User, UserFilter};
use crate::repositories::UserStore;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

/// Users held in memory, with the same uniqueness and paging rules as the
/// database schema.
#[derive(Default)]
pub struct MemoryUserRepository {
    table: RwLock<Table>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, id: Option<i64>, user: NewUser) -> AppResult<User> {
        let mut table = self.table.write().await;

        if table.email_taken(&user.email, id) {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: user.email,
            });
        }

        let id = match id {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(_) => return Err(AppError::not_found("Record not found")),
            None => {
                table.last_id += 1;
                table.last_id
            }
        };

        let stored = user.into_user(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.table.write().await.rows.remove(&id);
        Ok(())
    }

    async fn find_page(&self, filter: &UserFilter, page: i64, size: i64) -> AppResult<Page<User>> {
        let table = self.table.read().await;

        let matching: Vec<&User> = table.rows.values().filter(|u| filter.matches(u)).collect();
        let total = matching.len() as i64;

        let skip = usize::try_from(page.saturating_mul(size)).unwrap_or(usize::MAX);
        let take = usize::try_from(size).unwrap_or(0);
        let items = matching.into_iter().skip(skip).take(take).cloned().collect();

        Ok(Page::new(items, total, page, size))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
