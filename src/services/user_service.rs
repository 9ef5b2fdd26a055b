//! User service for business logic operations.
//!
//! Orchestrates validation, partial-update merging and paging on top of a
//! [`UserStore`]. Each call is a single attempt; storage failures are
//! returned to the caller unchanged.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserDraft};
use crate::repositories::UserStore;
use crate::services::pagination::{LinkBuilder, ListUsersQuery, PageLinks};
use crate::services::validation::{self, UserValidator};

pub const EMAIL_TAKEN_MESSAGE: &str = "A user with this email already exists.";

/// Immutable settings the service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserServiceConfig {
    /// Minimum age in years for a valid birthdate.
    pub allowed_age: u32,
    /// Scheme, host and port used for absolute links.
    pub base_url: String,
}

impl UserServiceConfig {
    pub fn new(allowed_age: u32, base_url: impl Into<String>) -> Self {
        Self {
            allowed_age,
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.allowed_age, settings.server.base_url())
    }
}

/// One page of users plus the metadata the list envelope reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub links: PageLinks,
}

/// User service for handling user-related business logic.
///
/// Cloning is cheap: the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    validator: UserValidator,
    links: LinkBuilder,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, config: UserServiceConfig) -> Self {
        Self {
            store,
            validator: UserValidator::new(config.allowed_age),
            links: LinkBuilder::new(config.base_url),
        }
    }

    /// Absolute URL of a user record.
    pub fn location(&self, id: i64) -> String {
        self.links.record(id)
    }

    /// Validates the draft and stores it as a new user.
    ///
    /// # Returns
    /// The created user with its generated id
    pub async fn create_user(&self, draft: UserDraft) -> AppResult<User> {
        let new_user = self.validator.check(draft)?;
        let user = self
            .store
            .save(None, new_user)
            .await
            .map_err(email_taken)?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id = {} not found.", id)))
    }

    /// Lists one page of users, optionally restricted to a birthdate range.
    pub async fn list_users(&self, query: ListUsersQuery) -> AppResult<UserPage> {
        let filter = query.filter()?;
        tracing::debug!(page = query.page, size = query.size, ?filter, "Listing users");

        let page = self.store.find_page(&filter, query.page, query.size).await?;
        let links = self.links.siblings(&page, &filter);

        Ok(UserPage {
            links,
            page: page.page,
            size: page.size,
            total_elements: page.total,
            users: page.items,
        })
    }

    /// Replaces every mutable field of an existing user.
    pub async fn update_user(&self, id: i64, draft: UserDraft) -> AppResult<User> {
        self.existing(id).await?;
        self.store_validated(id, draft).await
    }

    /// Overwrites only the fields present in `patch`.
    pub async fn patch_user(&self, id: i64, patch: UserDraft) -> AppResult<User> {
        let existing = self.existing(id).await?;
        let merged = validation::merge(&existing, patch);
        self.store_validated(id, merged).await
    }

    /// Deletes a user. Unknown ids are accepted silently.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.store.delete_by_id(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn existing(&self, id: i64) -> AppResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id = {} does not exist", id)))
    }

    async fn store_validated(&self, id: i64, draft: UserDraft) -> AppResult<User> {
        let new_user = self.validator.check(draft)?;
        let user = self
            .store
            .save(Some(id), new_user)
            .await
            .map_err(email_taken)?;

        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }
}

fn email_taken(error: AppError) -> AppError {
    match error {
        AppError::Duplicate { .. } => AppError::already_exists(EMAIL_TAKEN_MESSAGE),
        other => other,
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("validator", &self.validator)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserFilter;
    use crate::repositories::MemoryUserRepository;
    use jiff::civil::date;

    fn service() -> UserService {
        UserService::new(
            Arc::new(MemoryUserRepository::new()),
            UserServiceConfig::new(18, "http://localhost:8080"),
        )
    }

    fn draft(email: &str) -> UserDraft {
        UserDraft {
            email: Some(email.to_string()),
            firstname: Some("Name".to_string()),
            lastname: Some("Lastname".to_string()),
            birthdate: Some(date(1990, 1, 1)),
            address: Some("Address".to_string()),
            phone_number: Some("132456789".to_string()),
        }
    }

    fn assert_messages(err: AppError, expected: &[&str]) {
        assert_eq!(err.messages(), expected);
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service.create_user(draft("a@b.com")).await.unwrap();

        assert_eq!(service.get_user(created.id).await.unwrap(), created);
        assert_eq!(service.location(created.id), "http://localhost:8080/users/1");
    }

    #[tokio::test]
    async fn test_create_invalid_reports_all_violations() {
        let err = service().create_user(UserDraft::default()).await.unwrap_err();
        assert!(matches!(&err, AppError::InvalidArgument { messages } if messages.len() == 4));
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_already_exists() {
        let service = service();
        service.create_user(draft("a@b.com")).await.unwrap();

        let err = service.create_user(draft("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { .. }));
        assert_messages(err, &[EMAIL_TAKEN_MESSAGE]);
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let err = service().get_user(3).await.unwrap_err();
        assert_messages(err, &["User with id = 3 not found."]);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = service();
        let err = service.update_user(5, draft("a@b.com")).await.unwrap_err();
        assert_messages(err, &["User with id = 5 does not exist"]);

        let err = service.patch_user(5, UserDraft::default()).await.unwrap_err();
        assert_messages(err, &["User with id = 5 does not exist"]);
    }

    #[tokio::test]
    async fn test_full_update_replaces_every_field() {
        let service = service();
        let created = service.create_user(draft("a@b.com")).await.unwrap();

        let mut replacement = draft("new@b.com");
        replacement.address = None;
        let updated = service.update_user(created.id, replacement).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.email, "new@b.com");
        assert_eq!(updated.address, None);
    }

    #[tokio::test]
    async fn test_full_update_revalidates() {
        let service = service();
        let created = service.create_user(draft("a@b.com")).await.unwrap();

        let mut replacement = draft("a@b.com");
        replacement.firstname = None;
        let err = service.update_user(created.id, replacement).await.unwrap_err();
        assert_messages(err, &[validation::FIRSTNAME_REQUIRED]);
    }

    #[tokio::test]
    async fn test_patch_only_touches_given_fields() {
        let service = service();
        let created = service.create_user(draft("a@b.com")).await.unwrap();

        let patch = UserDraft {
            email: Some("new@x.com".to_string()),
            ..UserDraft::default()
        };
        let patched = service.patch_user(created.id, patch).await.unwrap();

        assert_eq!(patched.email, "new@x.com");
        assert_eq!(patched.firstname, created.firstname);
        assert_eq!(patched.birthdate, created.birthdate);
        assert_eq!(patched.phone_number, created.phone_number);
    }

    #[tokio::test]
    async fn test_patch_to_taken_email_is_rejected() {
        let service = service();
        service.create_user(draft("a@b.com")).await.unwrap();
        let second = service.create_user(draft("c@d.com")).await.unwrap();

        let patch = UserDraft {
            email: Some("a@b.com".to_string()),
            ..UserDraft::default()
        };
        let err = service.patch_user(second.id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = service();
        service.delete_user(999_999).await.unwrap();

        let created = service.create_user(draft("a@b.com")).await.unwrap();
        service.delete_user(created.id).await.unwrap();
        assert!(matches!(
            service.get_user(created.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_pages_and_links() {
        let service = service();
        for i in 0..5 {
            service.create_user(draft(&format!("u{i}@b.com"))).await.unwrap();
        }

        let first = service.list_users(ListUsersQuery::new(0, 2)).await.unwrap();
        assert_eq!(first.total_elements, 5);
        assert_eq!(first.users.len(), 2);
        assert_eq!(
            first.links.next.as_deref(),
            Some("http://localhost:8080/users?page=1&size=2")
        );
        assert_eq!(first.links.prev, None);

        let last = service.list_users(ListUsersQuery::new(2, 2)).await.unwrap();
        assert_eq!(last.users.len(), 1);
        assert_eq!(last.links.next, None);
        assert_eq!(
            last.links.prev.as_deref(),
            Some("http://localhost:8080/users?page=1&size=2")
        );
    }

    #[tokio::test]
    async fn test_list_with_reversed_range_fails() {
        let query =
            ListUsersQuery::new(0, 20).with_range(Some(date(2024, 4, 1)), Some(date(2024, 3, 1)));
        let err = service().list_users(query).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_list_with_range_filters() {
        let service = service();
        let mut early = draft("early@b.com");
        early.birthdate = Some(date(1980, 3, 1));
        let mut late = draft("late@b.com");
        late.birthdate = Some(date(1980, 4, 1));
        service.create_user(early).await.unwrap();
        service.create_user(late).await.unwrap();

        let query =
            ListUsersQuery::new(0, 20).with_range(Some(date(1980, 3, 1)), Some(date(1980, 4, 1)));
        let page = service.list_users(query).await.unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.users[0].email, "early@b.com");
        assert_eq!(page.links, PageLinks::default());
        assert!(matches!(
            query.filter().unwrap(),
            UserFilter::DateRange { .. }
        ));
    }
}
