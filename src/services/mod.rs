//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

pub mod pagination;
mod user_service;
pub mod validation;

pub use pagination::{LinkBuilder, ListUsersQuery, PageLinks};
pub use user_service::{EMAIL_TAKEN_MESSAGE, UserPage, UserService, UserServiceConfig};
pub use validation::UserValidator;

use std::sync::Arc;

use crate::repositories::UserStore;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
#[derive(Clone, Debug)]
pub struct Services {
    pub users: UserService,
}

impl Services {
    pub fn new(store: Arc<dyn UserStore>, config: UserServiceConfig) -> Self {
        Self {
            users: UserService::new(store, config),
        }
    }
}
