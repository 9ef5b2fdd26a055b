//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::repositories::UserStore;
use crate::services::{Services, UserServiceConfig};

/// Application state containing all shared services and resources.
///
/// Cloning is cheap: services and the store are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to storage for health probes
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    /// Builds the services on top of `store`.
    ///
    /// # Example
    /// ```ignore
    /// let store = Arc::new(PgUserRepository::new(pool));
    /// let state = AppState::new(store, UserServiceConfig::from_settings(&settings));
    /// ```
    pub fn new(store: Arc<dyn UserStore>, config: UserServiceConfig) -> Self {
        Self {
            services: Services::new(store.clone(), config),
            store,
        }
    }
}
