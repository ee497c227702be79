//! API module - HTTP handlers and routes.

pub mod handlers;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::lifecycle_service::LifecycleService;
use crate::services::notify_service::NotificationDispatcher;
use crate::store::MemStore;

/// Application state shared across handlers.
///
/// The record store and dispatcher are injected here at startup; handlers
/// never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<MemStore>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<MemStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            config,
            store,
            dispatcher,
        }
    }

    /// Create a LifecycleService wired to the shared store and dispatcher.
    pub fn create_lifecycle_service(&self) -> LifecycleService {
        LifecycleService::new(
            self.store.clone(),
            self.dispatcher.clone(),
            Duration::from_secs(self.config.notify_timeout_secs),
        )
    }

    /// Create an AuthService over the shared store.
    pub fn create_auth_service(&self) -> AuthService {
        AuthService::new(self.store.clone())
    }
}

pub type SharedState = Arc<AppState>;
