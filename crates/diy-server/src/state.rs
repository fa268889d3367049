//! Application State

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::registry::SubscriptionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Staged checkouts and confirmed subscriptions
    pub registry: Arc<SubscriptionRegistry>,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(SubscriptionRegistry::new()),
            config: Arc::new(config),
        }
    }
}
