//! Application state shared across handlers

use std::sync::Arc;

use minibank_auth::AuthService;
use minibank_core::{AccountOpener, TransferEngine};
use minibank_db::AccountStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Account persistence
    pub store: Arc<dyn AccountStore>,
    /// Credential service
    pub auth: Arc<AuthService>,
    pub transfers: TransferEngine,
    pub opener: AccountOpener,
}

impl AppState {
    /// Create a new application state over one account store
    pub fn new(store: Arc<dyn AccountStore>, auth: Arc<AuthService>) -> Self {
        Self {
            transfers: TransferEngine::new(store.clone()),
            opener: AccountOpener::new(store.clone()),
            store,
            auth,
        }
    }

    /// Create state for testing over the in-memory store
    #[cfg(test)]
    pub fn test() -> Self {
        use minibank_auth::AuthConfig;
        use minibank_db::InMemoryAccountStore;

        let mut auth_config = AuthConfig::default();
        auth_config.jwt.secret = "test-secret-key-at-least-32-bytes-long!!".to_string();
        auth_config.password.memory_cost = 4096;
        auth_config.password.time_cost = 1;

        let auth = Arc::new(AuthService::new(auth_config).expect("valid test auth config"));

        Self::new(Arc::new(InMemoryAccountStore::new()), auth)
    }
}
