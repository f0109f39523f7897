//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::service::TokenIssuer;
use crate::store::AccountStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenIssuer>,
    /// Diagnostics read the database URL and environment from here.
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, config: AppConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs);
        Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}
