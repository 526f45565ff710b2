use std::sync::Arc;

use crate::auth::credentials::CredentialStore;
use crate::auth::token::TokenService;
use crate::config::Config;
use crate::rate_limit::store::RateLimitStore;

/// Application context containing shared dependencies.
///
/// Built once at startup and handed to the router; owning the rate-limit
/// store here (instead of module-level state) keeps its lifetime explicit
/// and lets tests run against isolated instances.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub rate_store: Arc<RateLimitStore>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppContext {
    pub fn new(
        config: Arc<Config>,
        tokens: Arc<TokenService>,
        rate_store: Arc<RateLimitStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            tokens,
            rate_store,
            credentials,
        }
    }
}
