//! Application state shared across handlers.

use std::sync::Arc;

use hubauth_oauth::{OAuthConfig, SharedTokenManager, TokenManager};

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Per-session token stores.
    pub tokens: SharedTokenManager,

    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Consent page URL, built once from the OAuth config.
    pub authorization_url: Arc<str>,
}

impl AppState {
    /// Create state with an HTTP token manager for `oauth`.
    pub fn new(oauth: OAuthConfig, config: ServerConfig) -> Self {
        Self::with_token_manager(TokenManager::new(oauth).shared(), config)
    }

    /// Create state around an existing token manager.
    pub fn with_token_manager(tokens: SharedTokenManager, config: ServerConfig) -> Self {
        let authorization_url = hubauth_oauth::build_authorization_url(tokens.config());
        Self {
            tokens,
            config: Arc::new(config),
            authorization_url: authorization_url.into(),
        }
    }
}
