//! Per-session token lifecycle.
//!
//! Owns two in-memory stores keyed by an opaque session id:
//!
//! - refresh tokens, kept for the lifetime of the process; the presence of
//!   an entry is the only authorization signal for a session
//! - access tokens, cached with a TTL of 75% of the provider-reported
//!   lifetime so they are refreshed before the provider would reject them
//!
//! Neither lock is held across the token endpoint call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::oauth::{GrantProof, HttpTokenEndpoint, OAuthConfig, TokenEndpoint, TokenPayload};
use crate::ttl::ExpiringCache;

/// Fraction of the provider-reported lifetime an access token is cached for.
pub const ACCESS_TOKEN_TTL_FACTOR: f64 = 0.75;

/// Cache lifetime for an access token the provider says lives `expires_in` seconds.
pub fn access_token_ttl(expires_in: u64) -> Duration {
    Duration::from_secs((expires_in as f64 * ACCESS_TOKEN_TTL_FACTOR).round() as u64)
}

/// Authorization state of a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No refresh token has been stored.
    Unauthorized,
    /// A refresh token exists but no live access token is cached.
    AuthorizedNoToken,
    /// Both a refresh token and a live access token are present.
    AuthorizedCached,
}

impl SessionState {
    pub fn is_authorized(&self) -> bool {
        !matches!(self, SessionState::Unauthorized)
    }
}

/// Token manager shared between request handlers.
pub type SharedTokenManager = Arc<TokenManager>;

/// Mediates all token endpoint traffic and owns the per-session stores.
pub struct TokenManager {
    config: OAuthConfig,
    endpoint: Arc<dyn TokenEndpoint>,
    refresh_tokens: RwLock<HashMap<String, String>>,
    access_tokens: Mutex<ExpiringCache<String>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .field("refresh_tokens", &self.refresh_tokens.read().len())
            .field("access_tokens", &self.access_tokens.lock().len())
            .finish()
    }
}

impl TokenManager {
    /// Create a manager that talks to `config.token_url` over HTTP.
    pub fn new(config: OAuthConfig) -> Self {
        let endpoint = Arc::new(HttpTokenEndpoint::from_config(&config));
        Self::with_endpoint(config, endpoint)
    }

    /// Create a manager with a custom token endpoint.
    pub fn with_endpoint(config: OAuthConfig, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self {
            config,
            endpoint,
            refresh_tokens: RwLock::new(HashMap::new()),
            access_tokens: Mutex::new(ExpiringCache::new()),
        }
    }

    /// Wrap in an [`Arc`] for sharing.
    pub fn shared(self) -> SharedTokenManager {
        Arc::new(self)
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Trade a grant proof for tokens and record them for `session_id`.
    ///
    /// On success the refresh token overwrites any previous one and the access
    /// token is cached for [`access_token_ttl`]. On failure neither store is
    /// touched and the provider's error is returned.
    pub async fn exchange_for_tokens(
        &self,
        session_id: &str,
        proof: &GrantProof,
    ) -> Result<TokenPayload> {
        debug!(session_id = %session_id, grant_type = ?proof.grant_type, "Requesting tokens");

        let tokens = match self.endpoint.request_tokens(proof).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Token exchange failed");
                return Err(e);
            }
        };

        self.refresh_tokens
            .write()
            .insert(session_id.to_string(), tokens.refresh_token.clone());

        let ttl = access_token_ttl(tokens.expires_in);
        {
            let mut cache = self.access_tokens.lock();
            if ttl.is_zero() {
                // Deliberately not "never expires": a zero-lifetime token is dropped
                // and the next read refreshes again.
                cache.remove(session_id);
            } else {
                cache.set(session_id, tokens.access_token.clone(), Some(ttl));
            }
        }

        info!(
            session_id = %session_id,
            expires_in = tokens.expires_in,
            ttl_secs = ttl.as_secs(),
            "Access token and refresh token received"
        );
        Ok(tokens)
    }

    /// Exchange an authorization code from the provider redirect.
    pub async fn exchange_code(&self, session_id: &str, code: &str) -> Result<TokenPayload> {
        let proof = GrantProof::authorization_code(&self.config, code);
        self.exchange_for_tokens(session_id, &proof).await
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// A session without a refresh token still sends the request (without the
    /// `refresh_token` field); the provider's rejection is returned as-is.
    pub async fn refresh_access_token(&self, session_id: &str) -> Result<TokenPayload> {
        let refresh_token = self.refresh_token(session_id);
        if refresh_token.is_none() {
            debug!(session_id = %session_id, "Refreshing without a stored refresh token");
        }
        let proof = GrantProof::refresh_token(&self.config, refresh_token);
        self.exchange_for_tokens(session_id, &proof).await
    }

    /// Return a live access token, refreshing on a cache miss.
    pub async fn get_access_token(&self, session_id: &str) -> Result<String> {
        let cached = self.access_tokens.lock().get(session_id);
        if let Some(token) = cached {
            trace!(session_id = %session_id, "Access token cache hit");
            return Ok(token);
        }

        debug!(session_id = %session_id, "Access token cache miss, refreshing");
        let tokens = self.refresh_access_token(session_id).await?;
        Ok(tokens.access_token)
    }

    /// Whether a refresh token has been stored for `session_id`.
    pub fn is_authorized(&self, session_id: &str) -> bool {
        self.refresh_tokens.read().contains_key(session_id)
    }

    pub fn session_state(&self, session_id: &str) -> SessionState {
        if !self.is_authorized(session_id) {
            SessionState::Unauthorized
        } else if self.access_tokens.lock().contains(session_id) {
            SessionState::AuthorizedCached
        } else {
            SessionState::AuthorizedNoToken
        }
    }

    /// Stored refresh token for `session_id`.
    pub fn refresh_token(&self, session_id: &str) -> Option<String> {
        self.refresh_tokens.read().get(session_id).cloned()
    }

    /// Live cached access token, without triggering a refresh.
    pub fn cached_access_token(&self, session_id: &str) -> Option<String> {
        self.access_tokens.lock().peek(session_id).cloned()
    }

    /// Time left before the cached access token is evicted.
    pub fn access_token_remaining(&self, session_id: &str) -> Option<Duration> {
        self.access_tokens.lock().remaining(session_id)
    }

    /// Drop the cached access token so the next read refreshes it.
    pub fn evict_access_token(&self, session_id: &str) -> bool {
        self.access_tokens.lock().remove(session_id).is_some()
    }

    /// Remove elapsed access tokens. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let expired = self.access_tokens.lock().purge_expired();
        if !expired.is_empty() {
            debug!(count = expired.len(), "Purged expired access tokens");
        }
        expired.len()
    }

    /// Snapshot of a session's token state for display.
    pub fn token_info(&self, session_id: &str) -> TokenInfo {
        TokenInfo {
            state: self.session_state(session_id),
            expires_in: self.access_token_remaining(session_id),
        }
    }

    /// Number of sessions with a stored refresh token.
    pub fn authorized_sessions(&self) -> usize {
        self.refresh_tokens.read().len()
    }
}

/// Information about a session's tokens for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub state: SessionState,
    /// Remaining cache lifetime of the access token.
    pub expires_in: Option<Duration>,
}

impl TokenInfo {
    pub fn expires_in_display(&self) -> String {
        match (self.state, self.expires_in) {
            (SessionState::AuthorizedCached, None) => "No expiry".to_string(),
            (_, None) => "Expired (will refresh on next use)".to_string(),
            (_, Some(remaining)) => {
                let secs = remaining.as_secs();
                let hours = secs / 3600;
                let minutes = (secs % 3600) / 60;
                format!("{}h {}m", hours, minutes)
            }
        }
    }
}
