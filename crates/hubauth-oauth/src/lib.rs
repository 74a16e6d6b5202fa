//! OAuth 2.0 authorization-code token lifecycle.
//!
//! Exchanges authorization codes for access/refresh token pairs, keeps the
//! refresh token per browser session and caches the access token in memory
//! with an expiry-aware refresh.
//!
//! # Components
//!
//! - [`oauth`] - provider configuration, authorization URL, grant proofs, token endpoint client
//! - [`token_manager`] - per-session stores and the exchange/refresh/get operations
//! - [`ttl`] - per-entry TTL map backing the access-token cache

pub mod error;
pub mod oauth;
pub mod token_manager;
pub mod ttl;

pub use error::{OAuthError, ProviderError, Result};
pub use oauth::{
    GrantProof, GrantType, HttpTokenEndpoint, OAuthConfig, TokenEndpoint, TokenPayload,
    build_authorization_url,
};
pub use token_manager::{SessionState, SharedTokenManager, TokenInfo, TokenManager};
pub use ttl::ExpiringCache;
