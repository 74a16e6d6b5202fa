//! OAuth 2.0 authorization-code flow: provider configuration, grant proofs
//! and the token endpoint client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{OAuthError, ProviderError, Result};

/// HubSpot consent page.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://app.hubspot.com/oauth/authorize";

/// HubSpot token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v3/token";

/// Scope requested when none is configured.
pub const DEFAULT_SCOPE: &str = "crm.objects.companies.read crm.objects.companies.write";

/// OAuth client configuration, resolved once at start-up.
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

impl OAuthConfig {
    /// Create a config pointing at the HubSpot endpoints with the default scope.
    pub fn hubspot(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Override the requested scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Override the token endpoint (e.g. a mock server in tests).
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Override the consent page URL.
    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = authorize_url.into();
        self
    }

    /// Reject configs that cannot possibly authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(OAuthError::Config("client_id is empty".to_string()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(OAuthError::Config("client_secret is empty".to_string()));
        }
        Ok(())
    }
}

/// Build the consent page URL the user is redirected to.
pub fn build_authorization_url(config: &OAuthConfig) -> String {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("scope", config.scope.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", config.authorize_url, query)
}

/// The two grants this client knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

/// Form body posted to the token endpoint.
///
/// Exactly one of `code` / `refresh_token` is meaningful, depending on
/// `grant_type`. A refresh proof built for a session with no stored refresh
/// token leaves the field out entirely and lets the provider reject it.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct GrantProof {
    pub grant_type: GrantType,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for GrantProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrantProof")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("has_code", &self.code.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl GrantProof {
    /// Proof for exchanging an authorization code.
    pub fn authorization_code(config: &OAuthConfig, code: impl Into<String>) -> Self {
        Self {
            grant_type: GrantType::AuthorizationCode,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            code: Some(code.into()),
            refresh_token: None,
        }
    }

    /// Proof for refreshing an access token.
    pub fn refresh_token(config: &OAuthConfig, refresh_token: Option<String>) -> Self {
        Self {
            grant_type: GrantType::RefreshToken,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            code: None,
            refresh_token,
        }
    }
}

/// Token payload returned by a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Local RFC 3339 timestamp of when the payload was received.
    #[serde(default)]
    pub obtained_at: String,
    /// Any other provider fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Something that can trade a grant proof for tokens.
#[async_trait]
pub trait TokenEndpoint: Send + Sync + std::fmt::Debug {
    /// POST the proof and return the parsed payload or a structured failure.
    async fn request_tokens(&self, proof: &GrantProof) -> Result<TokenPayload>;
}

/// Token endpoint reached over HTTP with a form-encoded body.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    client: reqwest::Client,
    token_url: String,
}

impl HttpTokenEndpoint {
    pub fn new(token_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), token_url)
    }

    pub fn with_client(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }

    pub fn from_config(config: &OAuthConfig) -> Self {
        Self::new(config.token_url.clone())
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn request_tokens(&self, proof: &GrantProof) -> Result<TokenPayload> {
        let response = self
            .client
            .post(&self.token_url)
            .form(proof)
            .send()
            .await
            .map_err(|e| OAuthError::Network(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuthError::Network(format!("Failed to read token response: {}", e)))?;

        if !status.is_success() {
            return Err(OAuthError::Provider(ProviderError::from_body(
                status.as_u16(),
                &body,
            )));
        }

        let mut tokens: TokenPayload = serde_json::from_str(&body).map_err(|e| {
            OAuthError::Serialization(format!("Failed to parse token response: {}", e))
        })?;
        tokens.obtained_at = chrono::Utc::now().to_rfc3339();

        Ok(tokens)
    }
}
