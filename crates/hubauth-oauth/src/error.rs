//! Error types for the OAuth token lifecycle.

use serde::Serialize;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OAuthError>;

/// Errors that can occur while talking to the provider's token endpoint.
///
/// A failed exchange never mutates the token stores, so every variant here
/// means "state unchanged".
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Network/HTTP error before a response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OAuthError {
    /// Human-readable message suitable for an error page.
    ///
    /// For provider failures this is the provider's own message text.
    pub fn user_message(&self) -> String {
        match self {
            OAuthError::Provider(err) => err.message.clone(),
            other => other.to_string(),
        }
    }

    /// The structured provider failure, if this error came from the provider.
    pub fn provider(&self) -> Option<&ProviderError> {
        match self {
            OAuthError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure body returned by the provider's token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderError {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Provider error code (`status` or `error` field), if present.
    pub code: Option<String>,
    /// Provider message (`message` or `error_description` field), falling
    /// back to the raw body text.
    pub message: String,
    /// Parsed JSON body, or `Null` when the body was not JSON.
    pub body: serde_json::Value,
}

impl ProviderError {
    /// Build a provider error from a status code and the raw response body.
    pub fn from_body(status_code: u16, raw: &str) -> Self {
        let body: serde_json::Value =
            serde_json::from_str(raw).unwrap_or(serde_json::Value::Null);

        let field = |name: &str| {
            body.get(name)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        let code = field("status").or_else(|| field("error"));
        let message = field("message")
            .or_else(|| field("error_description"))
            .or_else(|| code.clone())
            .unwrap_or_else(|| {
                if raw.trim().is_empty() {
                    format!("Token endpoint returned HTTP {}", status_code)
                } else {
                    raw.trim().to_string()
                }
            });

        Self {
            status_code,
            code,
            message,
            body,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({}): {}", self.status_code, code, self.message),
            None => write!(f, "{}: {}", self.status_code, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_hubspot_shape() {
        let err = ProviderError::from_body(
            400,
            r#"{"status":"BAD_AUTH_CODE","message":"missing or unknown auth code","correlationId":"abc"}"#,
        );
        assert_eq!(err.status_code, 400);
        assert_eq!(err.code.as_deref(), Some("BAD_AUTH_CODE"));
        assert_eq!(err.message, "missing or unknown auth code");
        assert_eq!(err.body["correlationId"], "abc");
    }

    #[test]
    fn test_provider_error_rfc6749_shape() {
        let err = ProviderError::from_body(
            401,
            r#"{"error":"invalid_grant","error_description":"refresh token revoked"}"#,
        );
        assert_eq!(err.code.as_deref(), Some("invalid_grant"));
        assert_eq!(err.message, "refresh token revoked");
    }

    #[test]
    fn test_provider_error_non_json_body() {
        let err = ProviderError::from_body(502, "Bad Gateway");
        assert_eq!(err.code, None);
        assert_eq!(err.message, "Bad Gateway");
        assert!(err.body.is_null());

        let empty = ProviderError::from_body(500, "");
        assert_eq!(empty.message, "Token endpoint returned HTTP 500");
    }

    #[test]
    fn test_user_message() {
        let err = OAuthError::Provider(ProviderError::from_body(
            400,
            r#"{"message":"expired code"}"#,
        ));
        assert_eq!(err.user_message(), "expired code");
        assert!(err.provider().is_some());

        let net = OAuthError::Network("connection refused".to_string());
        assert_eq!(net.user_message(), "Network error: connection refused");
        assert!(net.provider().is_none());
    }
}
