//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use hubauth_oauth::OAuthError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The session has not completed the OAuth flow.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Token endpoint failure.
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ServerError::OAuth(OAuthError::Provider(_)) => {
                (StatusCode::BAD_GATEWAY, "provider_error")
            }
            ServerError::OAuth(OAuthError::Network(_)) => {
                (StatusCode::BAD_GATEWAY, "network_error")
            }
            ServerError::OAuth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "oauth_error"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
