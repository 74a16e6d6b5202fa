//! JSON endpoints for scripted access to the session's token state.

use axum::{Json, extract::State};
use serde::Serialize;

use hubauth_oauth::SessionState;

use crate::error::{Result, ServerError};
use crate::session::SessionId;
use crate::state::AppState;

/// Authorization state of the calling session.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authorized: bool,
    /// `unauthorized`, `authorized_no_token` or `authorized_cached`.
    pub state: &'static str,
    /// Seconds until the cached access token is refreshed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
}

/// A live access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Unauthorized => "unauthorized",
        SessionState::AuthorizedNoToken => "authorized_no_token",
        SessionState::AuthorizedCached => "authorized_cached",
    }
}

/// `GET /api/status`
pub async fn status_handler(
    State(state): State<AppState>,
    session: SessionId,
) -> Json<StatusResponse> {
    let info = state.tokens.token_info(session.as_str());
    Json(StatusResponse {
        authorized: info.state.is_authorized(),
        state: state_name(info.state),
        expires_in_secs: info.expires_in.map(|d| d.as_secs()),
    })
}

/// `GET /api/token` - the access token, refreshed if needed.
pub async fn token_handler(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<TokenResponse>> {
    if !state.tokens.is_authorized(session.as_str()) {
        return Err(ServerError::Unauthorized(
            "Session has not completed the OAuth flow".to_string(),
        ));
    }

    let access_token = state.tokens.get_access_token(session.as_str()).await?;
    Ok(Json(TokenResponse {
        access_token,
        expires_in_secs: state
            .tokens
            .access_token_remaining(session.as_str())
            .map(|d| d.as_secs()),
    }))
}
