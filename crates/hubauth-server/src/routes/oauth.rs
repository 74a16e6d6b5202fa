//! OAuth flow endpoints: consent redirect and provider callback.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::session::SessionId;
use crate::state::AppState;

/// Message shown when the provider redirects back without a code.
pub const MISSING_CODE_MESSAGE: &str = "Missing authorization code";

/// Query parameters the provider appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    /// Set by the provider when the user denies consent.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Redirect target for the error page.
pub fn error_redirect(message: &str) -> Redirect {
    Redirect::to(&format!("/error?msg={}", urlencoding::encode(message)))
}

/// `GET /install` - send the user to the provider consent page.
pub async fn install_handler(State(state): State<AppState>, session: SessionId) -> Redirect {
    info!(session_id = %session, "Redirecting user to OAuth consent page");
    Redirect::to(&state.authorization_url)
}

/// `GET /oauth-callback?code=...` - exchange the code for tokens.
pub async fn callback_handler(
    State(state): State<AppState>,
    session: SessionId,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    if let Some(error) = query.error.as_deref() {
        let message = query.error_description.as_deref().unwrap_or(error);
        warn!(session_id = %session, error = %error, "Provider returned an error to the callback");
        return error_redirect(message);
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return error_redirect(MISSING_CODE_MESSAGE);
    };

    match state.tokens.exchange_code(session.as_str(), code).await {
        Ok(_) => Redirect::to("/"),
        Err(e) => error_redirect(&e.user_message()),
    }
}
