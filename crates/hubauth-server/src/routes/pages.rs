//! HTML pages: session status and error display.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::warn;

use crate::html;
use crate::session::SessionId;
use crate::state::AppState;

/// Query parameters for the error page.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorQuery {
    pub msg: Option<String>,
}

/// `GET /` - show the access token, or a link to start the flow.
pub async fn home_handler(State(state): State<AppState>, session: SessionId) -> Html<String> {
    if !state.tokens.is_authorized(session.as_str()) {
        return html::install_prompt();
    }

    match state.tokens.get_access_token(session.as_str()).await {
        Ok(token) => html::authorized(&token),
        Err(e) => {
            warn!(session_id = %session, error = %e, "Could not obtain access token");
            html::token_unavailable(&e.user_message())
        }
    }
}

/// `GET /error?msg=...`
pub async fn error_page_handler(Query(query): Query<ErrorQuery>) -> Html<String> {
    html::error(query.msg.as_deref().unwrap_or("Unknown error"))
}
