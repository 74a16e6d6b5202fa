//! Cookie-backed browser sessions.
//!
//! Every request gets a [`SessionId`]: the value of the session cookie when
//! it holds a well-formed id, otherwise a freshly generated UUID that is set
//! on the response. The id only keys the in-memory token stores; nothing else
//! is kept per session.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Opaque per-browser session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a cookie value only if it looks like an id we issued.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value)
            .ok()
            .map(|uuid| Self(uuid.hyphenated().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or_else(|| ServerError::Internal("session middleware not installed".to_string()))
    }
}

/// Attach a [`SessionId`] to the request, issuing a cookie for new sessions.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session_cookie.clone();
    let existing = jar
        .get(&cookie_name)
        .and_then(|cookie| SessionId::parse(cookie.value()));

    let (session_id, is_new) = match existing {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    };

    request.extensions_mut().insert(session_id.clone());
    let response = next.run(request).await;

    if !is_new {
        return response;
    }

    debug!(session_id = %session_id, "Issued new session");
    let cookie = Cookie::build((cookie_name, session_id.0))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookie);

    (jar.add(cookie), response).into_response()
}
