//! Per-request access log.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Log one line per request once the response is ready.
///
/// Only the path is recorded: the callback query string carries the
/// authorization code. Health probes are logged at debug.
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    match status {
        500.. => error!(%method, %path, status, latency_ms, "Request failed"),
        400..=499 => warn!(%method, %path, status, latency_ms, "Request rejected"),
        _ if path == "/health" => debug!(%method, %path, status, latency_ms, "Health probe"),
        _ => info!(%method, %path, status, latency_ms, "Request handled"),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use hubauth_oauth::OAuthConfig;
    use tower::ServiceExt;

    fn logged_router(request_logging: bool) -> Router {
        let oauth = OAuthConfig::hubspot("client", "secret", "http://localhost:3000/oauth-callback");
        let state = AppState::new(
            oauth,
            ServerConfig::new().with_request_logging(request_logging),
        );
        Router::new()
            .route("/oauth-callback", get(|| async { "ok" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                request_logging_middleware,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_response_passes_through() {
        for enabled in [true, false] {
            let ok = logged_router(enabled)
                .oneshot(
                    Request::builder()
                        .uri("/oauth-callback?code=secret")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(ok.status(), StatusCode::OK);

            let missing = logged_router(enabled)
                .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        }
    }
}
