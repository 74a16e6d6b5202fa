//! HTTP front end for the hubauth OAuth 2.0 authorization-code demo.
//!
//! Serves a status page per browser session, redirects to the provider's
//! consent page, receives the authorization code on the callback route and
//! hands it to the [`hubauth_oauth::TokenManager`].
//!
//! # Routes
//!
//! - `GET /` - status page (access token or install link)
//! - `GET /install` - redirect to the provider consent page
//! - `GET /oauth-callback` - authorization code exchange
//! - `GET /error` - error page
//! - `GET /api/status`, `GET /api/token` - JSON views of the session's tokens
//! - `GET /health` - health check
//!
//! # Example
//!
//! ```ignore
//! use hubauth_oauth::OAuthConfig;
//! use hubauth_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::new();
//! let oauth = OAuthConfig::hubspot(client_id, client_secret, config.redirect_uri());
//! Server::new(oauth, config)?.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod html;
pub mod logging;
pub mod routes;
pub mod session;
pub mod state;
pub mod sweeper;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use session::{SessionId, session_middleware};
pub use state::AppState;

use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use hubauth_oauth::OAuthConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The hubauth HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a server that exchanges tokens with the provider over HTTP.
    pub fn new(oauth: OAuthConfig, config: ServerConfig) -> Result<Self> {
        oauth
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Self::from_state(AppState::new(oauth, config)))
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(routes::home_handler))
            .route("/install", get(routes::install_handler))
            .route("/oauth-callback", get(routes::callback_handler))
            .route("/error", get(routes::error_page_handler))
            .route("/api/status", get(routes::status_handler))
            .route("/api/token", get(routes::token_handler))
            // Every route above runs inside a browser session
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                session::session_middleware,
            ))
            .route("/health", get(routes::health))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until the process exits.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
        self.serve(listener, std::future::pending()).await
    }

    /// Bind, then serve in the background until `shutdown` resolves.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// binding to port 0, and the serving task. The task resolves once
    /// in-flight requests have drained after `shutdown`.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(SocketAddr, JoinHandle<Result<()>>)> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let handle = tokio::spawn(self.serve(listener, shutdown));
        Ok((local_addr, handle))
    }

    async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        let sweeper = self
            .state
            .config
            .sweep_interval
            .map(|interval| sweeper::spawn_sweeper(self.state.tokens.clone(), interval));

        info!(addr = %local_addr, "Starting hubauth server");
        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)));

        if let Some(handle) = sweeper {
            handle.abort();
        }
        info!("Server stopped");
        result
    }
}
