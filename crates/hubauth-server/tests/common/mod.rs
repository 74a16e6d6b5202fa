//! Common test utilities for integration tests.

use std::net::SocketAddr;

use anyhow::Result;
use reqwest::Client;
use tokio::sync::oneshot;
use wiremock::MockServer;

use hubauth_oauth::OAuthConfig;
use hubauth_server::{Server, ServerConfig};

/// A hubauth server running in the background against a mock provider.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// Mock provider token endpoint.
    pub provider: MockServer,
    /// Signals graceful shutdown when dropped.
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    /// Start a server whose token endpoint is a fresh wiremock server.
    pub async fn start() -> Result<Self> {
        let provider = MockServer::start().await;

        let config = ServerConfig::new()
            .with_bind_address("127.0.0.1:0".parse()?)
            .with_sweep_interval(None)
            .with_request_logging(false);
        let oauth = OAuthConfig::hubspot("test-client", "test-secret", config.redirect_uri())
            .with_token_url(format!("{}/oauth/v3/token", provider.uri()));

        let (tx, rx) = oneshot::channel::<()>();
        let server = Server::new(oauth, config)?;
        let (addr, _serving) = server
            .run_with_shutdown(async move {
                let _ = rx.await;
            })
            .await?;

        Ok(Self {
            addr,
            provider,
            _shutdown: tx,
        })
    }

    /// Build a URL for the given path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A browser-like client: keeps cookies, does not follow redirects.
    pub fn browser(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build client")
    }
}

/// Successful token endpoint body.
pub fn token_body(access: &str, refresh: &str, expires_in: u64) -> serde_json::Value {
    serde_json::json!({
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": expires_in,
        "token_type": "bearer"
    })
}
