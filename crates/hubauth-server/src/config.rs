//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Default port, matching the redirect URI registered with the provider.
pub const DEFAULT_PORT: u16 = 3000;

/// Default cookie carrying the browser session id.
pub const DEFAULT_SESSION_COOKIE: &str = "hubauth.sid";

/// Default interval between sweeps of expired access tokens (10 minutes).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Name of the session cookie.
    pub session_cookie: String,

    /// Mark the session cookie `Secure` (only when served over HTTPS).
    pub secure_cookie: bool,

    /// How often expired access tokens are purged. `None` disables the sweeper.
    pub sweep_interval: Option<Duration>,

    /// Enable request logging.
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            secure_cookie: false,
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
            request_logging: true,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the session cookie name.
    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    /// Mark the session cookie `Secure`.
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Set the sweep interval; `None` disables the background sweeper.
    pub fn with_sweep_interval(mut self, interval: Option<Duration>) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Base URL browsers use to reach the server.
    pub fn base_url(&self) -> String {
        let ip = self.bind_address.ip();
        let host = if ip.is_unspecified() || ip.is_loopback() {
            "localhost".to_string()
        } else {
            ip.to_string()
        };
        format!("http://{}:{}", host, self.bind_address.port())
    }

    /// Redirect URI to register with the provider for this bind address.
    pub fn redirect_uri(&self) -> String {
        format!("{}/oauth-callback", self.base_url())
    }
}
