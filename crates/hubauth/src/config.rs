//! Start-up configuration resolved from CLI flags, the environment and `.env`.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Result, bail};
use clap::Args;

use hubauth_oauth::OAuthConfig;
use hubauth_server::ServerConfig;
use hubauth_server::config::DEFAULT_PORT;

/// OAuth client credentials and provider overrides.
#[derive(Args, Debug, Clone)]
pub struct OAuthArgs {
    /// OAuth client id
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Space-separated scopes to request
    #[arg(long, env = "SCOPE")]
    pub scope: Option<String>,

    /// Token endpoint (overrides the HubSpot default)
    #[arg(long, env = "HUBAUTH_TOKEN_URL")]
    pub token_url: Option<String>,

    /// Consent page (overrides the HubSpot default)
    #[arg(long, env = "HUBAUTH_AUTHORIZE_URL")]
    pub authorize_url: Option<String>,
}

impl OAuthArgs {
    /// Build the OAuth config, failing fast on missing credentials.
    pub fn resolve(&self, redirect_uri: String) -> Result<OAuthConfig> {
        let (Some(client_id), Some(client_secret)) = (
            non_empty(self.client_id.as_deref()),
            non_empty(self.client_secret.as_deref()),
        ) else {
            bail!("Missing CLIENT_ID or CLIENT_SECRET (set them in the environment or a .env file)");
        };

        let mut config = OAuthConfig::hubspot(client_id, client_secret, redirect_uri);
        if let Some(scope) = non_empty(self.scope.as_deref()) {
            config = config.with_scope(scope);
        }
        if let Some(token_url) = non_empty(self.token_url.as_deref()) {
            config = config.with_token_url(token_url);
        }
        if let Some(authorize_url) = non_empty(self.authorize_url.as_deref()) {
            config = config.with_authorize_url(authorize_url);
        }
        Ok(config)
    }
}

/// Where the server listens and how the provider reaches it.
#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    /// Address to bind to
    #[arg(long, env = "HUBAUTH_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "HUBAUTH_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Redirect URI registered with the provider (default: http://localhost:<port>/oauth-callback)
    #[arg(long, env = "HUBAUTH_REDIRECT_URI")]
    pub redirect_uri: Option<String>,
}

impl ListenArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new().with_bind_address(SocketAddr::new(self.host, self.port))
    }

    pub fn redirect_uri(&self, config: &ServerConfig) -> String {
        non_empty(self.redirect_uri.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| config.redirect_uri())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth_args(client_id: Option<&str>, client_secret: Option<&str>) -> OAuthArgs {
        OAuthArgs {
            client_id: client_id.map(str::to_string),
            client_secret: client_secret.map(str::to_string),
            scope: None,
            token_url: None,
            authorize_url: None,
        }
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let redirect = "http://localhost:3000/oauth-callback".to_string();
        assert!(oauth_args(None, Some("s")).resolve(redirect.clone()).is_err());
        assert!(oauth_args(Some("c"), None).resolve(redirect.clone()).is_err());
        assert!(oauth_args(Some(" "), Some("s")).resolve(redirect).is_err());
    }

    #[test]
    fn test_resolve_with_overrides() {
        let mut args = oauth_args(Some("c"), Some("s"));
        args.scope = Some("oauth".to_string());
        args.token_url = Some("http://127.0.0.1:9999/token".to_string());

        let config = args
            .resolve("http://localhost:3000/oauth-callback".to_string())
            .unwrap();
        assert_eq!(config.client_id, "c");
        assert_eq!(config.scope, "oauth");
        assert_eq!(config.token_url, "http://127.0.0.1:9999/token");
        assert_eq!(config.authorize_url, hubauth_oauth::oauth::DEFAULT_AUTHORIZE_URL);
    }

    #[test]
    fn test_default_scope() {
        let config = oauth_args(Some("c"), Some("s"))
            .resolve("http://localhost:3000/oauth-callback".to_string())
            .unwrap();
        assert_eq!(config.scope, hubauth_oauth::oauth::DEFAULT_SCOPE);
    }

    #[test]
    fn test_listen_redirect_uri() {
        let listen = ListenArgs {
            host: "127.0.0.1".parse().unwrap(),
            port: 4000,
            redirect_uri: None,
        };
        let config = listen.server_config();
        assert_eq!(listen.redirect_uri(&config), "http://localhost:4000/oauth-callback");

        let custom = ListenArgs {
            redirect_uri: Some("https://example.test/cb".to_string()),
            ..listen
        };
        assert_eq!(custom.redirect_uri(&config), "https://example.test/cb");
    }
}
