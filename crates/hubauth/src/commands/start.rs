//! Start command - launches the OAuth demo server.

use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::{info, warn};

use hubauth_server::Server;

use super::Context;
use crate::browser;
use crate::config::{ListenArgs, OAuthArgs};

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub oauth: OAuthArgs,

    #[command(flatten)]
    pub listen: ListenArgs,

    /// Do not open the home page in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Seconds between sweeps of expired access tokens (0 disables)
    #[arg(long, default_value_t = 600)]
    pub sweep_interval: u64,

    /// Mark the session cookie Secure (when served behind HTTPS)
    #[arg(long)]
    pub secure_cookie: bool,
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    let sweep_interval = (args.sweep_interval > 0).then(|| Duration::from_secs(args.sweep_interval));
    let config = args
        .listen
        .server_config()
        .with_sweep_interval(sweep_interval)
        .with_secure_cookie(args.secure_cookie);
    let oauth = args.oauth.resolve(args.listen.redirect_uri(&config))?;

    if ctx.verbose {
        println!("Redirect URI: {}", oauth.redirect_uri);
        println!("Scope: {}", oauth.scope);
    }

    let listen_config = config.clone();
    let server = Server::new(oauth, config).context("Invalid OAuth configuration")?;

    let (addr, serving) = server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested");
        })
        .await
        .context("Failed to start server")?;

    // Port 0 binds an ephemeral port, so derive the URL from the bound address
    let base_url = listen_config.with_bind_address(addr).base_url();
    println!("OAuth app running at {}", base_url);
    info!(addr = %addr, "Server listening");

    if !args.no_open && browser::open_url(&base_url).is_err() {
        println!("(Could not open browser automatically)");
    }

    // Resolves once in-flight requests have drained after ctrl-c
    serving.await.context("Server task panicked")??;
    Ok(())
}
