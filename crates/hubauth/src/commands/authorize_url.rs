//! Authorize-url command - prints the provider consent URL.

use anyhow::Result;
use clap::Args;

use super::Context;
use crate::config::{ListenArgs, OAuthArgs};

/// Arguments for the authorize-url command.
#[derive(Args, Debug)]
pub struct AuthorizeUrlArgs {
    #[command(flatten)]
    pub oauth: OAuthArgs,

    #[command(flatten)]
    pub listen: ListenArgs,
}

/// Run the authorize-url command.
pub async fn run(args: AuthorizeUrlArgs, ctx: &Context) -> Result<()> {
    let server_config = args.listen.server_config();
    let oauth = args.oauth.resolve(args.listen.redirect_uri(&server_config))?;

    if ctx.verbose {
        eprintln!("Redirect URI: {}", oauth.redirect_uri);
        eprintln!("Scope: {}", oauth.scope);
    }
    println!("{}", hubauth_oauth::build_authorization_url(&oauth));
    Ok(())
}
