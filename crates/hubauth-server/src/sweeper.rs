//! Background sweep of expired access tokens.
//!
//! Reads already ignore expired entries; the sweep only releases memory held
//! by sessions that never come back.

use std::time::Duration;

use hubauth_oauth::SharedTokenManager;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn a task that purges expired access tokens every `interval`.
pub fn spawn_sweeper(tokens: SharedTokenManager, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Access token sweeper started");
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let purged = tokens.purge_expired();
            debug!(purged, "Access token sweep complete");
        }
    })
}
