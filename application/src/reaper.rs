//! Background session reaper
//!
//! Periodically sweeps the session table for sessions idle past the
//! configured threshold. The sweep itself lives on the store; this
//! module only owns the timer loop and its shutdown wiring.

use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Spawn the reaper task.
///
/// Ticks every `interval`, evicting expired sessions, until `shutdown`
/// is cancelled. The returned handle completes once the task has
/// observed the cancellation.
pub fn spawn_reaper(
    store: Arc<SessionStore>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so a fresh
        // process doesn't sweep an empty table.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Reaper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match store.evict_expired(store.now()) {
                        Ok(0) => debug!("Reaper pass: nothing to evict"),
                        Ok(evicted) => {
                            info!("Reaper pass: evicted {} idle session(s)", evicted);
                        }
                        Err(e) => warn!("Reaper pass failed: {}", e),
                    }
                }
            }
        }
    })
}
