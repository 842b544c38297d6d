// src/pipeline/watch.rs

//! Fixed-interval revalidation loop.
//!
//! A failed refresh leaves the previous snapshot in place, so readers keep
//! seeing stale posts instead of nothing.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

use crate::error::Result;
use crate::pipeline::fetch::run_fetch;
use crate::services::FeedClient;
use crate::storage::PostStorage;

/// What a single scheduled refresh ended up serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    /// New snapshot written
    Fresh { count: usize, unchanged: bool },
    /// Fetch failed, previous snapshot still served
    Stale { count: usize, error: String },
    /// Fetch failed and there is nothing to fall back to
    Empty { error: String },
    /// Fetch failed and the stored snapshot could not be read
    Unreadable { error: String, load_error: String },
}

/// Run one refresh, falling back to the stored snapshot on failure.
pub async fn refresh(client: &FeedClient, storage: &dyn PostStorage) -> RefreshStatus {
    match run_fetch(client, storage).await {
        Ok(outcome) => RefreshStatus::Fresh {
            count: outcome.snapshot.count,
            unchanged: outcome.unchanged,
        },
        Err(e) => {
            let error = e.to_string();
            match storage.load_snapshot().await {
                Ok(Some(snapshot)) => {
                    log::warn!(
                        "Refresh failed, serving {} posts from {}: {}",
                        snapshot.count,
                        snapshot.updated_at,
                        error
                    );
                    RefreshStatus::Stale {
                        count: snapshot.count,
                        error,
                    }
                }
                Ok(None) => {
                    log::error!("Refresh failed with no snapshot to serve: {}", error);
                    RefreshStatus::Empty { error }
                }
                Err(load_error) => {
                    log::error!(
                        "Refresh failed ({}) and snapshot at {} is unreadable: {}",
                        error,
                        storage.location(),
                        load_error
                    );
                    RefreshStatus::Unreadable {
                        error,
                        load_error: load_error.to_string(),
                    }
                }
            }
        }
    }
}

/// Refresh every `every` until Ctrl-C.
pub async fn run_watch(
    client: &FeedClient,
    storage: &dyn PostStorage,
    every: Duration,
) -> Result<()> {
    log::info!("Revalidating every {}s. Press Ctrl-C to stop.", every.as_secs());

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresh(client, storage).await;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                log::info!("Stopping revalidation loop");
                return Ok(());
            }
        }
    }
}
