// src/pipeline/fetch.rs

//! Feed fetch pipeline.

use chrono::Utc;

use crate::error::Result;
use crate::pipeline::diff::{PostDiff, calculate_diff};
use crate::services::FeedClient;
use crate::storage::{PostStorage, Snapshot};

/// Result of one fetch run.
#[derive(Debug)]
pub struct FetchOutcome {
    pub snapshot: Snapshot,
    /// Changes relative to the previously stored snapshot
    pub diff: PostDiff,
    /// Stored snapshot already held the same posts
    pub unchanged: bool,
}

/// Fetch the feed, store the snapshot, and report what changed.
///
/// Any fetch or parse failure is returned as-is and leaves the stored
/// snapshot untouched.
pub async fn run_fetch(client: &FeedClient, storage: &dyn PostStorage) -> Result<FetchOutcome> {
    let start_time = Utc::now();
    log::info!("Fetching feed {}", client.url());

    let posts = client.fetch_posts().await?;
    let snapshot = Snapshot::new(client.url(), posts, start_time)?;

    let previous = match storage.load_snapshot().await {
        Ok(previous) => previous,
        Err(e) => {
            log::warn!("Ignoring unreadable snapshot at {}: {}", storage.location(), e);
            None
        }
    };
    let (diff, unchanged) = match &previous {
        Some(prev) => (
            calculate_diff(&prev.posts, &snapshot.posts),
            prev.same_posts(&snapshot),
        ),
        None => (calculate_diff(&[], &snapshot.posts), false),
    };

    storage.write_snapshot(&snapshot).await?;

    let elapsed = Utc::now() - start_time;
    if unchanged {
        log::info!(
            "Feed unchanged: {} posts ({} ms)",
            snapshot.count,
            elapsed.num_milliseconds()
        );
    } else {
        log::info!(
            "Fetched {} posts: {} new, {} retitled, {} gone ({} ms)",
            snapshot.count,
            diff.added.len(),
            diff.updated.len(),
            diff.removed.len(),
            elapsed.num_milliseconds()
        );
    }

    Ok(FetchOutcome {
        snapshot,
        diff,
        unchanged,
    })
}
