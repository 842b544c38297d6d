//! Storage abstractions for post snapshots.
//!
//! The last successful fetch is kept on disk so a failed refresh can keep
//! serving the previous list.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml    # Archive configuration
//! └── posts.json     # Latest snapshot
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::Post;

// Re-export for convenience
pub use local::LocalStorage;

/// A fetched post list plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the feed was fetched
    pub updated_at: DateTime<Utc>,
    /// Feed URL the posts came from
    pub source: String,
    /// Total post count
    pub count: usize,
    /// SHA-256 of the posts' content, hex encoded
    pub digest: String,
    /// Posts in feed order
    pub posts: Vec<Post>,
}

impl Snapshot {
    pub fn new(
        source: impl Into<String>,
        posts: Vec<Post>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            updated_at,
            source: source.into(),
            count: posts.len(),
            digest: digest_posts(&posts)?,
            posts,
        })
    }

    /// Whether two snapshots hold the same posts, ignoring fetch time.
    pub fn same_posts(&self, other: &Snapshot) -> bool {
        self.digest == other.digest
    }
}

/// Fields of a [`Post`] that feed into the digest.
///
/// `date_iso` is left out: undated entries take the fetch time, which would
/// make every refetch of such a feed look like a change.
#[derive(Serialize)]
struct DigestKey<'a> {
    id: &'a str,
    title: &'a str,
    url: &'a str,
    tags: &'a [String],
    summary: &'a str,
}

impl<'a> From<&'a Post> for DigestKey<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            id: &post.id,
            title: &post.title,
            url: &post.url,
            tags: &post.tags,
            summary: &post.summary,
        }
    }
}

/// Content digest of a post list.
pub fn digest_posts(posts: &[Post]) -> Result<String> {
    let keys: Vec<DigestKey<'_>> = posts.iter().map(DigestKey::from).collect();
    let bytes = serde_json::to_vec(&keys)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait PostStorage: Send + Sync {
    /// Replace the stored snapshot.
    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()>;

    /// Load the stored snapshot, `None` if nothing has been written yet.
    async fn load_snapshot(&self) -> Result<Option<Snapshot>>;

    /// Human-readable location of the snapshot.
    fn location(&self) -> String;
}
