// src/services/normalize.rs

//! Feed entry normalization.
//!
//! Maps each raw [`FeedEntry`] to a [`Post`], filling every missing field
//! with a fixed default. Never fails.

use std::sync::Arc;

use crate::models::{FeedEntry, Post};
use crate::services::clock::{Clock, SystemClock};
use crate::utils::{plain_text, to_iso_string, truncate_chars};

/// Title used when an entry has none.
pub const UNTITLED: &str = "Untitled";

/// URL used when an entry has no link.
pub const PLACEHOLDER_URL: &str = "#";

/// Maximum summary length in characters when derived from content.
pub const SUMMARY_MAX_CHARS: usize = 180;

/// Lowercase and trim tags, dropping the ones left empty.
///
/// Order and duplicates are preserved.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Converts feed entries into posts.
#[derive(Clone)]
pub struct Normalizer {
    clock: Arc<dyn Clock>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a normalizer that falls back to wall-clock time for undated entries.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Normalize all entries, keeping feed order.
    pub fn normalize_all(&self, entries: &[FeedEntry]) -> Vec<Post> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.normalize(index, entry))
            .collect()
    }

    /// Normalize one entry at its zero-based feed position.
    pub fn normalize(&self, index: usize, entry: &FeedEntry) -> Post {
        let guid = present(&entry.guid);
        let link = present(&entry.link);

        let id = guid
            .or(link)
            .map_or_else(|| index.to_string(), str::to_string);
        let title = present(&entry.title).unwrap_or(UNTITLED).to_string();
        let url = link.unwrap_or(PLACEHOLDER_URL).to_string();

        let date_iso = present(&entry.iso_date)
            .or_else(|| present(&entry.pub_date))
            .map_or_else(|| to_iso_string(self.clock.now()), str::to_string);

        let tags = entry
            .categories
            .as_deref()
            .map(normalize_tags)
            .unwrap_or_default();

        Post {
            id,
            title,
            url,
            date_iso,
            tags,
            summary: summarize(entry),
        }
    }
}

/// Snippet when present, else truncated plain text of the content.
fn summarize(entry: &FeedEntry) -> String {
    if let Some(snippet) = present(&entry.content_snippet) {
        return snippet.to_string();
    }
    let text = plain_text(entry.content.as_deref().unwrap_or(""));
    truncate_chars(&text, SUMMARY_MAX_CHARS)
}

/// A field counts as present only when set and non-empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
