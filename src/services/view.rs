// src/services/view.rs

//! Filter/sort over an in-memory post list.
//!
//! [`recompute`] is a pure function of the posts and a [`ViewState`]. It
//! borrows the posts and returns references, so the source list is never
//! reordered or copied.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::{Post, SortOrder, ViewState};
use crate::utils::parse_timestamp;

/// Derive the visible, ordered subset of `posts` for `state`.
///
/// An empty result is a normal outcome.
pub fn recompute<'a>(posts: &'a [Post], state: &ViewState) -> Vec<&'a Post> {
    let query = state.query.trim().to_lowercase();

    let mut visible: Vec<(Option<DateTime<Utc>>, &Post)> = posts
        .iter()
        .filter(|post| matches_query(post, &query) && matches_tags(post, state))
        .map(|post| (parse_timestamp(&post.date_iso), post))
        .collect();

    // Unparseable dates compare as `None`, older than any timestamp.
    visible.sort_by(|(a, _), (b, _)| compare_dates(a, b, state.sort));

    visible.into_iter().map(|(_, post)| post).collect()
}

/// Text match against title, summary and space-joined tags.
///
/// `query` must already be trimmed and lowercased.
fn matches_query(post: &Post, query: &str) -> bool {
    query.is_empty()
        || post.title.to_lowercase().contains(query)
        || post.summary.to_lowercase().contains(query)
        || post.tags.join(" ").to_lowercase().contains(query)
}

/// Every active tag must appear on the post.
fn matches_tags(post: &Post, state: &ViewState) -> bool {
    state
        .active_tags
        .iter()
        .all(|tag| post.tags.iter().any(|t| t == tag))
}

fn compare_dates(
    a: &Option<DateTime<Utc>>,
    b: &Option<DateTime<Utc>>,
    sort: SortOrder,
) -> Ordering {
    match sort {
        SortOrder::Newest => b.cmp(a),
        SortOrder::Oldest => a.cmp(b),
    }
}
