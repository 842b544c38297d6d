// src/pipeline/list.rs

//! Archive listing: load posts, apply the view state, print the result.

use std::io::Write;

use crate::error::{AppError, Result};
use crate::models::{Config, Post, ViewState};
use crate::services::{FeedClient, recompute};
use crate::storage::PostStorage;

/// Shown when no post survives the filters.
pub const EMPTY_STATE: &str = "No posts match your search/filters.";

/// Where the listing reads its posts from.
pub enum PostSource<'a> {
    /// Last stored snapshot
    Snapshot(&'a dyn PostStorage),
    /// Fresh fetch, bypassing storage
    Live(&'a FeedClient),
}

/// Load the post list from the given source.
pub async fn load_posts(source: PostSource<'_>) -> Result<Vec<Post>> {
    match source {
        PostSource::Live(client) => client.fetch_posts().await,
        PostSource::Snapshot(storage) => match storage.load_snapshot().await? {
            Some(snapshot) => {
                log::debug!(
                    "Loaded {} posts fetched at {}",
                    snapshot.count,
                    snapshot.updated_at
                );
                Ok(snapshot.posts)
            }
            None => Err(AppError::config(format!(
                "No snapshot found at {}. Run 'fetch' first",
                storage.location()
            ))),
        },
    }
}

/// Print the visible posts for `state`. Returns how many were shown.
pub fn run_list<W: Write>(
    config: &Config,
    posts: &[Post],
    state: &ViewState,
    out: &mut W,
) -> Result<usize> {
    let visible = recompute(posts, state);

    writeln!(out, "{}", config.site.display_title())?;
    writeln!(out, "{}", config.site.display_tagline())?;
    writeln!(out, "{}", describe_state(state, visible.len(), posts.len()))?;
    writeln!(out)?;

    if visible.is_empty() {
        writeln!(out, "{EMPTY_STATE}")?;
        return Ok(0);
    }

    for post in &visible {
        writeln!(out, "{}", post.format(&config.output.template))?;
    }
    Ok(visible.len())
}

/// Print the known tag vocabulary, marking the active ones.
pub fn run_tags<W: Write>(config: &Config, state: &ViewState, out: &mut W) -> Result<()> {
    for tag in &config.tags.known {
        let mark = if state.is_tag_active(tag) { "*" } else { " " };
        writeln!(out, "[{mark}] {tag}")?;
    }
    Ok(())
}

fn describe_state(state: &ViewState, shown: usize, total: usize) -> String {
    let mut parts = vec![format!("{shown}/{total} posts"), format!("sort: {}", state.sort)];
    let query = state.query.trim();
    if !query.is_empty() {
        parts.push(format!("query: \"{query}\""));
    }
    if !state.active_tags.is_empty() {
        let tags: Vec<&str> = state.active_tags.iter().map(String::as_str).collect();
        parts.push(format!("tags: {}", tags.join(" + ")));
    }
    parts.join(" | ")
}
