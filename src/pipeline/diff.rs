//! Diff between two post lists.
//!
//! Used after a refresh to report which posts appeared, disappeared or were
//! retitled since the previous snapshot.

use std::collections::{HashMap, HashSet};

use crate::models::Post;

/// IDs that changed between two snapshots, in current/previous feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDiff {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl PostDiff {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty() || !self.removed.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// Calculate the diff between previous and current post lists.
///
/// Posts are matched by `id`. Positional ids can shift between refreshes,
/// in which case a post shows up as removed and re-added.
pub fn calculate_diff(previous: &[Post], current: &[Post]) -> PostDiff {
    let prev_map: HashMap<&str, &Post> = previous.iter().map(|p| (p.id.as_str(), p)).collect();
    let curr_ids: HashSet<&str> = current.iter().map(|p| p.id.as_str()).collect();

    let mut added = Vec::new();
    let mut updated = Vec::new();
    let mut seen = HashSet::new();

    for post in current {
        if !seen.insert(post.id.as_str()) {
            continue;
        }
        match prev_map.get(post.id.as_str()) {
            None => added.push(post.id.clone()),
            Some(prev) if prev.title != post.title => updated.push(post.id.clone()),
            Some(_) => {}
        }
    }

    let mut removed_seen = HashSet::new();
    let removed = previous
        .iter()
        .map(|p| p.id.as_str())
        .filter(|id| !curr_ids.contains(id) && removed_seen.insert(*id))
        .map(str::to_string)
        .collect();

    PostDiff {
        added,
        updated,
        removed,
    }
}
