//! View state driving which posts are visible.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sort direction for the archive listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Latest timestamp first
    #[default]
    Newest,
    /// Earliest timestamp first
    Oldest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(AppError::validation(format!(
                "unknown sort order '{other}' (expected 'newest' or 'oldest')"
            ))),
        }
    }
}

/// The (query, active tags, sort order) tuple.
///
/// Transitions consume the current state and return the next one; the caller
/// owns the event loop and recomputes the visible list after each transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Raw search input, trimmed only when matching
    pub query: String,

    /// Tags that must all be present on a post
    pub active_tags: BTreeSet<String>,

    pub sort: SortOrder,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query with raw input.
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self
        }
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.active_tags.remove(&tag) {
            self.active_tags.insert(tag);
        }
        self
    }

    /// Deselect every tag.
    pub fn clear_tags(self) -> Self {
        Self {
            active_tags: BTreeSet::new(),
            ..self
        }
    }

    pub fn with_sort(self, sort: SortOrder) -> Self {
        Self { sort, ..self }
    }

    pub fn is_tag_active(&self, tag: &str) -> bool {
        self.active_tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!("oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("Newest".parse::<SortOrder>().is_err());
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_toggle_tag_is_xor() {
        let state = ViewState::new().toggle_tag("fx");
        assert!(state.is_tag_active("fx"));

        let state = state.toggle_tag("routing").toggle_tag("fx");
        assert!(!state.is_tag_active("fx"));
        assert!(state.is_tag_active("routing"));
    }

    #[test]
    fn test_clear_tags_keeps_query_and_sort() {
        let state = ViewState::new()
            .with_query(" reverb ")
            .with_sort(SortOrder::Oldest)
            .toggle_tag("fx")
            .toggle_tag("patch")
            .clear_tags();

        assert!(state.active_tags.is_empty());
        assert_eq!(state.query, " reverb ");
        assert_eq!(state.sort, SortOrder::Oldest);
    }

    #[test]
    fn test_default_state() {
        let state = ViewState::default();
        assert!(state.query.is_empty());
        assert!(state.active_tags.is_empty());
        assert_eq!(state.sort, SortOrder::Newest);
    }
}
