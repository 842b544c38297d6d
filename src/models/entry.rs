//! Raw feed entry as produced by the feed parser.

/// One raw item from the syndication source. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// `<guid>` (RSS) or `<id>` (Atom)
    pub guid: Option<String>,

    /// Permalink of the entry
    pub link: Option<String>,

    pub title: Option<String>,

    /// Publish date exactly as it appeared in the feed
    pub pub_date: Option<String>,

    /// `pub_date` reformatted as RFC 3339 UTC, when it could be parsed
    pub iso_date: Option<String>,

    /// `None` when the entry carries no category elements at all
    pub categories: Option<Vec<String>>,

    /// Raw (possibly HTML) content
    pub content: Option<String>,

    /// Plain-text rendition of `content`
    pub content_snippet: Option<String>,
}
