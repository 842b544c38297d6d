//! Post data structure.

use serde::{Deserialize, Serialize};

/// A normalized, display-ready post derived from one feed entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier (guid, else link, else feed position)
    pub id: String,

    /// Post title
    pub title: String,

    /// Link to the full post
    pub url: String,

    /// Publish timestamp; ISO-8601 when the feed supplied a parseable date
    #[serde(rename = "dateISO")]
    pub date_iso: String,

    /// Lowercased tags in source order
    pub tags: Vec<String>,

    /// Short plain-text summary
    pub summary: String,
}

impl Post {
    /// Tags joined for display, or `untagged` when there are none.
    pub fn tag_label(&self) -> String {
        if self.tags.is_empty() {
            "untagged".to_string()
        } else {
            self.tags.join(", ")
        }
    }

    /// Format post for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{title}`, `{url}`, `{date}`, `{tags}`, `{summary}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{id}", &self.id)
            .replace("{title}", &self.title)
            .replace("{url}", &self.url)
            .replace("{date}", &self.date_iso)
            .replace("{tags}", &self.tag_label())
            .replace("{summary}", &self.summary)
    }
}
