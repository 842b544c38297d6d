// src/services/parser.rs

//! RSS 2.0 / Atom parsing into raw [`FeedEntry`] values.
//!
//! Only entry-level fields are read; channel metadata is ignored. Elements
//! nested below an entry field (e.g. XHTML inside Atom `<content>`) contribute
//! their text to that field.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{AppError, Result};
use crate::models::FeedEntry;
use crate::utils::{decode_entities, parse_timestamp, snippet_text, to_iso_string};

/// Parse a feed document from raw XML bytes.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    // Open element names, outermost first.
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<EntryBuilder> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                saw_root = true;
                let name = element_name(&e);
                if is_entry_element(&name) && current.is_none() {
                    current = Some(EntryBuilder::new(stack.len()));
                } else if let Some(builder) = current.as_mut() {
                    if builder.is_field_depth(stack.len()) {
                        builder.open_field(&name, &e);
                    }
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                saw_root = true;
                let name = element_name(&e);
                if is_entry_element(&name) && current.is_none() {
                    // `<item/>` still occupies a position in the feed.
                    entries.push(EntryBuilder::new(stack.len()).build());
                } else if let Some(builder) = current.as_mut() {
                    if builder.is_field_depth(stack.len()) {
                        builder.open_field(&name, &e);
                        builder.close_field(&name);
                    }
                }
            }
            Ok(Event::End(_)) => {
                let name = stack.pop().unwrap_or_default();
                let depth = stack.len();
                let finished = match current.as_mut() {
                    Some(builder) if builder.depth == depth => true,
                    Some(builder) => {
                        if builder.is_field_depth(depth) {
                            builder.close_field(&name);
                        }
                        false
                    }
                    None => false,
                };
                if finished {
                    if let Some(builder) = current.take() {
                        entries.push(builder.build());
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(builder) = current.as_mut() {
                    let text = e.unescape().map_err(AppError::feed)?;
                    builder.push_text(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(builder) = current.as_mut() {
                    builder.push_text(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::feed(format!(
                    "XML error at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(AppError::feed("document has no root element"));
    }
    if current.is_some() || !stack.is_empty() {
        return Err(AppError::feed("document ended inside an open element"));
    }

    log::debug!("Parsed {} entries from feed", entries.len());
    Ok(entries)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn is_entry_element(name: &str) -> bool {
    name == "item" || name == "entry"
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Accumulates one `<item>` / `<entry>`.
#[derive(Default)]
struct EntryBuilder {
    /// Stack depth at which the entry element itself sits
    depth: usize,
    /// Direct child currently collecting text
    field: Option<String>,
    text: String,

    guid: Option<String>,
    link: Option<String>,
    alternate_link: bool,
    /// Current `<category>` already yielded its `term` attribute
    category_term: bool,
    title: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    categories: Option<Vec<String>>,
    description: Option<String>,
    encoded: Option<String>,
}

impl EntryBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Direct children of the entry sit one level below it.
    fn is_field_depth(&self, stack_len: usize) -> bool {
        stack_len == self.depth + 1
    }

    fn open_field(&mut self, name: &str, e: &BytesStart<'_>) {
        self.field = Some(name.to_string());
        self.text.clear();

        match name {
            // Atom carries these in attributes.
            "link" => {
                if let Some(href) = attribute(e, "href") {
                    let rel = attribute(e, "rel");
                    let alternate = matches!(rel.as_deref(), None | Some("alternate"));
                    if self.link.is_none() || (alternate && !self.alternate_link) {
                        self.link = Some(href);
                        self.alternate_link = alternate;
                    }
                }
            }
            "category" => {
                let categories = self.categories.get_or_insert_with(Vec::new);
                self.category_term = false;
                if let Some(term) = attribute(e, "term") {
                    categories.push(term);
                    self.category_term = true;
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.field.is_none() || text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    fn close_field(&mut self, name: &str) {
        if self.field.as_deref() != Some(name) {
            return;
        }
        self.field = None;
        let text = std::mem::take(&mut self.text);
        if text.is_empty() {
            return;
        }

        match name {
            "guid" | "id" => self.guid = Some(text),
            "title" => self.title = Some(text),
            // RSS puts the URL in the element body.
            "link" => {
                if self.link.is_none() {
                    self.link = Some(text);
                }
            }
            "pubDate" | "published" | "dc:date" => self.published = Some(text),
            "updated" => self.updated = Some(text),
            "category" if !self.category_term => {
                self.categories.get_or_insert_with(Vec::new).push(text);
            }
            "description" | "content" => self.description = Some(text),
            "content:encoded" | "summary" => self.encoded = Some(text),
            _ => {}
        }
    }

    fn build(self) -> FeedEntry {
        let pub_date = self.published.or(self.updated);
        let iso_date = pub_date
            .as_deref()
            .and_then(parse_timestamp)
            .map(to_iso_string);
        let content = self.description.or(self.encoded);
        let content_snippet = content
            .as_deref()
            .map(|c| decode_entities(&snippet_text(c)).trim().to_string())
            .filter(|s| !s.is_empty());

        FeedEntry {
            guid: self.guid,
            link: self.link,
            title: self.title,
            pub_date,
            iso_date,
            categories: self.categories,
            content,
            content_snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Signal Notes</title>
    <link>https://example.com</link>
    <item>
      <title>Parallel Compression &amp; You</title>
      <link>https://example.com/posts/parallel</link>
      <guid isPermaLink="false">post-1</guid>
      <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
      <category> FX </category>
      <category>Routing</category>
      <description>&lt;p&gt;Hello &lt;b&gt;World&lt;/b&gt;&lt;/p&gt;</description>
    </item>
    <item>
      <link>https://example.com/posts/untitled</link>
      <description><![CDATA[<p>Raw <i>CDATA</i> body</p>]]></description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Signal Notes</title>
  <link href="https://example.com/"/>
  <entry>
    <title>Elektron Templates</title>
    <id>urn:uuid:1234</id>
    <link rel="edit" href="https://example.com/edit/1"/>
    <link rel="alternate" href="https://example.com/posts/templates"/>
    <published>2024-06-01T08:00:00+02:00</published>
    <updated>2024-06-02T00:00:00Z</updated>
    <category term="Elektron"/>
    <category term="templates"/>
    <summary>Short teaser</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_item() {
        let entries = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title.as_deref(), Some("Parallel Compression & You"));
        assert_eq!(first.guid.as_deref(), Some("post-1"));
        assert_eq!(
            first.link.as_deref(),
            Some("https://example.com/posts/parallel")
        );
        assert_eq!(
            first.pub_date.as_deref(),
            Some("Mon, 01 Jan 2024 10:00:00 GMT")
        );
        assert_eq!(first.iso_date.as_deref(), Some("2024-01-01T10:00:00.000Z"));
        assert_eq!(
            first.categories,
            Some(vec!["FX".to_string(), "Routing".to_string()])
        );
        assert_eq!(
            first.content.as_deref(),
            Some("<p>Hello <b>World</b></p>")
        );
        assert_eq!(first.content_snippet.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_parse_rss_item_with_missing_fields() {
        let entries = parse_feed(RSS.as_bytes()).unwrap();
        let second = &entries[1];
        assert_eq!(second.title, None);
        assert_eq!(second.guid, None);
        assert_eq!(second.categories, None);
        assert_eq!(second.pub_date, None);
        assert_eq!(
            second.content.as_deref(),
            Some("<p>Raw <i>CDATA</i> body</p>")
        );
    }

    #[test]
    fn test_parse_atom_entry() {
        let entries = parse_feed(ATOM.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.guid.as_deref(), Some("urn:uuid:1234"));
        assert_eq!(
            entry.link.as_deref(),
            Some("https://example.com/posts/templates")
        );
        assert_eq!(entry.pub_date.as_deref(), Some("2024-06-01T08:00:00+02:00"));
        assert_eq!(entry.iso_date.as_deref(), Some("2024-06-01T06:00:00.000Z"));
        assert_eq!(
            entry.categories,
            Some(vec!["Elektron".to_string(), "templates".to_string()])
        );
        assert_eq!(entry.content.as_deref(), Some("Short teaser"));
    }

    #[test]
    fn test_unparseable_pub_date_has_no_iso_date() {
        let xml = r#"<rss><channel><item><pubDate>someday</pubDate></item></channel></rss>"#;
        let entries = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries[0].pub_date.as_deref(), Some("someday"));
        assert_eq!(entries[0].iso_date, None);
    }

    #[test]
    fn test_self_closing_item_keeps_its_position() {
        let xml = "<rss><channel><item/><item><title>second</title></item></channel></rss>";
        let entries = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], FeedEntry::default());
        assert_eq!(entries[1].title.as_deref(), Some("second"));
    }

    #[test]
    fn test_snippet_joins_inline_markup() {
        let xml = r#"<rss><channel><item><description>
            &lt;p&gt;multi&lt;b&gt;band&lt;/b&gt; compression&lt;/p&gt;
            &lt;p&gt;Second&lt;br/&gt;line&lt;/p&gt;
        </description></item></channel></rss>"#;
        let entries = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(
            entries[0].content_snippet.as_deref(),
            Some("multiband compression Second line")
        );
    }

    #[test]
    fn test_empty_channel() {
        let xml = "<rss><channel><title>x</title></channel></rss>";
        assert!(parse_feed(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let xml = "<rss><channel><item><title>x</title></channel></rss>";
        assert!(parse_feed(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_not_xml_is_error() {
        assert!(parse_feed(b"").is_err());
        assert!(parse_feed(b"just some text").is_err());
    }
}
