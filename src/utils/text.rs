// src/utils/text.rs

//! Text cleanup helpers shared by the feed parser and the normalizer.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Tags that break a line of text; every other tag joins its neighbours.
static BLOCK_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:h[1-6]|hr|br|p|ul|ol|li|blockquote|section|table|tr|div)\b[^>]*>")
        .expect("valid regex")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("valid regex")
});

/// Replace every `<...>` run with a single space.
pub fn strip_markup(html: &str) -> String {
    MARKUP.replace_all(html, " ").into_owned()
}

/// Collapse whitespace runs to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markup stripped, whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    collapse_whitespace(&strip_markup(html))
}

/// Text of an HTML fragment for a snippet.
///
/// Block-level tags become whitespace, inline tags are removed outright so
/// `multi<b>band</b>` reads `multiband`.
pub fn snippet_text(html: &str) -> String {
    let blocks = BLOCK_MARKUP.replace_all(html, " ");
    collapse_whitespace(&MARKUP.replace_all(&blocks, ""))
}

/// First `max` characters of `s`. Not word-boundary aware.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Decode common HTML entities left over after XML unescaping.
///
/// Unknown named entities are kept verbatim.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "copy" => '©',
        _ => return None,
    };
    Some(c)
}
