//! Utility functions and helpers.

pub mod date;
pub mod http;
pub mod text;

pub use date::{parse_timestamp, to_iso_string};
pub use text::{
    collapse_whitespace, decode_entities, plain_text, snippet_text, strip_markup,
    truncate_chars,
};
