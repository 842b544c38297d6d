//! Service layer for the archive.
//!
//! This module contains the business logic for:
//! - Feed fetching (`FeedClient`)
//! - Feed document parsing (`parse_feed`)
//! - Entry normalization (`Normalizer`)
//! - Filtering and sorting the visible list (`recompute`)

pub mod clock;
mod feed;
pub mod normalize;
mod parser;
mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use feed::FeedClient;
pub use normalize::{Normalizer, normalize_tags};
pub use parser::parse_feed;
pub use view::recompute;
