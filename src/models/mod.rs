// src/models/mod.rs

//! Domain models for the archive.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entry;
mod post;
mod view;

// Re-export all public types
pub use config::{
    Config, FeedConfig, HttpConfig, LoggingConfig, OutputConfig, SiteConfig, TagsConfig,
};
pub use entry::FeedEntry;
pub use post::Post;
pub use view::{SortOrder, ViewState};
