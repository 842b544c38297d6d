// src/lib.rs

//! Signal Notes archive library
//!
//! Fetches a newsletter feed, normalizes it into posts, and derives the
//! searchable, filterable, sortable archive view.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
