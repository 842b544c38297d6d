// src/services/feed.rs

//! Feed fetching service.
//!
//! One GET against the configured feed URL, parsed and normalized into posts.
//! Failures propagate to the caller; there is no retry here.

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, Post};
use crate::services::normalize::Normalizer;
use crate::services::parser::parse_feed;
use crate::utils::http;

/// Service for fetching the current post list.
pub struct FeedClient {
    url: String,
    client: Client,
    normalizer: Normalizer,
}

impl FeedClient {
    /// Create a feed client from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = http::create_client(&config.http)?;
        Ok(Self::with_client(&config.feed.url, client))
    }

    /// Create a feed client around an existing HTTP client.
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
            normalizer: Normalizer::new(),
        }
    }

    /// Replace the normalizer, e.g. to inject a fixed clock.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed and return the current post list in feed order.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        log::debug!("Fetching feed from: {}", self.url);

        let bytes = self.fetch_bytes().await?;
        let entries = parse_feed(&bytes)?;
        let posts = self.normalizer.normalize_all(&entries);

        log::debug!("Normalized {} posts", posts.len());
        Ok(posts)
    }

    async fn fetch_bytes(&self) -> Result<Vec<u8>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AppError::status(status, &self.url));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
