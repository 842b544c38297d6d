//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site title and tagline
    #[serde(default)]
    pub site: SiteConfig,

    /// Feed source and revalidation interval
    #[serde(default)]
    pub feed: FeedConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Tag vocabulary offered as filters
    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Terminal output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, using defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.feed.url)?;
        if self.feed.revalidate_secs == 0 {
            return Err(AppError::validation("feed.revalidate_secs must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        for tag in &self.tags.known {
            if tag.is_empty() || tag.trim() != tag || tag.to_lowercase() != *tag {
                return Err(AppError::validation(format!(
                    "tags.known entry '{tag}' must be lowercase and trimmed"
                )));
            }
        }
        Ok(())
    }
}

/// Site branding strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "defaults::site_title")]
    pub title: String,

    #[serde(default = "defaults::site_tagline")]
    pub tagline: String,
}

impl SiteConfig {
    /// Title to display, falling back when the configured value is blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            defaults::FALLBACK_TITLE
        } else {
            &self.title
        }
    }

    /// Tagline to display, falling back when the configured value is blank.
    pub fn display_tagline(&self) -> &str {
        if self.tagline.trim().is_empty() {
            defaults::FALLBACK_TAGLINE
        } else {
            &self.tagline
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: defaults::site_title(),
            tagline: defaults::site_tagline(),
        }
    }
}

/// Feed source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// RSS or Atom feed URL
    #[serde(default = "defaults::feed_url")]
    pub url: String,

    /// Seconds between scheduled refetches
    #[serde(default = "defaults::revalidate")]
    pub revalidate_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: defaults::feed_url(),
            revalidate_secs: defaults::revalidate(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Tag filter vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    #[serde(default = "defaults::known_tags")]
    pub known: Vec<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            known: defaults::known_tags(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Per-post template, see [`crate::models::Post::format`]
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            template: defaults::template(),
        }
    }
}

mod defaults {
    pub const FALLBACK_TITLE: &str = "Signal Notes — Archive";
    pub const FALLBACK_TAGLINE: &str =
        "Musings on synthesis, sound design, and electronic tools.";

    // Site defaults
    pub fn site_title() -> String {
        "EFM | Signal Notes".into()
    }
    pub fn site_tagline() -> String {
        FALLBACK_TAGLINE.into()
    }

    // Feed defaults
    pub fn feed_url() -> String {
        "https://buttondown.email/efm/rss".into()
    }
    pub fn revalidate() -> u64 {
        21600
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; signal-notes/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn known_tags() -> Vec<String> {
        [
            "technique",
            "routing",
            "fx",
            "templates",
            "synthesis",
            "elektron",
            "download",
            "samples",
            "yamaha",
            "patch",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn template() -> String {
        "{date}  {title}  [{tags}]\n    {url}".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_feed_url() {
        let mut config = Config::default();
        config.feed.url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn validate_rejects_zero_intervals() {
        let mut config = Config::default();
        config.feed.revalidate_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unnormalized_known_tag() {
        let mut config = Config::default();
        config.tags.known.push(" Reverb".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [feed]
            url = "https://example.com/feed.xml"

            [tags]
            known = ["fx"]
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.url, "https://example.com/feed.xml");
        assert_eq!(config.feed.revalidate_secs, 21600);
        assert_eq!(config.tags.known, vec!["fx"]);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.site.title, "EFM | Signal Notes");
    }

    #[test]
    fn load_or_default_handles_missing_and_invalid_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.feed.url, "https://buttondown.email/efm/rss");

        std::fs::write(&path, "[feed]\nrevalidate_secs = \"soon\"\n").unwrap();
        assert!(Config::load_or_default(&path).is_err());

        std::fs::write(&path, "[feed]\nrevalidate_secs = 60\n").unwrap();
        assert_eq!(Config::load_or_default(&path).unwrap().feed.revalidate_secs, 60);
    }

    #[test]
    fn blank_site_strings_fall_back() {
        let mut config = Config::default();
        config.site.title = " ".to_string();
        config.site.tagline = String::new();
        assert_eq!(config.site.display_title(), "Signal Notes — Archive");
        assert_eq!(
            config.site.display_tagline(),
            "Musings on synthesis, sound design, and electronic tools."
        );
    }
}
