//! Signal Notes CLI
//!
//! Fetches the feed into a local snapshot and lists the archive from it.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use signal_notes::{
    error::Result,
    models::{Config, SortOrder, ViewState},
    pipeline::{self, PostSource},
    services::{FeedClient, normalize_tags},
    storage::{LocalStorage, PostStorage},
};

/// Signal Notes - searchable newsletter archive
#[derive(Parser, Debug)]
#[command(
    name = "signal-notes",
    version,
    about = "Searchable, filterable archive of a newsletter feed"
)]

struct Cli {
    /// Path to storage directory containing config and snapshot
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the feed and store a snapshot
    Fetch,

    /// Refetch the feed every `feed.revalidate_secs` until interrupted
    Watch {
        /// Override the configured interval (seconds)
        #[arg(long)]
        every: Option<u64>,
    },

    /// List posts matching the query and tag filters
    List {
        /// Free-text search over title, summary and tags
        #[arg(short, long, default_value = "")]
        query: String,

        /// Required tag (repeatable, all must match)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Sort order: newest or oldest
        #[arg(long, default_value = "newest")]
        sort: SortOrder,

        /// Fetch the feed instead of reading the snapshot
        #[arg(long)]
        live: bool,
    },

    /// Show the tag filter vocabulary
    Tags {
        /// Tags to mark as active (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Validate configuration file
    Validate,

    /// Show site and snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the view state the same way the UI would: one event at a time.
fn build_view_state(query: String, tags: &[String], sort: SortOrder) -> ViewState {
    normalize_tags(tags)
        .into_iter()
        .fold(ViewState::new(), |state, tag| {
            if state.is_tag_active(&tag) {
                state
            } else {
                state.toggle_tag(tag)
            }
        })
        .with_query(query)
        .with_sort(sort)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging so its level applies
    let config_path = cli.storage_dir.join("config.toml");
    let config_exists = config_path.exists();
    let config = Config::load_or_default(&config_path)?;

    init_logging(cli.verbose, &config.logging.level);
    if config_exists {
        log::info!("Loaded configuration from {}", config_path.display());
    } else {
        log::info!(
            "No config at {}, using defaults",
            config_path.display()
        );
    }

    let storage = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Fetch => {
            let client = FeedClient::new(&config)?;
            pipeline::run_fetch(&client, &storage).await?;
        }

        Command::Watch { every } => {
            let client = FeedClient::new(&config)?;
            let every = Duration::from_secs(every.unwrap_or(config.feed.revalidate_secs).max(1));
            pipeline::run_watch(&client, &storage, every).await?;
        }

        Command::List {
            query,
            tags,
            sort,
            live,
        } => {
            let client;
            let source = if live {
                client = FeedClient::new(&config)?;
                PostSource::Live(&client)
            } else {
                PostSource::Snapshot(&storage)
            };
            let posts = pipeline::load_posts(source).await?;
            let state = build_view_state(query, &tags, sort);

            let mut stdout = io::stdout().lock();
            pipeline::run_list(&config, &posts, &state, &mut stdout)?;
        }

        Command::Tags { tags } => {
            let state = build_view_state(String::new(), &tags, SortOrder::default());
            let mut stdout = io::stdout().lock();
            pipeline::run_tags(&config, &state, &mut stdout)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (feed {})", config.feed.url);
        }

        Command::Info => {
            println!("{}", config.site.display_title());
            println!("{}", config.site.display_tagline());
            println!("Feed: {}", config.feed.url);
            println!("Revalidate: every {}s", config.feed.revalidate_secs);

            match storage.load_snapshot().await? {
                Some(snapshot) => {
                    println!("Snapshot: {}", storage.location());
                    println!("  Posts: {}", snapshot.count);
                    println!("  Updated: {}", snapshot.updated_at);
                    println!("  Digest: {}", snapshot.digest);
                }
                None => println!("No snapshot found yet."),
            }
        }
    }

    Ok(())
}
