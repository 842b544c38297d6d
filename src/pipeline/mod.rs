//! Pipeline entry points for archive operations.
//!
//! - `run_fetch`: Fetch the feed and store a snapshot
//! - `run_watch`: Refetch on a fixed interval, serving stale on failure
//! - `run_list`: Filter, sort and print the stored posts

pub mod diff;
pub mod fetch;
pub mod list;
pub mod watch;

pub use diff::{PostDiff, calculate_diff};
pub use fetch::{FetchOutcome, run_fetch};
pub use list::{EMPTY_STATE, PostSource, load_posts, run_list, run_tags};
pub use watch::{RefreshStatus, refresh, run_watch};
