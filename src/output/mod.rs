//! Output module for reporting crawl results
//!
//! This module handles:
//! - Summarizing a checkpoint (mapping size, frontier, tier distribution)
//! - Exporting the rank mapping to SQLite

pub mod sqlite_export;
pub mod stats;

pub use sqlite_export::{export_rankings, open_export_db, write_rankings};
pub use stats::{load_statistics, print_statistics, RankStatistics};
