//! Configuration module for rank-ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional; every field has a default.
//!
//! # Example
//!
//! ```no_run
//! use rank_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Crawl will stop at {} players", config.crawler.max_players);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CheckpointConfig, Config, CrawlerConfig, ProviderConfig, DEFAULT_BASE_URL,
    DEFAULT_MAX_PLAYERS, DEFAULT_TARGET_SEASON, RANKED_SOLO_QUEUE_ID, RANKED_SOLO_QUEUE_TYPE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
