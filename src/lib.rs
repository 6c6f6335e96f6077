//! Rank-Ripple: a ranked ladder crawler
//!
//! This crate discovers ranked solo queue players by breadth-first expansion
//! over match co-participants, recording each player's tier and division.
//! Progress is checkpointed after every expanded account so an interrupted
//! crawl resumes where it stopped.

pub mod config;
pub mod crawler;
pub mod gateway;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Rank-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] gateway::GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Bad invocation: unknown region, missing seed account and the like
    #[error("{0}")]
    Usage(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Rank-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{AccountId, CrawlPhase, CrawlState, ParticipantId, RankEntry, Region};
