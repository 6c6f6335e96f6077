//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::state::{CrawlState, Region};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Corrupt checkpoint {name}: {reason}")]
    CorruptCheckpoint { name: String, reason: String },

    #[error("Checkpoint already exists: {0}")]
    WriteConflict(String),

    #[error("Checkpoint directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reference to one persisted checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointHandle {
    /// Region the checkpoint belongs to
    pub region: Region,

    /// Checkpoint name, `<region>-<timestamp>`
    pub name: String,

    /// Timestamp embedded in the name
    pub timestamp: NaiveDateTime,
}

/// Trait for checkpoint backend implementations
///
/// Checkpoints are immutable snapshots: `save` always creates a new one and
/// never replaces an existing one.
pub trait CheckpointStore {
    /// Finds the newest checkpoint for a region
    ///
    /// Names belonging to other regions or with malformed timestamps are
    /// ignored.
    fn find_latest(&self, region: &Region) -> StorageResult<Option<CheckpointHandle>>;

    /// Loads the crawl state stored in a checkpoint
    ///
    /// # Errors
    ///
    /// `StorageError::CorruptCheckpoint` if required fields are missing or
    /// the content cannot be interpreted
    fn load(&self, handle: &CheckpointHandle) -> StorageResult<CrawlState>;

    /// Writes a new checkpoint for `state` named after `timestamp`
    ///
    /// # Errors
    ///
    /// `StorageError::WriteConflict` if a checkpoint with the same name
    /// already exists
    fn save(&self, state: &CrawlState, timestamp: NaiveDateTime)
        -> StorageResult<CheckpointHandle>;
}
