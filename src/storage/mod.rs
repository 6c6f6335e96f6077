//! Storage module for persisting crawl checkpoints
//!
//! This module handles all checkpoint operations for the crawler, including:
//! - Naming checkpoints by region and timestamp
//! - Locating the newest checkpoint for a region
//! - Loading and writing crawl state snapshots

mod fs_store;
pub mod naming;
mod record;
mod traits;

pub use fs_store::FsCheckpointStore;
pub use record::CheckpointRecord;
pub use traits::{CheckpointHandle, CheckpointStore, StorageError, StorageResult};

use crate::state::{CrawlState, Region};
use std::path::Path;

/// Opens the checkpoint directory
///
/// # Arguments
///
/// * `path` - Directory holding the checkpoint files
///
/// # Returns
///
/// * `Ok(FsCheckpointStore)` - Successfully opened store
/// * `Err(StorageError)` - Failed to create the directory
pub fn open_store(path: &Path) -> StorageResult<FsCheckpointStore> {
    FsCheckpointStore::open(path)
}

/// Opens the checkpoint directory without creating it
pub fn open_existing_store(path: &Path) -> StorageResult<FsCheckpointStore> {
    FsCheckpointStore::open_existing(path)
}

/// Loads the newest checkpoint for a region, if there is one
pub fn load_latest(
    store: &dyn CheckpointStore,
    region: &Region,
) -> StorageResult<Option<(CheckpointHandle, CrawlState)>> {
    match store.find_latest(region)? {
        Some(handle) => {
            let state = store.load(&handle)?;
            Ok(Some((handle, state)))
        }
        None => Ok(None),
    }
}
