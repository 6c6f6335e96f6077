//! Filesystem checkpoint store
//!
//! This module provides a directory-backed implementation of the
//! CheckpointStore trait. Each checkpoint is one pretty-printed JSON file.

use crate::state::{CrawlState, Region};
use crate::storage::naming::{checkpoint_name, select_latest};
use crate::storage::record::CheckpointRecord;
use crate::storage::traits::{CheckpointHandle, CheckpointStore, StorageError, StorageResult};
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Directory-backed checkpoint store
#[derive(Debug, Clone)]
pub struct FsCheckpointStore {
    directory: PathBuf,
}

impl FsCheckpointStore {
    /// Opens a store rooted at `directory`, creating it if needed
    ///
    /// # Arguments
    ///
    /// * `directory` - Directory holding the checkpoint files
    ///
    /// # Returns
    ///
    /// * `Ok(FsCheckpointStore)` - Directory exists and is usable
    /// * `Err(StorageError)` - Directory could not be created
    pub fn open(directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// Opens a directory that must already exist
    ///
    /// Used by read-only modes, which must not leave an empty directory behind
    /// a mistyped path.
    pub fn open_existing(directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(StorageError::MissingDirectory(directory));
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path of a checkpoint
    pub fn path_of(&self, handle: &CheckpointHandle) -> PathBuf {
        self.directory.join(&handle.name)
    }

    fn list_file_names(&self) -> StorageResult<Vec<String>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Non-UTF-8 names cannot be checkpoints
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn write_temp(&self, temp_path: &Path, record: &CheckpointRecord) -> StorageResult<()> {
        let file = File::create(temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl CheckpointStore for FsCheckpointStore {
    fn find_latest(&self, region: &Region) -> StorageResult<Option<CheckpointHandle>> {
        let names = self.list_file_names()?;
        Ok(select_latest(region, names))
    }

    fn load(&self, handle: &CheckpointHandle) -> StorageResult<CrawlState> {
        let path = self.path_of(handle);
        let content = fs::read_to_string(&path)?;

        let corrupt = |reason: String| StorageError::CorruptCheckpoint {
            name: handle.name.clone(),
            reason,
        };

        let record: CheckpointRecord =
            serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
        let state = record.into_state().map_err(corrupt)?;

        if state.region() != &handle.region {
            return Err(corrupt(format!(
                "checkpoint region '{}' does not match '{}'",
                state.region(),
                handle.region
            )));
        }

        tracing::debug!("Loaded checkpoint {} from {}", handle.name, path.display());
        Ok(state)
    }

    fn save(
        &self,
        state: &CrawlState,
        timestamp: NaiveDateTime,
    ) -> StorageResult<CheckpointHandle> {
        let name = checkpoint_name(state.region(), timestamp);
        let final_path = self.directory.join(&name);
        if final_path.exists() {
            return Err(StorageError::WriteConflict(name));
        }

        // Write beside the target under a dot-prefixed name, then link it into
        // place. The link fails instead of replacing an existing checkpoint.
        let temp_path = self.directory.join(format!(".{}.tmp", name));
        let record = CheckpointRecord::from_state(state);
        let written = self.write_temp(&temp_path, &record);

        let linked = match written {
            Ok(()) => fs::hard_link(&temp_path, &final_path),
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(
                "Failed to remove temporary checkpoint {}: {}",
                temp_path.display(),
                e
            );
        }

        match linked {
            Ok(()) => Ok(CheckpointHandle {
                region: state.region().clone(),
                name,
                timestamp,
            }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StorageError::WriteConflict(name)),
            Err(e) => Err(e.into()),
        }
    }
}
