//! Checkpoint naming
//!
//! A checkpoint is named `<region>-<YYYYmmdd-HHMMSS>`. These functions are
//! pure over names so discovery can be tested without touching a directory.

use crate::state::Region;
use crate::storage::CheckpointHandle;
use chrono::NaiveDateTime;

/// Timestamp layout embedded in checkpoint names (local time, second resolution)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Builds the checkpoint name for a region and timestamp
pub fn checkpoint_name(region: &Region, timestamp: NaiveDateTime) -> String {
    format!("{}-{}", region, timestamp.format(TIMESTAMP_FORMAT))
}

/// Parses the timestamp out of a checkpoint name for the given region
///
/// Returns None for names belonging to another region or with a malformed
/// timestamp suffix.
pub fn parse_checkpoint_name(region: &Region, name: &str) -> Option<NaiveDateTime> {
    let suffix = name.strip_prefix(region.as_str())?.strip_prefix('-')?;
    NaiveDateTime::parse_from_str(suffix, TIMESTAMP_FORMAT).ok()
}

/// Picks the newest checkpoint for a region out of a set of names
///
/// # Arguments
///
/// * `region` - Region whose checkpoints are wanted
/// * `names` - Candidate names, typically a directory listing
///
/// # Returns
///
/// The handle with the greatest embedded timestamp, or None if no name
/// belongs to the region
pub fn select_latest<I, S>(region: &Region, names: I) -> Option<CheckpointHandle>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            parse_checkpoint_name(region, name).map(|timestamp| CheckpointHandle {
                region: region.clone(),
                name: name.to_string(),
                timestamp,
            })
        })
        .max_by_key(|handle| handle.timestamp)
}
