/// History snapshot persistence
///
/// The index is written as JSON so the next run can start from it. Loading
/// never fails the caller: a missing or damaged file means an empty history.

use crate::core::history::{HistoryIndex, MergePolicy};
use crate::error::{LaunchError, Result};
use crate::store::models::HistoryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    saved_at: DateTime<Utc>,
    entries: Vec<HistoryEntry>,
}

/// Older snapshots were a bare array of entries
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFormat {
    Versioned(SnapshotFile),
    Bare(Vec<HistoryEntry>),
}

/// Write the index to `path`, creating the parent directory if needed
///
/// Writes to a sibling temp file and renames it into place so a crash
/// mid-write can't leave a half-written snapshot behind.
pub async fn save<P: AsRef<Path>>(index: &HistoryIndex, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        entries: index.entries().to_vec(),
    };
    let json = serde_json::to_vec_pretty(&file)?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), entries = index.len(), "saved history snapshot");
    Ok(())
}

/// Read a snapshot, reporting what went wrong
///
/// # Returns
/// * `Ok(HistoryIndex)` - path-sorted, duplicates collapsed per `policy`
/// * `Err(LaunchError::Io)` - the file could not be read
/// * `Err(LaunchError::Snapshot)` - the file is not a snapshot we understand
pub async fn try_load<P: AsRef<Path>>(path: P, policy: MergePolicy) -> Result<HistoryIndex> {
    let bytes = tokio::fs::read(path.as_ref()).await?;

    let entries = match serde_json::from_slice::<SnapshotFormat>(&bytes) {
        Ok(SnapshotFormat::Versioned(file)) => {
            if file.version > SNAPSHOT_VERSION {
                return Err(LaunchError::Snapshot(format!(
                    "unsupported snapshot version {}",
                    file.version
                )));
            }
            file.entries
        }
        Ok(SnapshotFormat::Bare(entries)) => entries,
        Err(e) => return Err(LaunchError::Snapshot(e.to_string())),
    };

    // Re-merge so a hand-edited or stale file still yields a valid index
    let entries = entries
        .into_iter()
        .map(|e| HistoryEntry::new(&e.path, e.is_dir, e.last_access));
    Ok(HistoryIndex::from_entries(entries, policy))
}

/// Read a snapshot, falling back to an empty index on any problem
pub async fn load<P: AsRef<Path>>(path: P, policy: MergePolicy) -> HistoryIndex {
    let path = path.as_ref();
    match try_load(path, policy).await {
        Ok(index) => {
            debug!(path = %path.display(), entries = index.len(), "loaded history snapshot");
            index
        }
        Err(LaunchError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no history snapshot yet");
            HistoryIndex::new(policy)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable history snapshot");
            HistoryIndex::new(policy)
        }
    }
}
