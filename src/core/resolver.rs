// Resolves every shortcut in a directory to a target that still exists
//
// Each .lnk is decoded on the blocking pool; a semaphore keeps at most
// `workers` of them in flight. Broken or stale shortcuts are skipped, never fatal.

use crate::error::{LaunchError, Result};
use crate::lnk::LinkDecoder;
use crate::store::models::{parent_directory, Origin, ResolvedShortcut};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What a target turned out to be on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// Existence check for decoded targets
///
/// Returns None when the target is gone.
pub trait TargetProbe: Send + Sync {
    fn probe(&self, target: &str) -> Option<TargetKind>;
}

/// Probe backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl TargetProbe for LocalFs {
    fn probe(&self, target: &str) -> Option<TargetKind> {
        std::fs::metadata(target).ok().map(|meta| {
            if meta.is_dir() {
                TargetKind::Directory
            } else {
                TargetKind::File
            }
        })
    }
}

/// Number of workers when none is configured
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Turns directories of shortcuts into resolved records
#[derive(Clone)]
pub struct ShortcutResolver {
    decoder: LinkDecoder,
    probe: Arc<dyn TargetProbe>,
    workers: usize,
}

impl ShortcutResolver {
    /// Create a resolver that checks targets against the local filesystem
    pub fn new(decoder: LinkDecoder) -> Self {
        Self {
            decoder,
            probe: Arc::new(LocalFs),
            workers: default_workers(),
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn TargetProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn decoder(&self) -> &LinkDecoder {
        &self.decoder
    }

    /// Resolve every shortcut directly inside `dir`
    ///
    /// # Arguments
    /// * `dir` - Directory to scan (not recursive)
    /// * `origin` - Tag attached to every record
    ///
    /// # Returns
    /// * `Ok(Vec<ResolvedShortcut>)` - Records in no particular order
    /// * `Err(LaunchError::DirectoryUnreadable)` - If `dir` can't be listed
    pub async fn resolve_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        origin: Origin,
    ) -> Result<Vec<ResolvedShortcut>> {
        let dir = dir.as_ref();
        let candidates = list_candidates(dir).await?;
        let total = candidates.len();

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (path, modified) in candidates {
            let semaphore = Arc::clone(&semaphore);
            let decoder = self.decoder;
            let probe = Arc::clone(&self.probe);

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                let joined = tokio::task::spawn_blocking(move || {
                    resolve_logged(&decoder, probe.as_ref(), &path, modified, origin)
                })
                .await;

                match joined {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(error = %e, "shortcut worker failed");
                        None
                    }
                }
            });
        }

        let mut resolved = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(record)) => resolved.push(record),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "shortcut task failed"),
            }
        }

        info!(
            dir = %dir.display(),
            %origin,
            resolved = resolved.len(),
            skipped = total - resolved.len(),
            "scanned shortcut directory"
        );

        Ok(resolved)
    }

    /// Resolve one shortcut file on the current thread
    pub fn resolve_file(
        &self,
        path: &Path,
        modified: DateTime<Utc>,
        origin: Origin,
    ) -> Result<Option<ResolvedShortcut>> {
        resolve_file(&self.decoder, self.probe.as_ref(), path, modified, origin)
    }
}

/// Decode `path` and check its target
///
/// # Returns
/// * `Ok(Some(_))` - Target exists
/// * `Ok(None)` - Shortcut decoded but its target is gone
/// * `Err(_)` - Shortcut could not be opened or decoded
pub fn resolve_file(
    decoder: &LinkDecoder,
    probe: &dyn TargetProbe,
    path: &Path,
    modified: DateTime<Utc>,
    origin: Origin,
) -> Result<Option<ResolvedShortcut>> {
    let link = decoder.decode_file(path)?;

    let Some(kind) = probe.probe(link.target()) else {
        return Ok(None);
    };

    // The filesystem knows better than the attribute bits saved in the link
    let is_directory = kind == TargetKind::Directory;
    let parent = if is_directory {
        None
    } else {
        parent_directory(link.target())
    };

    Ok(Some(ResolvedShortcut {
        local_path: link.local_path,
        network_path: link.network_path,
        is_directory,
        arguments: link.arguments,
        source_path: path.to_path_buf(),
        parent_directory: parent,
        origin,
        last_modified: modified,
    }))
}

fn resolve_logged(
    decoder: &LinkDecoder,
    probe: &dyn TargetProbe,
    path: &Path,
    modified: DateTime<Utc>,
    origin: Origin,
) -> Option<ResolvedShortcut> {
    match resolve_file(decoder, probe, path, modified, origin) {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            debug!(path = %path.display(), "skipping shortcut: target no longer exists");
            None
        }
        Err(e) if e.is_entry_skippable() => {
            debug!(path = %path.display(), error = %e, "skipping shortcut");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping shortcut");
            None
        }
    }
}

/// Regular files directly inside `dir`, with their modification times
async fn list_candidates(dir: &Path) -> Result<Vec<(PathBuf, DateTime<Utc>)>> {
    let unreadable = |source: std::io::Error| LaunchError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(unreadable)?;
    let mut candidates = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let path = entry.path();
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if meta.is_dir() {
            continue;
        }

        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        candidates.push((path, modified));
    }

    Ok(candidates)
}
