/// Data models shared by the resolver, the history index and the snapshot
///
/// Resolved shortcuts are short-lived scan results; history entries are
/// what survives the merge and gets persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Cache,
    Recent,
    User,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Origin::Cache => "cache",
            Origin::Recent => "recent",
            Origin::User => "user",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cache" => Ok(Origin::Cache),
            "recent" => Ok(Origin::Recent),
            "user" => Ok(Origin::User),
            other => Err(format!("unknown origin '{}'", other)),
        }
    }
}

/// A shortcut whose target was decoded and found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShortcut {
    pub local_path: Option<String>,
    pub network_path: Option<String>,
    pub is_directory: bool,
    pub arguments: String,
    /// The .lnk file itself
    pub source_path: PathBuf,
    /// Containing folder of a file target; None for directories
    pub parent_directory: Option<String>,
    pub origin: Origin,
    /// Modification time of the .lnk file, i.e. when the target was last opened
    pub last_modified: DateTime<Utc>,
}

impl ResolvedShortcut {
    /// Target as written in the shortcut: local path first, UNC path otherwise
    pub fn target(&self) -> Option<&str> {
        self.local_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.network_path.as_deref().filter(|p| !p.is_empty()))
    }

    /// Target with separators normalized, used as the dedup key
    pub fn canonical_path(&self) -> Option<String> {
        self.target().map(canonicalize_path)
    }

    /// History entry for the target itself
    pub fn to_entry(&self) -> Option<HistoryEntry> {
        self.canonical_path().map(|path| HistoryEntry {
            path,
            is_dir: self.is_directory,
            last_access: self.last_modified,
        })
    }

    /// Folder entry for a file target's parent
    pub fn parent_entry(&self) -> Option<HistoryEntry> {
        self.parent_directory
            .as_deref()
            .filter(|_| !self.is_directory)
            .map(|parent| HistoryEntry {
                path: canonicalize_path(parent),
                is_dir: true,
                last_access: self.last_modified,
            })
    }
}

/// One unique path in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub path: String,
    pub is_dir: bool,
    pub last_access: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(path: &str, is_dir: bool, last_access: DateTime<Utc>) -> Self {
        Self {
            path: canonicalize_path(path),
            is_dir,
            last_access,
        }
    }

    /// File name or last folder component
    pub fn name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.path)
    }
}

/// Normalize separators to `/` so the same target from different origins collides
pub fn canonicalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Directory portion of a Windows or POSIX style path
///
/// Splits on either separator, since shortcut targets are Windows paths
/// regardless of the platform we run on.
pub fn parent_directory(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches(['\\', '/']);
    let cut = trimmed.rfind(['\\', '/'])?;
    let parent = &trimmed[..cut];

    if parent.is_empty() {
        // "/file" -> "/"
        return Some(trimmed[..=cut].to_string());
    }
    if parent.ends_with(':') {
        // "C:\file.txt" -> "C:\"
        return Some(trimmed[..=cut].to_string());
    }
    if parent.trim_start_matches(['\\', '/']).is_empty() {
        // "\\server" has no parent
        return None;
    }
    Some(parent.to_string())
}
