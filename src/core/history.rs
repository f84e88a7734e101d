/// Path-unique history index
///
/// Entries live in a single Vec that is either sorted by path (while merging)
/// or by recency (for display). Switching between the two is a re-sort.

use crate::store::models::{canonicalize_path, HistoryEntry};
use serde::{Deserialize, Serialize};

/// Which order the index is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending by canonical path
    #[default]
    Path,
    /// Most recently accessed first
    Recency,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Path => write!(f, "by path name"),
            SortOrder::Recency => write!(f, "by access time"),
        }
    }
}

/// What to do when a merged path is already in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep whatever was merged first
    #[default]
    FirstSeen,
    /// Replace the existing entry if the incoming one was accessed later
    Newest,
}

/// Outcome of a single merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Kept,
    Replaced,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryIndex {
    entries: Vec<HistoryEntry>,
    order: SortOrder,
    policy: MergePolicy,
}

impl HistoryIndex {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            entries: Vec::new(),
            order: SortOrder::Path,
            policy,
        }
    }

    /// Build an index from arbitrary entries; duplicates collapse per the policy
    pub fn from_entries<I>(entries: I, policy: MergePolicy) -> Self
    where
        I: IntoIterator<Item = HistoryEntry>,
    {
        let mut index = Self::new(policy);
        index.merge_all(entries);
        index
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MergePolicy) {
        self.policy = policy;
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }

    /// Look up an entry by canonical path
    pub fn get(&self, path: &str) -> Option<&HistoryEntry> {
        match self.order {
            SortOrder::Path => self
                .entries
                .binary_search_by(|e| e.path.as_str().cmp(path))
                .ok()
                .map(|i| &self.entries[i]),
            SortOrder::Recency => self.entries.iter().find(|e| e.path == path),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Insert one entry, keeping the index sorted by path
    ///
    /// An index in recency order is put back in path order first.
    pub fn merge(&mut self, mut entry: HistoryEntry) -> MergeOutcome {
        if entry.path.contains('\\') {
            entry.path = canonicalize_path(&entry.path);
        }
        if self.order != SortOrder::Path {
            self.sort_by_path();
        }

        match self
            .entries
            .binary_search_by(|e| e.path.as_str().cmp(entry.path.as_str()))
        {
            Err(pos) => {
                self.entries.insert(pos, entry);
                MergeOutcome::Inserted
            }
            Ok(pos) => match self.policy {
                MergePolicy::FirstSeen => MergeOutcome::Kept,
                MergePolicy::Newest => {
                    if entry.last_access > self.entries[pos].last_access {
                        self.entries[pos] = entry;
                        MergeOutcome::Replaced
                    } else {
                        MergeOutcome::Kept
                    }
                }
            },
        }
    }

    /// Merge many entries, returning how many were new
    pub fn merge_all<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = HistoryEntry>,
    {
        let mut inserted = 0;
        for entry in entries {
            if self.merge(entry) == MergeOutcome::Inserted {
                inserted += 1;
            }
        }
        inserted
    }

    pub fn sort_by_path(&mut self) {
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
        self.order = SortOrder::Path;
    }

    /// Most recent first; equal timestamps fall back to path order
    pub fn sort_by_recency(&mut self) {
        self.entries.sort_by(|a, b| {
            b.last_access
                .cmp(&a.last_access)
                .then_with(|| a.path.cmp(&b.path))
        });
        self.order = SortOrder::Recency;
    }

    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::Path => self.sort_by_path(),
            SortOrder::Recency => self.sort_by_recency(),
        }
    }

    /// Flip between path and recency order
    pub fn toggle_order(&mut self) -> SortOrder {
        let next = match self.order {
            SortOrder::Path => SortOrder::Recency,
            SortOrder::Recency => SortOrder::Path,
        };
        self.sort(next);
        next
    }
}

impl<'a> IntoIterator for &'a HistoryIndex {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
