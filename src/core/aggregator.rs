/// History aggregation
///
/// Combines the cached snapshot, the OS recent-items folder and the user's
/// own folders into one path-unique index.

use crate::config::Config;
use crate::core::history::{HistoryIndex, MergePolicy};
use crate::core::resolver::ShortcutResolver;
use crate::error::Result;
use crate::store::models::{Origin, ResolvedShortcut};
use crate::store::snapshot;
use tracing::info;

/// Merges resolved shortcuts from every source into a history index
pub struct HistoryAggregator {
    resolver: ShortcutResolver,
    policy: MergePolicy,
    include_parent_folders: bool,
}

impl HistoryAggregator {
    /// Create a new aggregator
    pub fn new(resolver: ShortcutResolver, policy: MergePolicy) -> Self {
        Self {
            resolver,
            policy,
            include_parent_folders: false,
        }
    }

    /// Build an aggregator from the user's configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.resolver()?, config.merge_policy)
            .with_parent_folders(config.include_parent_folders))
    }

    /// Also list the folder of every file target
    pub fn with_parent_folders(mut self, enabled: bool) -> Self {
        self.include_parent_folders = enabled;
        self
    }

    pub fn resolver(&self) -> &ShortcutResolver {
        &self.resolver
    }

    /// Merge record lists into `prior`
    ///
    /// Each list is treated as an unordered set: records are merged by path,
    /// newest shortcut first, so worker completion order never shows through.
    /// Across lists, `FirstSeen` still lets earlier lists win.
    pub fn aggregate<I>(&self, prior: HistoryIndex, lists: I) -> HistoryIndex
    where
        I: IntoIterator<Item = Vec<ResolvedShortcut>>,
    {
        let mut index = prior;
        index.set_policy(self.policy);
        index.sort_by_path();

        for mut list in lists {
            list.sort_by(|a, b| {
                a.canonical_path()
                    .cmp(&b.canonical_path())
                    .then_with(|| b.last_modified.cmp(&a.last_modified))
                    .then_with(|| a.source_path.cmp(&b.source_path))
            });

            for record in list {
                if let Some(entry) = record.to_entry() {
                    index.merge(entry);
                }
                if self.include_parent_folders {
                    if let Some(parent) = record.parent_entry() {
                        index.merge(parent);
                    }
                }
            }
        }

        index
    }

    /// Load the snapshot and scan every enabled source
    ///
    /// # Returns
    /// * `Ok(HistoryIndex)` - Path-sorted, unique history
    /// * `Err(LaunchError::DirectoryUnreadable)` - If a source directory can't be listed
    pub async fn gather(&self, config: &Config) -> Result<HistoryIndex> {
        let prior = if config.enable_history {
            snapshot::load(config.history_path()?, self.policy).await
        } else {
            HistoryIndex::new(self.policy)
        };
        let cached = prior.len();

        let mut lists = Vec::new();

        if config.enable_recent {
            let recent = config.recent_dir()?;
            lists.push(self.resolver.resolve_dir(&recent, Origin::Recent).await?);
        }

        if config.enable_user {
            for folder in &config.folders {
                lists.push(self.resolver.resolve_dir(folder, Origin::User).await?);
            }
        }

        let index = self.aggregate(prior, lists);
        info!(cached, total = index.len(), "history aggregated");

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnk::fixture::LinkBuilder;
    use crate::lnk::LinkDecoder;
    use crate::store::models::parent_directory;
    use chrono::{DateTime, TimeZone, Utc};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn record(target: &str, origin: Origin, secs: i64) -> ResolvedShortcut {
        ResolvedShortcut {
            local_path: Some(target.to_string()),
            network_path: None,
            is_directory: false,
            arguments: String::new(),
            source_path: PathBuf::from(format!("{}.lnk", target)),
            parent_directory: parent_directory(target),
            origin,
            last_modified: at(secs),
        }
    }

    fn aggregator(policy: MergePolicy) -> HistoryAggregator {
        HistoryAggregator::new(ShortcutResolver::new(LinkDecoder::default()), policy)
    }

    fn paths(index: &HistoryIndex) -> Vec<&str> {
        index.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_three_origins_union() {
        let a = "C:\\a.txt";
        let b = "C:\\b.txt";
        let c = "C:\\c.txt";

        let index = aggregator(MergePolicy::FirstSeen).aggregate(
            HistoryIndex::default(),
            vec![
                vec![record(a, Origin::Cache, 0), record(b, Origin::Cache, 0)],
                vec![record(b, Origin::Recent, 1), record(c, Origin::Recent, 1)],
                vec![],
            ],
        );

        assert_eq!(index.len(), 3);
        assert_eq!(paths(&index), vec!["C:/a.txt", "C:/b.txt", "C:/c.txt"]);
    }

    #[test]
    fn test_prior_entries_win_under_first_seen() {
        let prior = aggregator(MergePolicy::FirstSeen)
            .aggregate(HistoryIndex::default(), vec![vec![record("C:\\x.txt", Origin::Cache, 0)]]);

        let index = aggregator(MergePolicy::FirstSeen)
            .aggregate(prior, vec![vec![record("C:\\x.txt", Origin::Recent, 500)]]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("C:/x.txt").unwrap().last_access, at(0));
    }

    #[test]
    fn test_newest_policy_takes_later_access() {
        let prior = HistoryIndex::from_entries(
            record("C:\\x.txt", Origin::Cache, 0).to_entry(),
            MergePolicy::FirstSeen,
        );

        let index = aggregator(MergePolicy::Newest)
            .aggregate(prior, vec![vec![record("C:\\x.txt", Origin::Recent, 500)]]);

        assert_eq!(index.policy(), MergePolicy::Newest);
        assert_eq!(index.get("C:/x.txt").unwrap().last_access, at(500));
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let records = vec![
            record("C:\\z.txt", Origin::Recent, 3),
            record("C:\\m.txt", Origin::Recent, 1),
            record("C:\\a.txt", Origin::Recent, 2),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let agg = aggregator(MergePolicy::FirstSeen);
        let forward = agg.aggregate(HistoryIndex::default(), vec![records]);
        let backward = agg.aggregate(HistoryIndex::default(), vec![reversed]);
        assert_eq!(forward.entries(), backward.entries());
    }

    #[test]
    fn test_same_target_in_one_list_ignores_arrival_order() {
        let mut copy = record("C:\\x.txt", Origin::Recent, 0);
        copy.source_path = PathBuf::from("x (2).txt.lnk");
        let records = vec![copy, record("C:\\x.txt", Origin::Recent, 100)];
        let mut reversed = records.clone();
        reversed.reverse();

        let agg = aggregator(MergePolicy::FirstSeen);
        let forward = agg.aggregate(HistoryIndex::default(), vec![records]);
        let backward = agg.aggregate(HistoryIndex::default(), vec![reversed]);

        assert_eq!(forward.entries(), backward.entries());
        assert_eq!(forward.len(), 1);
        assert_eq!(forward.get("C:/x.txt").unwrap().last_access, at(100));
    }

    #[test]
    fn test_parent_folders_included() {
        let index = aggregator(MergePolicy::FirstSeen)
            .with_parent_folders(true)
            .aggregate(
                HistoryIndex::default(),
                vec![vec![
                    record("C:\\Users\\a\\one.txt", Origin::Recent, 0),
                    record("C:\\Users\\a\\two.txt", Origin::Recent, 0),
                ]],
            );

        assert_eq!(
            paths(&index),
            vec!["C:/Users/a", "C:/Users/a/one.txt", "C:/Users/a/two.txt"]
        );
        assert!(index.get("C:/Users/a").unwrap().is_dir);
    }

    #[test]
    fn test_aggregate_resorts_recency_prior() {
        let mut prior = HistoryIndex::from_entries(
            vec![
                record("C:\\b.txt", Origin::Cache, 10).to_entry().unwrap(),
                record("C:\\a.txt", Origin::Cache, 0).to_entry().unwrap(),
            ],
            MergePolicy::FirstSeen,
        );
        prior.sort_by_recency();

        let index = aggregator(MergePolicy::FirstSeen).aggregate(prior, Vec::new());
        assert_eq!(paths(&index), vec!["C:/a.txt", "C:/b.txt"]);
    }

    #[tokio::test]
    async fn test_gather_from_all_sources() {
        let temp = TempDir::new().unwrap();
        let recent = temp.path().join("Recent");
        let user = temp.path().join("pinned");
        let files = temp.path().join("files");
        let history = temp.path().join("state");
        fs::create_dir_all(&recent).unwrap();
        fs::create_dir_all(&user).unwrap();
        fs::create_dir_all(&files).unwrap();

        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(files.join(name), name).unwrap();
        }
        let target = |name: &str| files.join(name).to_str().unwrap().to_string();

        LinkBuilder::new().local(&target("a.txt")).write_to(&recent.join("a.lnk"));
        LinkBuilder::new().local(&target("b.txt")).write_to(&recent.join("b.lnk"));
        LinkBuilder::new()
            .local(&target("gone.txt"))
            .write_to(&recent.join("gone.lnk"));
        LinkBuilder::new().local(&target("b.txt")).write_to(&user.join("b.lnk"));
        LinkBuilder::new().local(&target("c.txt")).write_to(&user.join("c.lnk"));

        let cached = HistoryIndex::from_entries(
            vec![crate::store::models::HistoryEntry::new("X:\\cached.txt", false, at(0))],
            MergePolicy::FirstSeen,
        );
        let config = Config {
            enable_recent: true,
            enable_user: true,
            enable_history: true,
            folders: vec![user.clone()],
            recent_dir: Some(recent.clone()),
            history_dir: Some(history.clone()),
            ..Config::default()
        };
        snapshot::save(&cached, config.history_path().unwrap()).await.unwrap();

        let index = HistoryAggregator::from_config(&config)
            .unwrap()
            .gather(&config)
            .await
            .unwrap();

        assert_eq!(index.len(), 4);
        assert!(index.contains("X:/cached.txt"));
        for name in ["a.txt", "b.txt", "c.txt"] {
            assert!(index.contains(&target(name).replace('\\', "/")));
        }
        assert!(!index.contains(&target("gone.txt").replace('\\', "/")));
    }

    #[tokio::test]
    async fn test_gather_missing_user_folder_fails() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            enable_recent: false,
            enable_user: true,
            folders: vec![temp.path().join("nope")],
            ..Config::default()
        };

        let result = HistoryAggregator::from_config(&config)
            .unwrap()
            .gather(&config)
            .await;
        assert!(matches!(
            result,
            Err(crate::error::LaunchError::DirectoryUnreadable { .. })
        ));
    }

    #[tokio::test]
    async fn test_gather_nothing_enabled() {
        let config = Config {
            enable_recent: false,
            enable_user: false,
            enable_history: false,
            ..Config::default()
        };

        let index = HistoryAggregator::from_config(&config)
            .unwrap()
            .gather(&config)
            .await
            .unwrap();
        assert!(index.is_empty());
    }
}
