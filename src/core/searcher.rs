/// History searcher with fuzzy matching
///
/// Provides fuzzy search over the aggregated history.

use crate::core::filter::EntryFilter;
use crate::core::history::HistoryIndex;
use crate::store::models::HistoryEntry;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// A matched history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub entry: HistoryEntry,
    pub score: i64,
}

/// Handles history searching with fuzzy matching
pub struct Searcher {
    matcher: SkimMatcherV2,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    /// Create a new searcher instance
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Search entries with fuzzy matching
    ///
    /// # Arguments
    /// * `index` - History to search
    /// * `query` - Search query, matched against the full path
    /// * `filter` - Category restriction
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Vec<SearchResult>` - Best match first; most recent first for an empty query
    pub fn search(
        &self,
        index: &HistoryIndex,
        query: &str,
        filter: &EntryFilter,
        limit: usize,
    ) -> Vec<SearchResult> {
        let query = query.trim();

        let mut results: Vec<SearchResult> = index
            .iter()
            .filter(|entry| filter.matches(entry))
            .filter_map(|entry| {
                let score = if query.is_empty() {
                    Some(0)
                } else {
                    self.matcher.fuzzy_match(&entry.path, query)
                };
                score.map(|score| SearchResult {
                    entry: entry.clone(),
                    score,
                })
            })
            .collect();

        // Highest score first, then newest, then path
        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.entry.last_access.cmp(&a.entry.last_access))
                .then_with(|| a.entry.path.cmp(&b.entry.path))
        });

        results.truncate(limit);
        results
    }
}
