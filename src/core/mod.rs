/// Core functionality modules
///
/// Contains the main business logic for shortcut resolution,
/// history aggregation, filtering and searching.

pub mod aggregator;
pub mod filter;
pub mod history;
pub mod resolver;
pub mod searcher;

pub use aggregator::HistoryAggregator;
pub use filter::EntryFilter;
pub use history::{HistoryIndex, MergeOutcome, MergePolicy, SortOrder};
pub use resolver::{LocalFs, ShortcutResolver, TargetKind, TargetProbe};
pub use searcher::{SearchResult, Searcher};
