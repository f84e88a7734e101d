/// Entry filters
///
/// The quick categories from the launcher menu: everything, folders only,
/// or files with a given set of extensions.

use crate::core::history::HistoryIndex;
use crate::store::models::HistoryEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFilter {
    All,
    Folders,
    /// Files ending in one of these (lower-case, with the dot)
    Extensions(Vec<String>),
}

impl EntryFilter {
    pub fn extensions(exts: &[&str]) -> Self {
        EntryFilter::Extensions(
            exts.iter()
                .map(|e| {
                    let e = e.trim().to_lowercase();
                    if e.starts_with('.') {
                        e
                    } else {
                        format!(".{}", e)
                    }
                })
                .collect(),
        )
    }

    /// Resolve a menu name ("excel", "folder", ...) or a comma list of extensions
    pub fn parse(name: &str) -> Option<Self> {
        let filter = match name.trim().to_lowercase().as_str() {
            "" => return None,
            "all" => EntryFilter::All,
            "folder" | "folders" => EntryFilter::Folders,
            "excel" | "xlsx" => Self::extensions(&[".xlsx", ".xlsm"]),
            "word" | "docx" => Self::extensions(&[".docx"]),
            "ppt" | "powerpoint" => Self::extensions(&[".pptx"]),
            "pdf" => Self::extensions(&[".pdf"]),
            "visio" => Self::extensions(&[".vsdx"]),
            "txt" | "text" => Self::extensions(&[".txt"]),
            custom => {
                let exts: Vec<&str> = custom.split(',').filter(|e| !e.trim().is_empty()).collect();
                if exts.is_empty() {
                    return None;
                }
                Self::extensions(&exts)
            }
        };
        Some(filter)
    }

    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        match self {
            EntryFilter::All => true,
            EntryFilter::Folders => entry.is_dir,
            EntryFilter::Extensions(exts) => {
                if entry.is_dir {
                    return false;
                }
                let path = entry.path.to_lowercase();
                exts.iter().any(|ext| path.ends_with(ext.as_str()))
            }
        }
    }

    /// Matching entries, in the index's current order
    pub fn apply<'a>(&self, index: &'a HistoryIndex) -> Vec<&'a HistoryEntry> {
        index.iter().filter(|e| self.matches(e)).collect()
    }
}
