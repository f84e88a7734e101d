/// User configuration
///
/// Read from `<config dir>/berri-launch/config.json`. Every field has a
/// default, so a missing file (or a partial one) is fine.

use crate::core::history::MergePolicy;
use crate::core::resolver::{default_workers, ShortcutResolver};
use crate::error::{LaunchError, Result};
use crate::lnk::{LegacyEncoding, LinkDecoder};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "berri-launch";
const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan the OS recent-items folder
    pub enable_recent: bool,
    /// Scan `folders`
    pub enable_user: bool,
    /// Start from (and allow saving to) the history snapshot
    #[serde(alias = "enable_hist")]
    pub enable_history: bool,
    /// Extra folders of shortcuts
    pub folders: Vec<PathBuf>,
    /// Where the snapshot lives; defaults to the app data dir
    pub history_dir: Option<PathBuf>,
    /// Override for the recent-items folder
    pub recent_dir: Option<PathBuf>,
    /// Code page of the non-Unicode strings inside shortcuts
    pub legacy_encoding: String,
    pub merge_policy: MergePolicy,
    /// List the folder of each recent file as well
    pub include_parent_folders: bool,
    /// Parallel shortcut decoders; defaults to the number of CPUs
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_recent: true,
            enable_user: false,
            enable_history: false,
            folders: Vec::new(),
            history_dir: None,
            recent_dir: None,
            legacy_encoding: "shift_jis".to_string(),
            merge_policy: MergePolicy::FirstSeen,
            include_parent_folders: false,
            workers: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            LaunchError::Config("Could not determine config directory".to_string())
        })?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location
    pub async fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?).await
    }

    /// Load from `path`; a missing file gives the defaults
    pub async fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LaunchError::Config(format!("{}: {}", path.display(), e)))?;
        config.legacy_encoding()?;
        Ok(config)
    }

    /// The OS recent-items folder (`%APPDATA%\Microsoft\Windows\Recent`)
    pub fn recent_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.recent_dir {
            return Ok(dir.clone());
        }
        let roaming = dirs::data_dir().ok_or_else(|| {
            LaunchError::Config("Could not determine application data directory".to_string())
        })?;
        Ok(roaming.join("Microsoft").join("Windows").join("Recent"))
    }

    /// Full path of the history snapshot
    pub fn history_path(&self) -> Result<PathBuf> {
        let dir = match &self.history_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| {
                    LaunchError::Config(
                        "Could not determine application data directory".to_string(),
                    )
                })?
                .join(APP_DIR),
        };
        Ok(dir.join(HISTORY_FILE))
    }

    pub fn legacy_encoding(&self) -> Result<LegacyEncoding> {
        LegacyEncoding::from_label(&self.legacy_encoding)
    }

    pub fn decoder(&self) -> Result<LinkDecoder> {
        Ok(LinkDecoder::new(self.legacy_encoding()?))
    }

    pub fn resolver(&self) -> Result<ShortcutResolver> {
        let workers = self.workers.unwrap_or_else(default_workers);
        Ok(ShortcutResolver::new(self.decoder()?).with_workers(workers))
    }
}
