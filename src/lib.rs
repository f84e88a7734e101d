/// berri-launch library
///
/// Reads Windows shortcut files and turns the recent-items folder (plus any
/// folders of your own) into a searchable history of paths.

pub mod config;
pub mod core;
pub mod error;
pub mod lnk;
pub mod logging;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use error::{LaunchError, Result};
