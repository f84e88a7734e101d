/// Storage module for berri-launch
///
/// Record types shared across the crate and the JSON snapshot that carries
/// the history index between runs.

pub mod models;
pub mod snapshot;

pub use models::*;
