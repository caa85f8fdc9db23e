//! Game process launching for GameShelf
//!
//! Games are spawned fire-and-forget. The only bookkeeping is the active
//! process registry, which refuses to start an executable that is still
//! running from a previous launch.

pub mod mock;
mod registry;
mod spawner;

pub use registry::ProcessRegistry;
pub use spawner::{ExitReport, ProcessSpawner, SpawnedProcess, SystemSpawner};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Invalid executable path: {0:?}")]
    InvalidPath(String),

    #[error("Game is already running: {0}")]
    AlreadyRunning(PathBuf),

    #[error("Launch failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_running_message() {
        let err = LaunchError::AlreadyRunning(PathBuf::from("/games/doom"));
        assert!(err.to_string().contains("already running"));
    }
}
