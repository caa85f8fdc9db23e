//! Game library management for GameShelf
//!
//! Handles game records and their JSON store, install size estimation and
//! caching, and the sort/filter/search views the UI browses with.

mod install_size;
mod paths;
mod query;
mod record;
mod size_cache;
mod store;

pub use install_size::{InstallSizeEstimator, format_bytes};
pub use paths::normalize_path;
pub use query::{ListedGame, SortMode, TitleIndex, TitleMatch, list_games};
pub use record::{GameId, GameRecord};
pub use size_cache::InstallSizeCache;
pub use store::{GameMap, GameStore};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Invalid game details: {0}")]
    Validation(String),

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("No game ids left to assign")]
    IdsExhausted,

    #[error("Invalid executable path: {0:?}")]
    InvalidPath(String),

    #[error("Executable not found: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
