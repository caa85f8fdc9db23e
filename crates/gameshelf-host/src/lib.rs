//! GameShelf host
//!
//! The privileged side of the launcher. The UI process never touches the
//! filesystem or spawns processes itself; it sends requests here over a
//! newline-delimited JSON channel and renders the replies.

mod host;
pub mod ipc;
mod navigation;
mod picker;

pub use host::Host;
pub use navigation::{HistorySnapshot, NavigationHistory, NavigationOutcome};
pub use picker::{FilePicker, PickKind};

use gameshelf_config::ConfigError;
use gameshelf_launch::LaunchError;
use gameshelf_library::LibraryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No file picker available (install zenity or kdialog)")]
    PickerUnavailable,

    #[error("File picker failed: {0}")]
    Picker(String),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
