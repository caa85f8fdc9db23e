//! Configuration sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the library and theme documents live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding the games document
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the games document inside `data_dir`
    #[serde(default = "default_games_file")]
    pub games_file: String,

    /// Theme presets document (defaults to `<data_dir>/themes.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes_file: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gameshelf")
        .join("data")
}

fn default_games_file() -> String {
    "games.json".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            games_file: default_games_file(),
            themes_file: None,
        }
    }
}

impl LibraryConfig {
    /// Full path of the games document
    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join(&self.games_file)
    }

    /// Full path of the theme presets document
    pub fn themes_path(&self) -> PathBuf {
        self.themes_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("themes.json"))
    }
}

/// Limits for the install-size walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSizeConfig {
    /// Deepest directory level (relative to the walk root) that is still read
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Directory names that are never descended into (case-insensitive)
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
}

fn default_max_depth() -> usize {
    10
}

fn default_skip_dirs() -> Vec<String> {
    ["node_modules", ".git", "__pycache__", "cache", "temp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for InstallSizeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            skip_dirs: default_skip_dirs(),
        }
    }
}

/// Navigation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Page the history starts on
    #[serde(default = "default_start_page")]
    pub start_page: String,
}

fn default_start_page() -> String {
    "./index.html".to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
        }
    }
}

/// File picker filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    #[serde(default = "default_executable_extensions")]
    pub executable_extensions: Vec<String>,

    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_executable_extensions() -> Vec<String> {
    ["exe", "bat", "lnk", "sh", "app"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "png", "jpeg", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            executable_extensions: default_executable_extensions(),
            image_extensions: default_image_extensions(),
        }
    }
}
