//! Configuration management for GameShelf
//!
//! Handles data locations, install-size limits, navigation and picker settings,
//! plus the read-only theme presets. Config files are TOML; a system file is
//! overlaid by the user's file.

mod sections;
mod themes;

pub use sections::{InstallSizeConfig, LibraryConfig, NavigationConfig, PickerConfig};
pub use themes::{DEFAULT_PALETTE, Palette, ThemeCatalog, default_palette, is_default};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// System-wide configuration directory
pub const CONFIG_DIR: &str = "/etc/gameshelf";

/// Per-user configuration file (`~/.config/gameshelf/config.toml` on Linux)
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gameshelf")
        .join("config.toml")
}

/// Main GameShelf configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub install_size: InstallSizeConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub picker: PickerConfig,
}

impl ShelfConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `base` and overlay `overlay` on top of it; either may be missing
    pub fn load_layered(base: &Path, overlay: &Path) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        let mut found = false;

        for path in [base, overlay] {
            if path.exists() {
                let contents = std::fs::read_to_string(path)?;
                let value: toml::Value = toml::from_str(&contents)?;
                merge_toml(&mut merged, value);
                found = true;
            }
        }

        if !found {
            tracing::warn!("No configuration file found, using defaults");
            return Ok(Self::default());
        }

        Ok(merged.try_into::<Self>()?)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let system_config = Path::new(CONFIG_DIR).join("config.toml");
        Self::load_layered(&system_config, &user_config_path())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Create the data directory and seed empty documents
    pub fn ensure_data_files(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.library.data_dir)?;

        for path in [self.library.games_path(), self.library.themes_path()] {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, "{}")?;
                tracing::debug!("Created {}", path.display());
            }
        }

        Ok(())
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
