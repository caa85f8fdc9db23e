//! Color theme presets
//!
//! Presets are flat maps from CSS custom property (`--accent-color`) to a
//! color value, grouped by preset name. The document is read-only here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::ConfigError;

/// One preset: CSS variable -> color
pub type Palette = BTreeMap<String, String>;

/// Built-in palette the UI falls back to
pub const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("--main-bg-color", "#EDEDF5"),
    ("--secondary-color", "#050522"),
    ("--accent-color", "#E6192A"),
    ("--text-color", "#050522"),
];

/// All theme presets keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    #[serde(default)]
    pub themes: BTreeMap<String, Palette>,
}

impl ThemeCatalog {
    /// Parse a catalog file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&contents)?;
        Ok(catalog)
    }

    /// Load a catalog, treating a missing or unreadable file as empty
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Error loading themes from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Look up a preset by name
    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.themes.get(name)
    }

    /// Preset names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

/// The built-in palette as an owned map
pub fn default_palette() -> Palette {
    DEFAULT_PALETTE
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Whether `value` is the built-in value for `var`
pub fn is_default(var: &str, value: &str) -> bool {
    DEFAULT_PALETTE
        .iter()
        .any(|(k, v)| *k == var && v.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_catalog() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"themes": {{"dark": {{"--main-bg-color": "#101010", "--text-color": "#fafafa"}}}}}}"##
        )
        .unwrap();

        let catalog = ThemeCatalog::load(file.path()).unwrap();
        let dark = catalog.get("dark").unwrap();
        assert_eq!(dark.get("--main-bg-color").unwrap(), "#101010");
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["dark"]);
    }

    #[test]
    fn test_missing_or_broken_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("themes.json");
        assert!(ThemeCatalog::load_or_empty(&missing).themes.is_empty());

        std::fs::write(&missing, "{not json").unwrap();
        assert!(ThemeCatalog::load_or_empty(&missing).themes.is_empty());
    }

    #[test]
    fn test_empty_object_is_empty_catalog() {
        let catalog: ThemeCatalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.themes.is_empty());
    }

    #[test]
    fn test_default_palette() {
        let palette = default_palette();
        assert_eq!(palette.len(), 4);
        assert!(is_default("--accent-color", "#e6192a"));
        assert!(!is_default("--accent-color", "#000000"));
        assert!(!is_default("--unknown", "#EDEDF5"));
    }
}
