//! Flat JSON game store
//!
//! The whole library is one JSON object mapping id -> record. Every mutation
//! reads the document, changes it in memory and rewrites the file.

use crate::{GameId, GameRecord, LibraryError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All games keyed by id
pub type GameMap = BTreeMap<GameId, GameRecord>;

/// Game store backed by a single JSON document
#[derive(Debug, Clone)]
pub struct GameStore {
    path: PathBuf,
}

impl GameStore {
    /// Use the document at `path` (created on first write)
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every game; a missing or blank document is an empty library
    pub fn load(&self) -> Result<GameMap, LibraryError> {
        if !self.path.exists() {
            return Ok(GameMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(GameMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    /// Get a game by id
    pub fn get(&self, id: &GameId) -> Result<Option<GameRecord>, LibraryError> {
        Ok(self.load()?.remove(id))
    }

    /// Add a game under the next free id
    pub fn add(&self, record: GameRecord) -> Result<GameId, LibraryError> {
        record.validate()?;

        let mut games = self.load()?;
        let id = Self::next_id(&games)?;
        games.insert(id.clone(), record);
        self.write(&games)?;

        tracing::info!("Added game {}", id);
        Ok(id)
    }

    /// Replace every field of an existing game, returning the previous record
    pub fn update(&self, id: &GameId, record: GameRecord) -> Result<GameRecord, LibraryError> {
        record.validate()?;

        let mut games = self.load()?;
        let previous = match games.get_mut(id) {
            Some(existing) => std::mem::replace(existing, record),
            None => return Err(LibraryError::GameNotFound(id.clone())),
        };
        self.write(&games)?;

        tracing::info!("Updated game {}", id);
        Ok(previous)
    }

    /// Delete a game; deleting an unknown id still rewrites and succeeds.
    /// Returns whether a record was actually present.
    pub fn remove(&self, id: &GameId) -> Result<bool, LibraryError> {
        let mut games = self.load()?;
        let removed = games.remove(id).is_some();
        self.write(&games)?;

        if removed {
            tracing::info!("Removed game {}", id);
        } else {
            tracing::debug!("Remove of unknown game {} ignored", id);
        }
        Ok(removed)
    }

    /// One past the highest numeric id (1 for an empty library)
    pub fn next_id(games: &GameMap) -> Result<GameId, LibraryError> {
        let highest = games.keys().filter_map(GameId::numeric).max().unwrap_or(0);
        highest
            .checked_add(1)
            .map(GameId::from)
            .ok_or(LibraryError::IdsExhausted)
    }

    fn write(&self, games: &GameMap) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        games.serialize(&mut serializer)?;

        std::fs::write(&self.path, buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, GameStore) {
        let dir = TempDir::new().unwrap();
        let store = GameStore::open(dir.path().join("games.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_document_is_empty() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_add_assigns_increasing_ids() {
        let (_dir, store) = store();
        let a = store.add(GameRecord::new("A", "/a")).unwrap();
        let b = store.add(GameRecord::new("B", "/b")).unwrap();
        assert_eq!(a.as_str(), "1");
        assert_eq!(b.as_str(), "2");
    }

    #[test]
    fn test_next_id_skips_non_numeric_keys() {
        let mut games = GameMap::new();
        games.insert(GameId::from("9"), GameRecord::new("x", "y"));
        games.insert(GameId::from("10"), GameRecord::new("x", "y"));
        games.insert(GameId::from("legacy"), GameRecord::new("x", "y"));
        assert_eq!(GameStore::next_id(&games).unwrap().as_str(), "11");
    }

    #[test]
    fn test_add_after_highest_possible_id_fails() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            r#"{"18446744073709551615": {"title": "Max", "path": "/max"}}"#,
        )
        .unwrap();

        let err = store.add(GameRecord::new("A", "/a")).unwrap_err();
        assert!(matches!(err, LibraryError::IdsExhausted));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_document_lists_ids_numerically() {
        let (_dir, store) = store();
        for n in 1..=10 {
            store.add(GameRecord::new(format!("G{}", n), "/g")).unwrap();
        }

        let ids: Vec<String> = store.load().unwrap().keys().map(|id| id.to_string()).collect();
        assert_eq!(ids[1], "2");
        assert_eq!(ids[9], "10");
    }

    #[test]
    fn test_add_rejects_invalid_record() {
        let (_dir, store) = store();
        let err = store.add(GameRecord::new("", "/a")).unwrap_err();
        assert!(matches!(err, LibraryError::Validation(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_unknown_game() {
        let (_dir, store) = store();
        let err = store
            .update(&GameId::from("42"), GameRecord::new("A", "/a"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let (_dir, store) = store();
        let id = store
            .add(GameRecord::new("A", "/a").with_tags(["old"]).with_icon("/i.png"))
            .unwrap();

        let previous = store.update(&id, GameRecord::new("B", "/b")).unwrap();
        assert_eq!(previous.title, "A");

        let current = store.get(&id).unwrap().unwrap();
        assert_eq!(current.title, "B");
        assert!(current.tags.is_empty());
        assert_eq!(current.icon, "");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = store();
        let id = store.add(GameRecord::new("A", "/a")).unwrap();
        assert!(store.remove(&id).unwrap());
        assert!(!store.remove(&id).unwrap());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_document_uses_four_space_indent() {
        let (_dir, store) = store();
        store.add(GameRecord::new("A", "/a")).unwrap();
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("\n    \"1\": {"));
        assert!(contents.contains("\n        \"title\": \"A\""));
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "{ nope").unwrap();
        assert!(matches!(store.load(), Err(LibraryError::Json(_))));
        assert!(store.add(GameRecord::new("A", "/a")).is_err());
    }
}
