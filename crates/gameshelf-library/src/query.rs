//! Sorting, filtering and title search over the library

use crate::{GameId, GameMap, GameRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Library sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Title A-Z
    #[serde(rename = "az")]
    TitleAscending,
    /// Title Z-A
    #[serde(rename = "za")]
    TitleDescending,
    /// Release date, undated games first
    #[serde(rename = "release")]
    Release,
    /// Order added (ascending id)
    #[default]
    #[serde(rename = "dateAdded")]
    DateAdded,
}

/// A record paired with its id, flattened on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedGame {
    pub id: GameId,
    #[serde(flatten)]
    pub record: GameRecord,
}

fn compare_titles(a: &GameRecord, b: &GameRecord) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

/// Games matching `tag` (all of them when `tag` is blank), in `mode` order
pub fn list_games(games: &GameMap, mode: SortMode, tag: Option<&str>) -> Vec<ListedGame> {
    let tag = tag.map(str::trim).filter(|t| !t.is_empty());

    let mut listed: Vec<ListedGame> = games
        .iter()
        .filter(|(_, record)| tag.is_none_or(|t| record.has_tag(t)))
        .map(|(id, record)| ListedGame {
            id: id.clone(),
            record: record.clone(),
        })
        .collect();

    match mode {
        SortMode::TitleAscending => listed.sort_by(|a, b| compare_titles(&a.record, &b.record)),
        SortMode::TitleDescending => listed.sort_by(|a, b| compare_titles(&b.record, &a.record)),
        SortMode::Release => listed.sort_by(|a, b| {
            a.record
                .release_date
                .as_deref()
                .cmp(&b.record.release_date.as_deref())
        }),
        SortMode::DateAdded => {
            listed.sort_by_key(|g| g.id.numeric().unwrap_or(u64::MAX));
        }
    }

    listed
}

/// One title search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatch {
    pub id: GameId,
    pub title: String,
}

/// Title lookup table for search-as-you-type
#[derive(Debug, Default)]
pub struct TitleIndex {
    entries: Vec<TitleMatch>,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_games(games: &GameMap) -> Self {
        let mut entries: Vec<TitleMatch> = games
            .iter()
            .map(|(id, record)| TitleMatch {
                id: id.clone(),
                title: record.title.clone(),
            })
            .collect();
        entries.sort_by_key(|m| m.id.numeric().unwrap_or(u64::MAX));
        Self { entries }
    }

    /// Case-insensitive substring matches; a blank query matches nothing
    pub fn search(&self, query: &str) -> Vec<TitleMatch> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|m| !m.title.is_empty() && m.title.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Set the title for `id`, adding the entry if it is unknown
    pub fn rename(&mut self, id: &GameId, title: &str) {
        match self.entries.iter_mut().find(|m| &m.id == id) {
            Some(entry) => entry.title = title.to_string(),
            None => self.entries.push(TitleMatch {
                id: id.clone(),
                title: title.to_string(),
            }),
        }
    }

    pub fn remove(&mut self, id: &GameId) {
        self.entries.retain(|m| &m.id != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
