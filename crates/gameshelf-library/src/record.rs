//! Game records

use crate::LibraryError;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque game identifier, assigned as a decimal counter
///
/// Ordered numerically, so `"2"` sorts before `"10"`. Non-numeric ids sort
/// after every numeric one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is one
    pub fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl Ord for GameId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for GameId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A game in the library
///
/// `title` and `path` are required; every other field defaults to empty.
/// The same shape is used for the details submitted on add/edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    /// Absolute path to the executable
    #[serde(default, deserialize_with = "nullable")]
    pub path: String,

    #[serde(default, deserialize_with = "nullable")]
    pub cover_image: String,

    #[serde(default, deserialize_with = "nullable")]
    pub icon: String,

    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,

    /// Comma-separated
    #[serde(default, deserialize_with = "nullable")]
    pub developers: String,

    /// Comma-separated
    #[serde(default, deserialize_with = "nullable")]
    pub publishers: String,

    /// Paragraphs separated by blank lines
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GameRecord {
    /// Create a record with the two required fields
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cover_image(mut self, path: impl Into<String>) -> Self {
        self.cover_image = path.into();
        self
    }

    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon = path.into();
        self
    }

    pub fn with_developers(mut self, developers: impl Into<String>) -> Self {
        self.developers = developers.into();
        self
    }

    pub fn with_publishers(mut self, publishers: impl Into<String>) -> Self {
        self.publishers = publishers.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    /// Reject records without a title or path
    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.title.trim().is_empty() || self.path.trim().is_empty() {
            return Err(LibraryError::Validation(
                "The game needs a name and a path".into(),
            ));
        }
        Ok(())
    }

    pub fn developer_list(&self) -> Vec<String> {
        split_names(&self.developers)
    }

    pub fn publisher_list(&self) -> Vec<String> {
        split_names(&self.publishers)
    }

    /// Case-insensitive tag match
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag))
    }

    /// Description split into paragraphs, each a list of lines
    pub fn description_paragraphs(&self) -> Vec<Vec<String>> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for line in self.description.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line.to_string());
            }
        }

        if !current.is_empty() {
            paragraphs.push(current);
        }

        paragraphs
    }
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
