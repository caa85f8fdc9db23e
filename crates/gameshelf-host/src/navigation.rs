//! Back/forward page history
//!
//! Browser-style: navigating to a new page from the middle of the history
//! drops everything after the current position.

use serde::{Deserialize, Serialize};

/// Pages plus the current position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub pages: Vec<String>,
    pub index: usize,
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationOutcome {
    #[serde(flatten)]
    pub history: HistorySnapshot,

    /// Page the view must load; `None` when nothing changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<String>,
}

/// Linear navigation history
///
/// Invariant: `index < pages.len()` whenever `pages` is non-empty.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    pages: Vec<String>,
    index: usize,
}

impl NavigationHistory {
    /// History holding only `start_page`
    pub fn new(start_page: impl Into<String>) -> Self {
        Self {
            pages: vec![start_page.into()],
            index: 0,
        }
    }

    /// Move to `page`. With `add_to_history` the entries after the current
    /// one are discarded and `page` is appended; without it the history is
    /// left alone. Either way `page` is what the view loads.
    pub fn goto(&mut self, page: impl Into<String>, add_to_history: bool) -> String {
        let page = page.into();

        if add_to_history {
            self.pages.truncate(self.index + 1);
            self.pages.push(page.clone());
            self.index = self.pages.len() - 1;
        }

        page
    }

    /// Step back; `None` (and no change) at the first entry
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.current_page()
    }

    /// Step forward; `None` (and no change) at the last entry
    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.current_page()
    }

    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.index).map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.pages.len()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            pages: self.pages.clone(),
            index: self.index,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(pages: &[&str]) -> NavigationHistory {
        let mut history = NavigationHistory::new(pages[0]);
        for page in &pages[1..] {
            history.goto(*page, true);
        }
        history
    }

    #[test]
    fn test_starts_on_start_page() {
        let history = NavigationHistory::new("./index.html");
        assert_eq!(history.current_page(), Some("./index.html"));
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_goto_after_back_prunes_forward_branch() {
        let mut history = history(&["A", "B", "C"]);
        assert_eq!(history.snapshot().index, 2);

        assert_eq!(history.back(), Some("B"));
        history.goto("D", true);

        let snapshot = history.snapshot();
        assert_eq!(snapshot.pages, vec!["A", "B", "D"]);
        assert_eq!(snapshot.index, 2);
    }

    #[test]
    fn test_back_at_start_is_noop() {
        let mut history = history(&["A", "B"]);
        history.back();
        let before = history.snapshot();

        assert_eq!(history.back(), None);
        assert_eq!(history.snapshot(), before);
    }

    #[test]
    fn test_forward_at_end_is_noop() {
        let mut history = history(&["A", "B"]);
        let before = history.snapshot();

        assert_eq!(history.forward(), None);
        assert_eq!(history.snapshot(), before);
    }

    #[test]
    fn test_back_then_forward() {
        let mut history = history(&["A", "B", "C"]);
        history.back();
        history.back();
        assert_eq!(history.current_page(), Some("A"));
        assert_eq!(history.forward(), Some("B"));
        assert!(history.can_go_back());
        assert!(history.can_go_forward());
    }

    #[test]
    fn test_goto_without_history_keeps_pages() {
        let mut history = history(&["A", "B"]);
        let before = history.snapshot();

        assert_eq!(history.goto("X", false), "X");
        assert_eq!(history.snapshot(), before);
    }

    #[test]
    fn test_empty_history() {
        let mut history = NavigationHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.current_page(), None);
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);

        history.goto("A", true);
        assert_eq!(
            history.snapshot(),
            HistorySnapshot {
                pages: vec!["A".into()],
                index: 0,
            }
        );
    }

    #[test]
    fn test_outcome_wire_shape() {
        let outcome = NavigationOutcome {
            history: NavigationHistory::new("./index.html").snapshot(),
            load: None,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["index"], 0);
        assert_eq!(value["pages"][0], "./index.html");
        assert!(value.get("load").is_none());
    }
}
