//! List view types.
//!
//! Pure values shared between the list query use case and whatever renders it.

use serde::{Deserialize, Serialize};

use crate::ids::SnippetId;
use crate::snippet::Snippet;

/// Monotonic token bumped after every durable mutation to force a list refetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RefreshToken(pub u64);

impl RefreshToken {
    pub fn next(self) -> Self {
        RefreshToken(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which store call a query text maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    All,
    /// Carries the query exactly as typed, untrimmed.
    Search(String),
}

impl ListRequest {
    /// Whitespace-only queries mean "everything".
    pub fn from_query(query: &str) -> Self {
        if query.trim().is_empty() {
            ListRequest::All
        } else {
            ListRequest::Search(query.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// One rendered row. `is_selected` is derived from the selected id and carries
/// no state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub snippet: Snippet,
    pub is_selected: bool,
}

pub fn project_rows(items: &[Snippet], selected: Option<&SnippetId>) -> Vec<ListRow> {
    items
        .iter()
        .map(|snippet| ListRow {
            is_selected: selected == Some(&snippet.id),
            snippet: snippet.clone(),
        })
        .collect()
}
