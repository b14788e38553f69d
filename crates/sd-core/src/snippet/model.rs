use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::SnippetError;
use crate::ids::SnippetId;

/// A persisted snippet as owned by the store.
///
/// The editing session only ever holds a copy of this record. `updated_at`
/// belongs to the store and is refreshed on every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub body: String,
}

impl Snippet {
    /// Creates a new snippet with a generated id and both timestamps set to `now`.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SnippetId::new(),
            title: title.into(),
            tags: Vec::new(),
            language: String::new(),
            is_favorite: false,
            created_at: now,
            updated_at: now,
            body: String::new(),
        }
    }

    /// Checks the fields the store requires.
    pub fn validate(&self) -> Result<(), SnippetError> {
        if self.id.is_empty() {
            return Err(SnippetError::Invalid {
                field: "id",
                reason: "ID cannot be empty",
            });
        }
        if self.title.is_empty() {
            return Err(SnippetError::Invalid {
                field: "title",
                reason: "Title cannot be empty",
            });
        }
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
