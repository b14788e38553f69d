//! Markdown-with-frontmatter codec.
//!
//! A snippet file is a `---` line, a YAML mapping with the metadata, another
//! `---` line, an empty line and then the body verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sd_core::{Snippet, SnippetError, SnippetId};

const DELIMITER: &str = "---";

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("file does not start with frontmatter delimiter")]
    MissingDelimiter,

    #[error("frontmatter delimiter not closed")]
    UnclosedDelimiter,

    #[error("failed to parse frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] SnippetError),
}

/// On-disk metadata. Every field is optional so hand-written files with gaps
/// still load; missing values take their defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FrontmatterDto {
    id: Option<String>,
    title: Option<String>,
    tags: Option<Vec<String>>,
    language: Option<String>,
    is_favorite: Option<bool>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl FrontmatterDto {
    fn into_snippet(self, body: String) -> Snippet {
        Snippet {
            id: SnippetId::from(self.id.unwrap_or_default()),
            title: self.title.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
            is_favorite: self.is_favorite.unwrap_or(false),
            created_at: self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            updated_at: self.updated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            body,
        }
    }
}

impl From<&Snippet> for FrontmatterDto {
    fn from(snippet: &Snippet) -> Self {
        Self {
            id: Some(snippet.id.to_string()),
            title: Some(snippet.title.clone()),
            tags: Some(snippet.tags.clone()),
            language: Some(snippet.language.clone()),
            is_favorite: Some(snippet.is_favorite),
            created_at: Some(snippet.created_at),
            updated_at: Some(snippet.updated_at),
        }
    }
}

/// Parses a snippet file. The result is not validated.
pub fn decode(text: &str) -> Result<Snippet, FrontmatterError> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.first().map(|l| l.trim()) != Some(DELIMITER) {
        return Err(FrontmatterError::MissingDelimiter);
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == DELIMITER)
        .map(|i| i + 1)
        .ok_or(FrontmatterError::UnclosedDelimiter)?;

    let yaml = lines[1..close].join("\n");
    let dto = if yaml.trim().is_empty() {
        FrontmatterDto::default()
    } else {
        serde_yaml::from_str::<FrontmatterDto>(&yaml)?
    };

    let body = lines[close + 1..].join("\n");
    let body = body.strip_prefix('\n').unwrap_or(&body).to_string();

    Ok(dto.into_snippet(body))
}

/// Serialises a snippet after validating it.
pub fn encode(snippet: &Snippet) -> Result<String, FrontmatterError> {
    snippet.validate()?;
    let yaml = serde_yaml::to_string(&FrontmatterDto::from(snippet))?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{}", snippet.body))
}
