//! Editing-mode registry.
//!
//! The `language` field of a snippet is free text. The editor widget only knows
//! a closed set of modes, so every value is resolved through [`LanguageMode::resolve`]
//! and anything unrecognised (including the empty string) falls back to
//! [`LanguageMode::PlainText`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageMode {
    PlainText,
    JavaScript,
    /// JavaScript grammar with JSX enabled.
    TypeScript,
    Python,
    Yaml,
    Json,
    Markdown,
}

const REGISTRY: &[(LanguageMode, &[&str])] = &[
    (LanguageMode::JavaScript, &["javascript", "js", "mjs", "cjs"]),
    (LanguageMode::TypeScript, &["typescript", "ts", "tsx", "jsx"]),
    (LanguageMode::Python, &["python", "py"]),
    (LanguageMode::Yaml, &["yaml", "yml"]),
    (LanguageMode::Json, &["json"]),
    (LanguageMode::Markdown, &["markdown", "md"]),
];

impl LanguageMode {
    /// Resolves a free-text language identifier. Matching is case-insensitive
    /// and ignores surrounding whitespace.
    pub fn resolve(language: &str) -> Self {
        let key = language.trim().to_lowercase();
        if key.is_empty() {
            return LanguageMode::PlainText;
        }
        REGISTRY
            .iter()
            .find(|(_, names)| names.contains(&key.as_str()))
            .map(|(mode, _)| *mode)
            .unwrap_or(LanguageMode::PlainText)
    }

    /// Canonical identifier handed to the editor widget.
    pub fn id(&self) -> &'static str {
        match self {
            LanguageMode::PlainText => "plaintext",
            LanguageMode::JavaScript => "javascript",
            LanguageMode::TypeScript => "typescript",
            LanguageMode::Python => "python",
            LanguageMode::Yaml => "yaml",
            LanguageMode::Json => "json",
            LanguageMode::Markdown => "markdown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LanguageMode::PlainText => "Plain text",
            LanguageMode::JavaScript => "JavaScript",
            LanguageMode::TypeScript => "TypeScript",
            LanguageMode::Python => "Python",
            LanguageMode::Yaml => "YAML",
            LanguageMode::Json => "JSON",
            LanguageMode::Markdown => "Markdown",
        }
    }

    /// Whether the mode provides syntax highlighting at all.
    pub fn is_highlighted(&self) -> bool {
        !matches!(self, LanguageMode::PlainText)
    }

    pub fn all() -> &'static [LanguageMode] {
        &[
            LanguageMode::PlainText,
            LanguageMode::JavaScript,
            LanguageMode::TypeScript,
            LanguageMode::Python,
            LanguageMode::Yaml,
            LanguageMode::Json,
            LanguageMode::Markdown,
        ]
    }
}

impl std::fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
