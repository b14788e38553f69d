use thiserror::Error;

/// Validation failure for a snippet record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnippetError {
    #[error("invalid snippet: {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
