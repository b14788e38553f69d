use std::fmt;

use sd_core::ports::StoreError;
use sd_core::SnippetError;

/// The store call that a mutation failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Save,
    Delete,
    AddTag,
    RemoveTag,
    ToggleFavorite,
    Reload,
    Create,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MutationOp::Save => "save snippet",
            MutationOp::Delete => "delete snippet",
            MutationOp::AddTag => "add tag",
            MutationOp::RemoveTag => "remove tag",
            MutationOp::ToggleFavorite => "update favorite",
            MutationOp::Reload => "reload snippets",
            MutationOp::Create => "create snippet",
        };
        f.write_str(label)
    }
}

/// Errors surfaced by the session use cases.
///
/// 会话用例返回的错误。
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A list or single-item fetch failed. Shown inline; the draft is untouched.
    #[error("failed to load snippets: {0}")]
    Load(#[source] StoreError),

    #[error("failed to {op}: {source}")]
    Mutation {
        op: MutationOp,
        #[source]
        source: StoreError,
    },

    #[error("failed to copy to clipboard: {0}")]
    Clipboard(#[source] anyhow::Error),

    #[error("no snippet is selected")]
    NoSelection,

    #[error(transparent)]
    InvalidSnippet(#[from] SnippetError),
}

impl SessionError {
    pub fn mutation(op: MutationOp, source: StoreError) -> Self {
        SessionError::Mutation { op, source }
    }

    /// The failed mutation, if this is a mutation failure.
    pub fn op(&self) -> Option<MutationOp> {
        match self {
            SessionError::Mutation { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Whether a write reached the store even though the call as a whole failed.
    pub fn is_write_durable(&self) -> bool {
        matches!(self.op(), Some(MutationOp::Reload))
    }
}
