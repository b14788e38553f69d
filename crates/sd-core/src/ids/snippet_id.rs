use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Opaque, stable identifier of a snippet. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl_id!(SnippetId);
