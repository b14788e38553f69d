//! Store bridge port.
//!
//! Every call is an asynchronous round trip to whatever owns the snippet
//! collection. The session never assumes a call succeeded until it resolves.

use async_trait::async_trait;

use crate::ids::SnippetId;
use crate::ports::errors::StoreError;
use crate::snippet::Snippet;

#[async_trait]
pub trait SnippetStorePort: Send + Sync {
    /// All snippets in store order.
    async fn list_all(&self) -> Result<Vec<Snippet>, StoreError>;

    /// Authoritative copy of one snippet. `NotFound` if absent.
    async fn get(&self, id: &SnippetId) -> Result<Snippet, StoreError>;

    /// Snippets matching `query`, most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<Snippet>, StoreError>;

    /// Upsert by id. The store refreshes `updated_at`.
    async fn save(&self, snippet: &Snippet) -> Result<(), StoreError>;

    async fn delete(&self, id: &SnippetId) -> Result<(), StoreError>;

    /// Re-read backing storage into the store's caches.
    async fn reload(&self) -> Result<(), StoreError>;
}
