//! List query.
//!
//! Keeps the snippet list in sync with the query text and the invalidation
//! token. Every state change is a fresh store round trip; only the response to
//! the newest request is applied.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info_span, warn, Instrument};

use sd_core::list::{project_rows, ListRow};
use sd_core::ports::SnippetStorePort;
use sd_core::{ListRequest, ListStatus, RefreshToken, Snippet, SnippetId};

use super::error::SessionError;

/// What happened to a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued, or the list was unmounted, before the
    /// response arrived. It was dropped.
    Stale,
    /// Nothing was requested (not mounted, or nothing changed).
    Skipped,
}

/// Read-only view of the list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub status: ListStatus,
    pub items: Vec<Snippet>,
    pub query_text: String,
    pub refresh_token: RefreshToken,
}

struct ListState {
    items: Vec<Snippet>,
    query_text: String,
    refresh_token: RefreshToken,
    status: ListStatus,
    generation: u64,
    mounted: bool,
}

pub struct ListQuery {
    store: Arc<dyn SnippetStorePort>,
    state: Mutex<ListState>,
}

impl ListQuery {
    pub fn new(store: Arc<dyn SnippetStorePort>) -> Self {
        Self {
            store,
            state: Mutex::new(ListState {
                items: Vec::new(),
                query_text: String::new(),
                refresh_token: RefreshToken::default(),
                status: ListStatus::Loading,
                generation: 0,
                mounted: false,
            }),
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome, SessionError> {
        self.state.lock().await.mounted = true;
        self.fetch().await
    }

    /// Drops everything still in flight. Later responses are ignored.
    pub async fn unmount(&self) {
        let mut state = self.state.lock().await;
        state.mounted = false;
        state.generation += 1;
    }

    pub async fn set_query(&self, text: impl Into<String>) -> Result<FetchOutcome, SessionError> {
        let text = text.into();
        {
            let mut state = self.state.lock().await;
            if state.query_text == text {
                return Ok(FetchOutcome::Skipped);
            }
            state.query_text = text;
        }
        self.fetch().await
    }

    pub async fn invalidate(&self, token: RefreshToken) -> Result<FetchOutcome, SessionError> {
        {
            let mut state = self.state.lock().await;
            if state.refresh_token == token {
                return Ok(FetchOutcome::Skipped);
            }
            state.refresh_token = token;
        }
        self.fetch().await
    }

    /// Manual re-fetch. There is no automatic retry.
    pub async fn retry(&self) -> Result<FetchOutcome, SessionError> {
        self.fetch().await
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.state.lock().await;
        ListSnapshot {
            status: state.status.clone(),
            items: state.items.clone(),
            query_text: state.query_text.clone(),
            refresh_token: state.refresh_token,
        }
    }

    pub async fn rows(&self, selected: Option<&SnippetId>) -> Vec<ListRow> {
        let state = self.state.lock().await;
        project_rows(&state.items, selected)
    }

    async fn fetch(&self) -> Result<FetchOutcome, SessionError> {
        let (generation, request) = {
            let mut state = self.state.lock().await;
            if !state.mounted {
                return Ok(FetchOutcome::Skipped);
            }
            state.generation += 1;
            state.status = ListStatus::Loading;
            (state.generation, ListRequest::from_query(&state.query_text))
        };

        let span = info_span!("usecase.list_query.fetch", generation, request = ?request);
        async {
            let result = match &request {
                ListRequest::All => self.store.list_all().await,
                ListRequest::Search(query) => self.store.search(query).await,
            };

            let mut state = self.state.lock().await;
            if !state.mounted || state.generation != generation {
                debug!(newest = state.generation, "dropping stale list response");
                return Ok(FetchOutcome::Stale);
            }

            match result {
                Ok(items) => {
                    debug!(count = items.len(), "list loaded");
                    state.items = items;
                    state.status = ListStatus::Loaded;
                    Ok(FetchOutcome::Applied)
                }
                Err(err) => {
                    warn!(error = %err, "list fetch failed");
                    state.status = ListStatus::Failed(err.to_string());
                    Err(SessionError::Load(err))
                }
            }
        }
        .instrument(span)
        .await
    }
}
