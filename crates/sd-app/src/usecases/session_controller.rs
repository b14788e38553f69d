//! Session controller.
//!
//! Composes the edit session, the navigation guard and the list query. The
//! selected id is always the draft's id, so "a draft exists iff something is
//! selected" holds by construction. After every durable mutation the refresh
//! token is bumped and the list re-fetches.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use sd_core::list::ListRow;
use sd_core::ports::{ClipboardPort, ClockPort, ConfirmationPort, NoticePort, SnippetStorePort};
use sd_core::{Draft, ImmediateFailurePolicy, RefreshToken, Snippet, SnippetId};

use super::create_snippet::CreateSnippet;
use super::edit_session::{DeleteOutcome, EditSession, MutationOutcome};
use super::error::SessionError;
use super::list_query::{FetchOutcome, ListQuery, ListSnapshot};
use super::navigation::{NavigationGuard, SelectOutcome};

/// Everything a front end needs to render one frame.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub draft: Option<Draft>,
    pub list: ListSnapshot,
    pub rows: Vec<ListRow>,
}

impl SessionView {
    pub fn selected_id(&self) -> Option<&SnippetId> {
        self.draft.as_ref().map(Draft::id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub snippet: Snippet,
    pub selection: SelectOutcome,
}

pub struct SessionController {
    session: Arc<EditSession>,
    guard: NavigationGuard,
    list: ListQuery,
    create: CreateSnippet,
    token: Mutex<RefreshToken>,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn SnippetStorePort>,
        clipboard: Arc<dyn ClipboardPort>,
        confirm: Arc<dyn ConfirmationPort>,
        notices: Arc<dyn NoticePort>,
        clock: Arc<dyn ClockPort>,
        policy: ImmediateFailurePolicy,
    ) -> Self {
        let session = Arc::new(EditSession::new(
            store.clone(),
            clipboard,
            confirm.clone(),
            notices.clone(),
            policy,
        ));
        Self {
            guard: NavigationGuard::new(session.clone(), store.clone(), confirm),
            list: ListQuery::new(store.clone()),
            create: CreateSnippet::new(store, clock, notices),
            session,
            token: Mutex::new(RefreshToken::default()),
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome, SessionError> {
        self.list.mount().await
    }

    pub async fn unmount(&self) {
        self.list.unmount().await
    }

    pub async fn set_query(&self, text: impl Into<String>) -> Result<FetchOutcome, SessionError> {
        self.list.set_query(text).await
    }

    pub async fn retry_list(&self) -> Result<FetchOutcome, SessionError> {
        self.list.retry().await
    }

    pub async fn select(&self, target: Snippet) -> SelectOutcome {
        self.guard.select(target).await
    }

    pub async fn selected_id(&self) -> Option<SnippetId> {
        self.session.selected_id().await
    }

    pub async fn is_dirty(&self) -> bool {
        self.session.is_dirty().await
    }

    pub async fn refresh_token(&self) -> RefreshToken {
        *self.token.lock().await
    }

    pub async fn edit_title(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.edit_title(text).await
    }

    pub async fn edit_body(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.edit_body(text).await
    }

    pub async fn edit_language(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.edit_language(text).await
    }

    pub async fn set_tag_input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.set_tag_input(text).await
    }

    pub async fn add_tag(&self, text: &str) -> Result<MutationOutcome, SessionError> {
        let result = self.session.add_tag(text).await;
        self.after_immediate(result).await
    }

    pub async fn commit_tag_input(&self) -> Result<MutationOutcome, SessionError> {
        let result = self.session.commit_tag_input().await;
        self.after_immediate(result).await
    }

    pub async fn remove_tag(&self, tag: &str) -> Result<MutationOutcome, SessionError> {
        let result = self.session.remove_tag(tag).await;
        self.after_immediate(result).await
    }

    pub async fn toggle_favorite(&self) -> Result<MutationOutcome, SessionError> {
        let result = self.session.toggle_favorite().await;
        self.after_immediate(result).await
    }

    pub async fn save(&self) -> Result<Snippet, SessionError> {
        let result = self.session.save().await;
        if result.is_ok() || durable_failure(&result) {
            self.guard.saved().await;
            self.invalidate().await;
        }
        result
    }

    /// Deletes the selected snippet after confirmation. The guard clears the
    /// selection once the store has dropped the record.
    pub async fn delete(&self) -> Result<DeleteOutcome, SessionError> {
        let selected = self.session.selected_id().await;
        let result = self.session.delete().await;
        let removed = match &result {
            Ok(DeleteOutcome::Deleted(id)) => Some(id.clone()),
            Err(_) if durable_failure(&result) => selected,
            _ => None,
        };
        if let Some(id) = removed {
            self.guard.deleted(id).await;
            self.invalidate().await;
        }
        result
    }

    pub async fn copy_body(&self) -> Result<(), SessionError> {
        self.session.copy_body().await
    }

    pub async fn toggle_raw_mode(&self) -> Result<bool, SessionError> {
        self.session.toggle_raw_mode().await
    }

    /// Creates a snippet, then selects it through the guard.
    pub async fn create(&self, title: &str, body: &str) -> Result<Created, SessionError> {
        let result = self.create.execute(title, body).await;
        if result.is_ok() || durable_failure(&result) {
            self.invalidate().await;
        }
        let snippet = result?;
        let selection = self.guard.select(snippet.clone()).await;
        Ok(Created { snippet, selection })
    }

    pub async fn view(&self) -> SessionView {
        let draft = self.session.snapshot().await;
        let selected = draft.as_ref().map(|d| d.id().clone());
        SessionView {
            rows: self.list.rows(selected.as_ref()).await,
            list: self.list.snapshot().await,
            draft,
        }
    }

    async fn after_immediate(
        &self,
        result: Result<MutationOutcome, SessionError>,
    ) -> Result<MutationOutcome, SessionError> {
        if matches!(result, Ok(MutationOutcome::Persisted)) || durable_failure(&result) {
            self.invalidate().await;
        }
        result
    }

    async fn invalidate(&self) {
        let token = {
            let mut token = self.token.lock().await;
            *token = token.next();
            *token
        };
        debug!(%token, "invalidating list");
        if let Err(err) = self.list.invalidate(token).await {
            warn!(error = %err, "list refetch after mutation failed");
        }
    }
}

/// A failure that happened after the write itself reached the store.
fn durable_failure<T>(result: &Result<T, SessionError>) -> bool {
    matches!(result, Err(err) if err.is_write_durable())
}
