//! Edit session.
//!
//! Owns the single [`Draft`] and runs the two persistence paths:
//! tags and favorite are written through immediately, title/body/language
//! wait for an explicit [`EditSession::save`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sd_core::ports::{
    ClipboardPort, ConfirmPrompt, ConfirmationPort, Notice, NoticePort, SnippetStorePort,
};
use sd_core::{Draft, ImmediateFailurePolicy, Snippet, SnippetId};

use super::error::{MutationOp, SessionError};

/// Result of a tag or favorite mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The record was written and the store caches reloaded.
    Persisted,
    /// Nothing to do; no store call was made.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(SnippetId),
    Declined,
}

/// What happened to a navigation response handed to [`EditSession::load_for_ticket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketLoad {
    Loaded,
    /// A newer ticket was issued meanwhile.
    Superseded,
    /// Title, body or language was edited after the ticket was issued.
    EditedMeanwhile,
}

#[derive(Default)]
struct SessionState {
    draft: Option<Draft>,
    /// Newest navigation ticket. Loads carrying an older ticket are dropped.
    ticket: u64,
    /// Count of deferred edits, and its value when `ticket` was issued.
    edits: u64,
    edits_at_ticket: u64,
}

pub struct EditSession {
    state: Mutex<SessionState>,
    store: Arc<dyn SnippetStorePort>,
    clipboard: Arc<dyn ClipboardPort>,
    confirm: Arc<dyn ConfirmationPort>,
    notices: Arc<dyn NoticePort>,
    policy: ImmediateFailurePolicy,
}

impl EditSession {
    pub fn new(
        store: Arc<dyn SnippetStorePort>,
        clipboard: Arc<dyn ClipboardPort>,
        confirm: Arc<dyn ConfirmationPort>,
        notices: Arc<dyn NoticePort>,
        policy: ImmediateFailurePolicy,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            store,
            clipboard,
            confirm,
            notices,
            policy,
        }
    }

    /// Replaces the draft wholesale. Any navigation still in flight is superseded.
    pub async fn load(&self, snippet: Snippet) {
        let mut state = self.state.lock().await;
        state.ticket += 1;
        debug!(snippet_id = %snippet.id, "loading draft");
        state.draft = Some(Draft::load(snippet));
    }

    /// Issues a new navigation ticket, superseding every older one.
    pub async fn issue_ticket(&self) -> u64 {
        let mut state = self.state.lock().await;
        state.ticket += 1;
        state.edits_at_ticket = state.edits;
        state.ticket
    }

    /// Loads `snippet` only if `ticket` is still the newest one issued and no
    /// deferred edit made the draft dirty since.
    pub async fn load_for_ticket(&self, ticket: u64, snippet: Snippet) -> TicketLoad {
        let mut state = self.state.lock().await;
        if state.ticket != ticket {
            debug!(
                snippet_id = %snippet.id,
                ticket,
                newest = state.ticket,
                "dropping superseded navigation response"
            );
            return TicketLoad::Superseded;
        }
        let edited = state.edits != state.edits_at_ticket
            && state.draft.as_ref().is_some_and(Draft::is_dirty);
        if edited {
            debug!(snippet_id = %snippet.id, ticket, "draft edited while navigation was in flight");
            return TicketLoad::EditedMeanwhile;
        }
        state.draft = Some(Draft::load(snippet));
        TicketLoad::Loaded
    }

    /// Drops the draft if it still belongs to `id`.
    pub async fn clear_if(&self, id: &SnippetId) -> bool {
        let mut state = self.state.lock().await;
        if state.draft.as_ref().is_some_and(|d| d.id() == id) {
            state.draft = None;
            true
        } else {
            false
        }
    }

    pub async fn snapshot(&self) -> Option<Draft> {
        self.state.lock().await.draft.clone()
    }

    pub async fn selected_id(&self) -> Option<SnippetId> {
        self.state.lock().await.draft.as_ref().map(|d| d.id().clone())
    }

    pub async fn is_dirty(&self) -> bool {
        self.state
            .lock()
            .await
            .draft
            .as_ref()
            .is_some_and(Draft::is_dirty)
    }

    pub async fn edit_title(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        self.deferred_edit(|draft| draft.edit_title(text)).await
    }

    pub async fn edit_body(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        self.deferred_edit(|draft| draft.edit_body(text)).await
    }

    pub async fn edit_language(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        self.deferred_edit(|draft| draft.edit_language(text)).await
    }

    pub async fn set_tag_input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        self.with_draft(|draft| draft.set_tag_input(text)).await
    }

    pub async fn toggle_raw_mode(&self) -> Result<bool, SessionError> {
        self.with_draft(Draft::toggle_raw_mode).await
    }

    #[tracing::instrument(name = "usecase.edit_session.add_tag", skip(self))]
    pub async fn add_tag(&self, text: &str) -> Result<MutationOutcome, SessionError> {
        let (record, tag) = {
            let mut state = self.state.lock().await;
            let draft = state.draft.as_mut().ok_or(SessionError::NoSelection)?;
            match draft.add_tag(text) {
                Some(tag) => (draft.to_record(), tag),
                None => return Ok(MutationOutcome::Unchanged),
            }
        };

        self.persist_immediate(MutationOp::AddTag, record, move |draft| {
            draft.remove_tag(&tag);
        })
        .await
    }

    pub async fn commit_tag_input(&self) -> Result<MutationOutcome, SessionError> {
        let text = self
            .with_draft(|draft| draft.tag_input().to_string())
            .await?;
        self.add_tag(&text).await
    }

    #[tracing::instrument(name = "usecase.edit_session.remove_tag", skip(self))]
    pub async fn remove_tag(&self, tag: &str) -> Result<MutationOutcome, SessionError> {
        let (record, index) = {
            let mut state = self.state.lock().await;
            let draft = state.draft.as_mut().ok_or(SessionError::NoSelection)?;
            match draft.remove_tag(tag) {
                Some(index) => (draft.to_record(), index),
                None => return Ok(MutationOutcome::Unchanged),
            }
        };

        let tag = tag.to_string();
        self.persist_immediate(MutationOp::RemoveTag, record, move |draft| {
            draft.restore_tag(&tag, index);
        })
        .await
    }

    #[tracing::instrument(name = "usecase.edit_session.toggle_favorite", skip(self))]
    pub async fn toggle_favorite(&self) -> Result<MutationOutcome, SessionError> {
        let (record, previous) = {
            let mut state = self.state.lock().await;
            let draft = state.draft.as_mut().ok_or(SessionError::NoSelection)?;
            let now = draft.toggle_favorite();
            (draft.to_record(), !now)
        };

        self.persist_immediate(MutationOp::ToggleFavorite, record, move |draft| {
            draft.set_favorite(previous);
        })
        .await
    }

    /// Writes the whole draft, then re-baselines it against the stored copy.
    ///
    /// Edits made while the save is in flight keep the draft dirty.
    #[tracing::instrument(name = "usecase.edit_session.save", skip(self))]
    pub async fn save(&self) -> Result<Snippet, SessionError> {
        let record = {
            let state = self.state.lock().await;
            state
                .draft
                .as_ref()
                .map(Draft::to_record)
                .ok_or(SessionError::NoSelection)?
        };

        if let Err(err) = self.store.save(&record).await {
            return Err(self.fail(MutationOp::Save, err).await);
        }
        let reloaded = self.store.reload().await;

        let saved = match self.store.get(&record.id).await {
            Ok(saved) => saved,
            Err(err) => {
                warn!(snippet_id = %record.id, error = %err, "falling back to sent record after save");
                record
            }
        };

        let still_dirty = {
            let mut state = self.state.lock().await;
            match state.draft.as_mut() {
                Some(draft) if draft.id() == &saved.id => {
                    draft.rebaseline(&saved);
                    draft.is_dirty()
                }
                _ => false,
            }
        };

        if let Err(err) = reloaded {
            return Err(self.fail(MutationOp::Reload, err).await);
        }

        info!(snippet_id = %saved.id, still_dirty, "snippet saved");
        Ok(saved)
    }

    #[tracing::instrument(name = "usecase.edit_session.delete", skip(self))]
    pub async fn delete(&self) -> Result<DeleteOutcome, SessionError> {
        let (id, title) = {
            let state = self.state.lock().await;
            let draft = state.draft.as_ref().ok_or(SessionError::NoSelection)?;
            (draft.id().clone(), draft.title().to_string())
        };

        if !self
            .confirm
            .confirm(&ConfirmPrompt::DeleteSnippet { title })
            .await
        {
            debug!(snippet_id = %id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.store.delete(&id).await {
            return Err(self.fail(MutationOp::Delete, err).await);
        }
        if let Err(err) = self.store.reload().await {
            return Err(self.fail(MutationOp::Reload, err).await);
        }

        info!(snippet_id = %id, "snippet deleted");
        Ok(DeleteOutcome::Deleted(id))
    }

    #[tracing::instrument(name = "usecase.edit_session.copy_body", skip(self))]
    pub async fn copy_body(&self) -> Result<(), SessionError> {
        let body = self.with_draft(|draft| draft.body().to_string()).await?;

        match self.clipboard.write_text(&body).await {
            Ok(()) => {
                self.notices.notify(&Notice::info("Copied to clipboard")).await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                self.notices
                    .notify(&Notice::failure(format!("Failed to copy: {err}")))
                    .await;
                Err(SessionError::Clipboard(err))
            }
        }
    }

    async fn deferred_edit(&self, f: impl FnOnce(&mut Draft)) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let draft = state.draft.as_mut().ok_or(SessionError::NoSelection)?;
        f(draft);
        state.edits += 1;
        Ok(())
    }

    async fn with_draft<T>(&self, f: impl FnOnce(&mut Draft) -> T) -> Result<T, SessionError> {
        let mut state = self.state.lock().await;
        let draft = state.draft.as_mut().ok_or(SessionError::NoSelection)?;
        Ok(f(draft))
    }

    async fn persist_immediate(
        &self,
        op: MutationOp,
        record: Snippet,
        revert: impl FnOnce(&mut Draft),
    ) -> Result<MutationOutcome, SessionError> {
        if let Err(err) = self.store.save(&record).await {
            if self.policy == ImmediateFailurePolicy::Rollback {
                let mut state = self.state.lock().await;
                match state.draft.as_mut() {
                    Some(draft) if draft.id() == &record.id => revert(draft),
                    _ => debug!(snippet_id = %record.id, "selection changed, nothing to roll back"),
                }
            }
            return Err(self.fail(op, err).await);
        }

        if let Err(err) = self.store.reload().await {
            return Err(self.fail(MutationOp::Reload, err).await);
        }

        debug!(snippet_id = %record.id, %op, "immediate mutation persisted");
        Ok(MutationOutcome::Persisted)
    }

    async fn fail(&self, op: MutationOp, err: sd_core::ports::StoreError) -> SessionError {
        warn!(%op, error = %err, "session mutation failed");
        let err = SessionError::mutation(op, err);
        self.notices.notify(&Notice::failure(err.to_string())).await;
        err
    }
}
