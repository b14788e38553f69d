//! Navigation guard orchestrator.
//!
//! Drives [`NavigationGuardMachine`] and executes its actions against the
//! session, the confirmation port and the store.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use sd_core::ports::{ConfirmPrompt, ConfirmationPort, SnippetStorePort};
use sd_core::{GuardAction, GuardEvent, GuardState, NavigationGuardMachine, Snippet, SnippetId};

use super::edit_session::{EditSession, TicketLoad};

/// How a selection request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The target is now the draft. `fallback` is set when the list copy was
    /// used because the authoritative fetch failed.
    Loaded { fallback: bool },
    /// The user kept the unsaved draft.
    Declined,
    /// The target was already selected.
    Unchanged,
    /// A newer selection was issued while this one was in flight.
    Superseded,
}

pub struct NavigationGuard {
    session: Arc<EditSession>,
    store: Arc<dyn SnippetStorePort>,
    confirm: Arc<dyn ConfirmationPort>,
}

impl NavigationGuard {
    pub fn new(
        session: Arc<EditSession>,
        store: Arc<dyn SnippetStorePort>,
        confirm: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            session,
            store,
            confirm,
        }
    }

    /// Requests a switch to `target` (the list copy).
    pub async fn select(&self, target: Snippet) -> SelectOutcome {
        if self.session.selected_id().await.as_ref() == Some(&target.id) {
            // Still the newest request: anything in flight loses.
            self.session.issue_ticket().await;
            debug!(snippet_id = %target.id, "target already selected");
            return SelectOutcome::Unchanged;
        }

        let span = info_span!("usecase.navigation_guard.select", target = %target.id);
        self.drive(GuardEvent::SelectRequested { target })
            .instrument(span)
            .await
    }

    /// Feeds a finished save through the guard.
    pub async fn saved(&self) {
        let still_dirty = self.session.is_dirty().await;
        self.drive(GuardEvent::Saved { still_dirty }).await;
    }

    /// Feeds a finished delete through the guard; clears the selection if it
    /// still points at `id`.
    pub async fn deleted(&self, id: SnippetId) {
        self.drive(GuardEvent::Deleted { id }).await;
    }

    async fn drive(&self, first: GuardEvent) -> SelectOutcome {
        let mut state = GuardState::from_dirty(self.session.is_dirty().await);
        let mut pending = vec![first];
        let mut ticket = 0;
        let mut used_fallback = false;
        let mut outcome = SelectOutcome::Unchanged;

        while let Some(event) = pending.pop() {
            let from = state;
            let event_name = event_label(&event);
            let (next, actions) = NavigationGuardMachine::transition(state, event);
            debug!(from = ?from, to = ?next, event = event_name, "guard transition");
            state = next;

            for action in actions {
                match action {
                    GuardAction::PromptDiscard { target } => {
                        let prompt = ConfirmPrompt::DiscardUnsavedChanges {
                            current_title: self.current_title().await,
                            target_title: target.title.clone(),
                        };
                        if self.confirm.confirm(&prompt).await {
                            pending.push(GuardEvent::DiscardConfirmed { target });
                        } else {
                            info!(snippet_id = %target.id, "discard declined, keeping draft");
                            outcome = SelectOutcome::Declined;
                            pending.push(GuardEvent::DiscardDeclined);
                        }
                    }
                    GuardAction::FetchAuthoritative { target } => {
                        ticket = self.session.issue_ticket().await;
                        used_fallback = false;
                        match self.store.get(&target.id).await {
                            Ok(snippet) => {
                                pending.push(GuardEvent::AuthoritativeFetched { snippet })
                            }
                            Err(err) => {
                                warn!(
                                    snippet_id = %target.id,
                                    error = %err,
                                    "authoritative fetch failed, using list copy"
                                );
                                used_fallback = true;
                                pending.push(GuardEvent::AuthoritativeFetchFailed {
                                    fallback: target,
                                });
                            }
                        }
                    }
                    GuardAction::LoadDraft { snippet } => {
                        match self.session.load_for_ticket(ticket, snippet.clone()).await {
                            TicketLoad::Loaded => {
                                outcome = SelectOutcome::Loaded {
                                    fallback: used_fallback,
                                }
                            }
                            TicketLoad::Superseded => outcome = SelectOutcome::Superseded,
                            TicketLoad::EditedMeanwhile => {
                                pending.push(GuardEvent::EditedDuringFetch { target: snippet })
                            }
                        }
                    }
                    GuardAction::ClearSelection { id } => {
                        if self.session.clear_if(&id).await {
                            debug!(snippet_id = %id, "selection cleared");
                        }
                    }
                }
            }
        }

        outcome
    }

    async fn current_title(&self) -> String {
        self.session
            .snapshot()
            .await
            .map(|d| d.title().to_string())
            .unwrap_or_default()
    }
}

fn event_label(event: &GuardEvent) -> &'static str {
    match event {
        GuardEvent::SelectRequested { .. } => "select_requested",
        GuardEvent::DiscardConfirmed { .. } => "discard_confirmed",
        GuardEvent::DiscardDeclined => "discard_declined",
        GuardEvent::AuthoritativeFetched { .. } => "authoritative_fetched",
        GuardEvent::AuthoritativeFetchFailed { .. } => "authoritative_fetch_failed",
        GuardEvent::EditedDuringFetch { .. } => "edited_during_fetch",
        GuardEvent::Saved { .. } => "saved",
        GuardEvent::Deleted { .. } => "deleted",
    }
}
