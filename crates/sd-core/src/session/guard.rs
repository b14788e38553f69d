//! Navigation guard.
//!
//! Pure transition function deciding whether a selection change may proceed
//! without losing unsaved title/body/language edits.

use crate::ids::SnippetId;
use crate::snippet::Snippet;

/// Guard state, derived from the draft's dirty flag.
///
/// 守卫状态，由草稿的脏标记推导。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Selection changes proceed directly.
    ///
    /// 可直接切换。
    Clean,
    /// Selection changes must be confirmed.
    ///
    /// 切换前需要确认。
    Dirty,
}

impl GuardState {
    pub fn from_dirty(is_dirty: bool) -> Self {
        if is_dirty {
            GuardState::Dirty
        } else {
            GuardState::Clean
        }
    }
}

/// Events that drive the guard.
///
/// 驱动守卫的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEvent {
    /// User picked another snippet (the list copy).
    SelectRequested { target: Snippet },
    /// User accepted discarding unsaved edits.
    DiscardConfirmed { target: Snippet },
    /// User kept the current draft.
    DiscardDeclined,
    /// Store returned the authoritative copy of the target.
    AuthoritativeFetched { snippet: Snippet },
    /// Store fetch failed; the list copy is used instead.
    AuthoritativeFetchFailed { fallback: Snippet },
    /// The draft was edited while the fetch for `target` was in flight.
    EditedDuringFetch { target: Snippet },
    /// A save finished; edits made meanwhile may keep the draft dirty.
    Saved { still_dirty: bool },
    /// The snippet was removed from the store.
    Deleted { id: SnippetId },
}

/// Side-effects produced by guard transitions.
///
/// 守卫迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// Ask whether unsaved edits may be discarded in favour of `target`.
    PromptDiscard { target: Snippet },
    /// Re-read `target` by id from the store.
    FetchAuthoritative { target: Snippet },
    /// Replace the draft wholesale.
    LoadDraft { snippet: Snippet },
    /// Drop the draft if it is still `id`.
    ClearSelection { id: SnippetId },
}

/// Pure navigation guard state machine.
///
/// 纯状态机：不包含副作用。
pub struct NavigationGuardMachine;

impl NavigationGuardMachine {
    pub fn transition(state: GuardState, event: GuardEvent) -> (GuardState, Vec<GuardAction>) {
        match (state, event) {
            (GuardState::Clean, GuardEvent::SelectRequested { target }) => (
                GuardState::Clean,
                vec![GuardAction::FetchAuthoritative { target }],
            ),
            (GuardState::Dirty, GuardEvent::SelectRequested { target }) => (
                GuardState::Dirty,
                vec![GuardAction::PromptDiscard { target }],
            ),
            (GuardState::Dirty, GuardEvent::DiscardConfirmed { target }) => (
                GuardState::Dirty,
                vec![GuardAction::FetchAuthoritative { target }],
            ),
            (GuardState::Dirty, GuardEvent::DiscardDeclined) => (GuardState::Dirty, Vec::new()),
            (_, GuardEvent::AuthoritativeFetched { snippet }) => {
                (GuardState::Clean, vec![GuardAction::LoadDraft { snippet }])
            }
            (_, GuardEvent::AuthoritativeFetchFailed { fallback }) => (
                GuardState::Clean,
                vec![GuardAction::LoadDraft { snippet: fallback }],
            ),
            (_, GuardEvent::EditedDuringFetch { target }) => (
                GuardState::Dirty,
                vec![GuardAction::PromptDiscard { target }],
            ),
            (_, GuardEvent::Saved { still_dirty }) => {
                (GuardState::from_dirty(still_dirty), Vec::new())
            }
            (_, GuardEvent::Deleted { id }) => {
                (GuardState::Clean, vec![GuardAction::ClearSelection { id }])
            }
            (state, _event) => (state, Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GuardAction, GuardEvent, GuardState, NavigationGuardMachine};
    use crate::ids::SnippetId;
use crate::snippet::Snippet;
    use chrono::Utc;

    fn target() -> Snippet {
        Snippet::new("B", Utc::now())
    }

    #[test]
    fn guard_clean_select_fetches_without_prompt() {
        let b = target();
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Clean,
            GuardEvent::SelectRequested { target: b.clone() },
        );
        assert_eq!(next, GuardState::Clean);
        assert_eq!(actions, vec![GuardAction::FetchAuthoritative { target: b }]);
    }

    #[test]
    fn guard_dirty_select_prompts() {
        let b = target();
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Dirty,
            GuardEvent::SelectRequested { target: b.clone() },
        );
        assert_eq!(next, GuardState::Dirty);
        assert_eq!(actions, vec![GuardAction::PromptDiscard { target: b }]);
    }

    #[test]
    fn guard_dirty_confirm_fetches_and_decline_does_nothing() {
        let b = target();
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Dirty,
            GuardEvent::DiscardConfirmed { target: b.clone() },
        );
        assert_eq!(next, GuardState::Dirty);
        assert_eq!(actions, vec![GuardAction::FetchAuthoritative { target: b }]);

        let (next, actions) =
            NavigationGuardMachine::transition(GuardState::Dirty, GuardEvent::DiscardDeclined);
        assert_eq!(next, GuardState::Dirty);
        assert!(actions.is_empty());
    }

    #[test]
    fn guard_fetch_result_or_fallback_loads_clean_draft() {
        let b = target();
        for state in [GuardState::Clean, GuardState::Dirty] {
            let (next, actions) = NavigationGuardMachine::transition(
                state,
                GuardEvent::AuthoritativeFetched { snippet: b.clone() },
            );
            assert_eq!(next, GuardState::Clean);
            assert_eq!(actions, vec![GuardAction::LoadDraft { snippet: b.clone() }]);

            let (next, actions) = NavigationGuardMachine::transition(
                state,
                GuardEvent::AuthoritativeFetchFailed { fallback: b.clone() },
            );
            assert_eq!(next, GuardState::Clean);
            assert_eq!(actions, vec![GuardAction::LoadDraft { snippet: b.clone() }]);
        }
    }

    #[test]
    fn guard_saved_and_deleted() {
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Dirty,
            GuardEvent::Saved { still_dirty: false },
        );
        assert_eq!(next, GuardState::Clean);
        assert!(actions.is_empty());

        let (next, _) = NavigationGuardMachine::transition(
            GuardState::Dirty,
            GuardEvent::Saved { still_dirty: true },
        );
        assert_eq!(next, GuardState::Dirty);

        let id = target().id;
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Dirty,
            GuardEvent::Deleted { id: id.clone() },
        );
        assert_eq!(next, GuardState::Clean);
        assert_eq!(actions, vec![GuardAction::ClearSelection { id }]);
    }

    #[test]
    fn guard_edit_during_fetch_prompts_again() {
        let b = target();
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Clean,
            GuardEvent::EditedDuringFetch { target: b.clone() },
        );
        assert_eq!(next, GuardState::Dirty);
        assert_eq!(actions, vec![GuardAction::PromptDiscard { target: b }]);
    }

    #[test]
    fn guard_ignores_unexpected_events() {
        let b = target();
        let (next, actions) = NavigationGuardMachine::transition(
            GuardState::Clean,
            GuardEvent::DiscardConfirmed { target: b },
        );
        assert_eq!(next, GuardState::Clean);
        assert!(actions.is_empty());

        let (next, actions) =
            NavigationGuardMachine::transition(GuardState::Clean, GuardEvent::DiscardDeclined);
        assert_eq!(next, GuardState::Clean);
        assert!(actions.is_empty());
    }
}
