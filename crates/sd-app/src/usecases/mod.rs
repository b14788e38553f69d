//! Session use cases
//!
//! ListQuery ──(selection)──▶ NavigationGuard ──▶ EditSession::load
//! EditSession mutations ──▶ store ──▶ SessionController (token) ──▶ ListQuery refetch

pub mod create_snippet;
pub mod edit_session;
pub mod error;
pub mod list_query;
pub mod navigation;
pub mod session_controller;

pub use create_snippet::CreateSnippet;
pub use edit_session::{DeleteOutcome, EditSession, MutationOutcome, TicketLoad};
pub use error::{MutationOp, SessionError};
pub use list_query::{FetchOutcome, ListQuery, ListSnapshot};
pub use navigation::{NavigationGuard, SelectOutcome};
pub use session_controller::{Created, SessionController, SessionView};
