//! SnipDesk application layer
//!
//! Use cases that drive one editing session: the draft and its two
//! persistence paths, the navigation guard, the list query and the
//! controller composing them.

pub mod usecases;

pub use usecases::{
    CreateSnippet, EditSession, ListQuery, MutationOp, NavigationGuard, SessionController,
    SessionError,
};
