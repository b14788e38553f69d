//! Editing session domain: the draft value object, its dirty rule, the raw
//! projection and the navigation guard transition table.

mod draft;
mod guard;
mod raw_view;

pub use draft::{compute_dirty, DeferredFields, Draft};
pub use guard::{GuardAction, GuardEvent, GuardState, NavigationGuardMachine};
pub use raw_view::render_raw;
