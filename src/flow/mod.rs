//! Turn and phase flow.
//!
//! - `events`: the handle moves and hooks use to request transitions
//! - `phase`: a phase after normalization (hooks wrapped, defaults inherited)
//! - `machine`: the state machine that runs phases and turns

mod events;
mod machine;
mod phase;

pub use events::Events;

pub(crate) use machine::Flow;
pub(crate) use phase::Phase;
