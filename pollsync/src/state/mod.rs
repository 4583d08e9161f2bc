//! Observable state of a poll view.
//!
//! The core task publishes a [`ViewState`] after handling every event, via
//! [`PollView::state()`](`crate::PollView::state`) which returns a
//! `watch::Receiver<ViewState>`.
//!
//! It is not a stream: a receiver only observes the latest state, not every
//! intermediate one, because `watch::channel()` stores only the last value.

mod view_state;
mod wait;

pub use view_state::ViewState;
pub use wait::Wait;
pub use wait::WaitError;
