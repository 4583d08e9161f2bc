//! The `Core` owns all state of a poll view.
//!
//! It receives events from the application (refresh, vote, shutdown), from
//! the timer (ticks) and from spawned requests (responses), and handles them
//! one at a time. Requests to the poll service never run inside the core:
//! they are spawned and report back through a [`ResponseCallback`].
//!
//! [`ResponseCallback`]: io::callback::ResponseCallback

#[allow(clippy::module_inception)]
pub(crate) mod core;
pub(crate) mod core_state;
pub(crate) mod io;
mod tick;

pub(crate) use tick::Tick;
pub(crate) use tick::TickHandle;
