//! Derive what to paint from a snapshot and the vote guard.
//!
//! Rendering is a pure function: the same snapshot and guard always produce
//! the same [`PollRender`]. The text form, via `Display`, is what the
//! terminal front end prints.

mod failure_policy;
#[allow(clippy::module_inception)]
mod render;


pub use failure_policy::FailurePolicy;
pub use failure_policy::FAILURE_MESSAGE;
pub use render::render;
pub use render::render_view;
pub use render::OptionRow;
pub use render::PollRender;
pub use render::Rendered;
pub use render::VoteButton;
pub use render::BAR_WIDTH;
