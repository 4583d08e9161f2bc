//! Poll data as reported by the poll service, and drafts of new polls.

mod draft;
mod snapshot;


pub use draft::NewPoll;
pub use draft::PollDraft;
pub use snapshot::percent_of;
pub use snapshot::OptionState;
pub use snapshot::PollSnapshot;

/// Opaque identifier of a poll, assigned by the poll service.
pub type PollId = String;

/// Key of an option within a poll. Unique within one poll.
pub type OptionKey = String;
