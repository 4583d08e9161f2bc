use std::fmt;

use crate::errors::PollError;
use crate::errors::Suppressed;
use crate::poll::PollSnapshot;

/// The result of [`PollView::vote()`](crate::PollView::vote).
///
/// Neither a suppressed nor a failed vote changes the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The poll service accepted the vote; this is the snapshot it returned.
    Voted(PollSnapshot),

    /// No request was sent.
    Suppressed(Suppressed),

    /// The request was sent but did not succeed.
    Failed(PollError),
}

impl fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteOutcome::Voted(s) => write!(f, "Voted: {}", s),
            VoteOutcome::Suppressed(s) => write!(f, "Suppressed: {}", s),
            VoteOutcome::Failed(e) => write!(f, "Failed: {}", e),
        }
    }
}

impl VoteOutcome {
    pub fn is_voted(&self) -> bool {
        matches!(self, VoteOutcome::Voted(_))
    }
}
