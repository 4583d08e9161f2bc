use std::fmt;

use crate::errors::Fatal;
use crate::errors::PollError;
use crate::guard::VoteGuard;
use crate::poll::PollSnapshot;
use crate::render::render_view;
use crate::render::FailurePolicy;
use crate::render::Rendered;

/// A set of values describing the current state of a poll view.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct ViewState {
    pub running_state: Result<(), Fatal>,

    /// The last snapshot received, from a fetch or a vote response.
    pub snapshot: Option<PollSnapshot>,

    /// The vote guard of the poll in `snapshot`.
    pub guard: VoteGuard,

    /// Whether a vote request is waiting for its response.
    pub vote_in_flight: bool,

    /// The error of the most recent fetch; `None` once a fetch succeeds.
    pub last_error: Option<PollError>,

    /// Number of successful fetches.
    pub fetch_succeeded: u64,

    /// Number of failed fetches.
    pub fetch_failed: u64,

    /// Number of vote requests sent to the poll service.
    pub votes_sent: u64,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewState{{")?;

        match &self.snapshot {
            Some(s) => write!(f, "snapshot:{}", s)?,
            None => write!(f, "snapshot:None")?,
        }

        write!(
            f,
            ", guard:{}, fetch:{}/{}, votes_sent:{}",
            self.guard, self.fetch_succeeded, self.fetch_failed, self.votes_sent
        )?;

        if self.vote_in_flight {
            write!(f, ", vote_in_flight")?;
        }

        if let Some(e) = &self.last_error {
            write!(f, ", last_error:{}", e)?;
        }

        write!(f, "}}")
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new_initial()
    }
}

impl ViewState {
    pub fn new_initial() -> Self {
        Self {
            running_state: Ok(()),
            snapshot: None,
            guard: VoteGuard::Unvoted,
            vote_in_flight: false,
            last_error: None,
            fetch_succeeded: 0,
            fetch_failed: 0,
            votes_sent: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn render(&self, policy: FailurePolicy) -> Rendered {
        render_view(self, policy)
    }
}
