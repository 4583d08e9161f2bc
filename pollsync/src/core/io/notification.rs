use std::fmt;

use tokio::sync::oneshot;

use crate::errors::PollError;
use crate::poll::OptionKey;
use crate::poll::PollId;
use crate::poll::PollSnapshot;
use crate::view::VoteOutcome;

/// A message coming from the internal components.
pub(crate) enum Notification {
    /// A fetch of the latest poll completed.
    Fetched {
        result: Result<PollSnapshot, PollError>,
    },

    /// A vote request completed.
    Voted {
        poll_id: PollId,
        option_key: OptionKey,
        result: Result<PollSnapshot, PollError>,

        /// Where to send the outcome to the caller of `vote()`.
        tx: oneshot::Sender<VoteOutcome>,
    },

    /// A tick event to wake up Core to fetch the latest poll.
    Tick {
        /// ith tick
        i: u64,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched { result } => match result {
                Ok(s) => write!(f, "Fetched: {}", s),
                Err(e) => write!(f, "Fetched: error: {}", e),
            },
            Self::Voted {
                poll_id,
                option_key,
                result,
                ..
            } => {
                write!(f, "Voted: {}/{}: ", poll_id, option_key)?;
                match result {
                    Ok(s) => write!(f, "{}", s),
                    Err(e) => write!(f, "error: {}", e),
                }
            }
            Self::Tick { i } => {
                write!(f, "Tick {}", i)
            }
        }
    }
}
