use std::fmt;

use tokio::sync::oneshot;

use crate::poll::OptionKey;
use crate::view::VoteOutcome;

/// A message sent by application to the [`Core`].
///
/// [`Core`]: crate::core::core::Core
pub(crate) enum APIMessage {
    /// Fetch the latest poll now, outside the tick cadence.
    Refresh,

    Vote {
        option_key: OptionKey,
        tx: oneshot::Sender<VoteOutcome>,
    },

    /// Stop the core.
    Shutdown,
}

impl fmt::Display for APIMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            APIMessage::Refresh => {
                write!(f, "Refresh")
            }
            APIMessage::Vote { option_key, .. } => {
                write!(f, "Vote: {}", option_key)
            }
            APIMessage::Shutdown => {
                write!(f, "Shutdown")
            }
        }
    }
}
