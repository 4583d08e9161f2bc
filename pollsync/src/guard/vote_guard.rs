use std::fmt;

use crate::poll::OptionKey;

/// Whether this client has voted on a poll, and for which option.
///
/// ```text
/// Unvoted ---vote accepted by server for k---> Voted(k)
/// ```
///
/// `Voted` is terminal: there is no way back to `Unvoted` and no way to
/// change the voted option. A guard starts at `Voted` when the durable vote
/// lock already holds an entry for the poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum VoteGuard {
    #[default]
    Unvoted,
    Voted(OptionKey),
}

impl fmt::Display for VoteGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteGuard::Unvoted => write!(f, "Unvoted"),
            VoteGuard::Voted(key) => write!(f, "Voted({})", key),
        }
    }
}

impl VoteGuard {
    /// Build the initial guard from what the vote lock holds for a poll.
    pub fn from_lock(lock: Option<OptionKey>) -> Self {
        match lock {
            Some(key) => VoteGuard::Voted(key),
            None => VoteGuard::Unvoted,
        }
    }

    /// A vote may be cast only while unvoted.
    pub fn can_vote(&self) -> bool {
        matches!(self, VoteGuard::Unvoted)
    }

    pub fn voted_for(&self) -> Option<&str> {
        match self {
            VoteGuard::Unvoted => None,
            VoteGuard::Voted(key) => Some(key),
        }
    }

    /// Whether the button of option `key` is shown as this client's vote.
    pub fn is_voted_for(&self, key: &str) -> bool {
        self.voted_for() == Some(key)
    }

    /// Fire `Unvoted -> Voted(key)` after the server accepted a vote.
    ///
    /// Returns `false` and keeps the state if already voted.
    pub fn accept_vote(&mut self, key: impl ToString) -> bool {
        if !self.can_vote() {
            return false;
        }
        *self = VoteGuard::Voted(key.to_string());
        true
    }
}
