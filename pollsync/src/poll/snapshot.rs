use std::collections::BTreeMap;
use std::fmt;

use crate::errors::InvalidSnapshot;
use crate::poll::OptionKey;
use crate::poll::PollId;

/// Label and vote counter of one option.
///
/// `votes` is server-authoritative: the client never increments it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct OptionState {
    pub label: String,
    pub votes: u64,
}

impl OptionState {
    pub fn new(label: impl ToString, votes: u64) -> Self {
        Self {
            label: label.to_string(),
            votes,
        }
    }
}

/// The full server-reported state of a poll at one point in time.
///
/// A view never merges snapshots: each successful fetch or vote response
/// replaces the held one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct PollSnapshot {
    pub id: PollId,
    pub question: String,
    pub options: BTreeMap<OptionKey, OptionState>,
}

impl fmt::Display for PollSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{{", self.id)?;
        for (i, (key, opt)) in self.options.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", key, opt.votes)?;
        }
        write!(f, "}}")
    }
}

impl PollSnapshot {
    pub fn new(id: impl ToString, question: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            question: question.to_string(),
            options: BTreeMap::new(),
        }
    }

    /// Add or replace an option, builder style.
    pub fn with_option(
        mut self,
        key: impl ToString,
        label: impl ToString,
        votes: u64,
    ) -> Self {
        self.options.insert(key.to_string(), OptionState::new(label, votes));
        self
    }

    /// Decode a snapshot from a JSON response body and validate it.
    pub fn from_json(body: &[u8]) -> Result<Self, InvalidSnapshot> {
        let snapshot: PollSnapshot = serde_json::from_slice(body)
            .map_err(|e| InvalidSnapshot::new(e))?;
        snapshot.validate()
    }

    /// Check the invariants of a loaded snapshot: a non-empty id and at least
    /// one option.
    pub fn validate(self) -> Result<Self, InvalidSnapshot> {
        if self.id.is_empty() {
            return Err(InvalidSnapshot::new("empty poll id"));
        }
        if self.options.is_empty() {
            return Err(InvalidSnapshot::new(format!(
                "poll {} has no options",
                self.id
            )));
        }
        Ok(self)
    }

    pub fn contains_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Sum of the vote counters of all options, saturating at `u64::MAX`.
    pub fn total_votes(&self) -> u64 {
        self.options.values().fold(0u64, |acc, o| acc.saturating_add(o.votes))
    }

    /// Share of the votes for `key`, in percent with one decimal.
    ///
    /// Returns `None` if there is no such option.
    pub fn percent(&self, key: &str) -> Option<f64> {
        let opt = self.options.get(key)?;
        Some(percent_of(opt.votes, self.total_votes()))
    }
}

/// `votes / total * 100`, rounded to one decimal; 0 when `total` is 0.
pub fn percent_of(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let tenths = (votes as f64 * 1000.0 / total as f64).round();
    tenths / 10.0
}
