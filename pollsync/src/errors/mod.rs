//! Error types exposed by this crate.

use std::error::Error;

use anyerror::AnyError;

use crate::poll::OptionKey;

/// Fatal is unrecoverable: the view has stopped and accepts no more calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum Fatal {
    #[error("panicked")]
    Panicked,

    /// The view stopped normally.
    #[error("Stopped normally")]
    Stopped,
}

/// A failed request to the poll service.
///
/// A view never lets one of these escape: fetch failures are recorded in
/// [`ViewState`](crate::ViewState) and vote failures are handed back as
/// [`VoteOutcome::Failed`](crate::VoteOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, derive_more::TryInto)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum PollError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Rejected(#[from] Rejected),

    #[error(transparent)]
    InvalidSnapshot(#[from] InvalidSnapshot),
}

/// The request did not complete: connection refused, timeout, reset, etc.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[derive(serde::Deserialize, serde::Serialize)]
#[error("NetworkError: {source}")]
pub struct NetworkError {
    #[from]
    source: AnyError,
}

impl NetworkError {
    pub fn new<E: Error + 'static>(e: &E) -> Self {
        Self {
            source: AnyError::new(e),
        }
    }

    pub fn from_message(msg: impl ToString) -> Self {
        Self {
            source: AnyError::error(msg.to_string()),
        }
    }
}

/// The poll service answered with a non-success status, e.g., 404 for an
/// unknown poll or option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[derive(serde::Deserialize, serde::Serialize)]
#[error("rejected by server: status {status}: {message}")]
pub struct Rejected {
    pub status: u16,
    pub message: String,
}

impl Rejected {
    pub fn new(status: u16, message: impl ToString) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

/// The response could not be understood as a poll snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[derive(serde::Deserialize, serde::Serialize)]
#[error("invalid snapshot: {reason}")]
pub struct InvalidSnapshot {
    pub reason: String,
}

impl InvalidSnapshot {
    pub fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Why a vote was not sent to the poll service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum Suppressed {
    /// This client already voted on the current poll.
    #[error("already voted for {0}")]
    AlreadyVoted(OptionKey),

    /// No poll has been loaded yet.
    #[error("poll is not loaded yet")]
    NotLoaded,

    /// The vote lock of the loaded poll could not be read, so whether this
    /// client already voted is unknown. Reading is retried on the next fetch.
    #[error("vote lock of the poll is not available")]
    LockUnavailable,

    /// Another vote is waiting for its response.
    #[error("another vote is in flight")]
    InFlight,

    #[error("unknown option: {0}")]
    UnknownOption(OptionKey),
}

/// A poll draft that can not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("question can not be empty")]
    EmptyQuestion,

    #[error("option #{index} is empty")]
    EmptyOption { index: usize },

    #[error("option {label:?} appears more than once")]
    DuplicateOption { label: String },
}
