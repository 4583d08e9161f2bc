//! The poll service interface.

use openraft_macros::add_async_trait;

use crate::errors::PollError;
use crate::poll::NewPoll;
use crate::poll::PollSnapshot;

/// A client of the poll service.
///
/// The HTTP contract it stands for:
///
/// - `GET /poll/latest` returns the most recently created poll;
/// - `POST /poll/vote/{id}/{optionKey}` applies one vote and returns the poll
///   after the vote;
/// - `POST /poll/create` creates a poll from a [`NewPoll`] body.
///
/// Every non-success status must be reported as
/// [`PollError::Rejected`], and every returned snapshot must have passed
/// [`PollSnapshot::validate`].
///
/// A view clones the backend into each spawned request, so cloning should be
/// cheap, e.g., share the underlying connection pool.
#[add_async_trait]
pub trait Backend: Clone + Send + Sync + 'static {
    /// Read the latest poll.
    async fn latest(&mut self) -> Result<PollSnapshot, PollError>;

    /// Vote for `option_key` on poll `poll_id`.
    async fn vote(
        &mut self,
        poll_id: &str,
        option_key: &str,
    ) -> Result<PollSnapshot, PollError>;

    /// Create a poll; it becomes the latest one.
    async fn create(&mut self, poll: &NewPoll)
        -> Result<PollSnapshot, PollError>;
}
