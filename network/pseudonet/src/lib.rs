//! A poll service living in the same process.
//!
//! [`DirectBackend`] keeps its polls in memory and answers the way the HTTP
//! poll service does, status codes included. It also lets a test take the
//! service offline, fail or delay requests, and count what was sent.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use pollsync::errors::NetworkError;
use pollsync::errors::PollError;
use pollsync::errors::Rejected;
use pollsync::Backend;
use pollsync::NewPoll;
use pollsync::PollSnapshot;
use tracing::debug;
use tracing::info;

/// Number of requests received, per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub latest: u64,
    pub vote: u64,
    pub create: u64,
}

#[derive(Debug, Default)]
struct Server {
    /// Polls in creation order; the last one is the latest.
    polls: Vec<PollSnapshot>,
    next_id: u64,

    offline: bool,
    failures: VecDeque<PollError>,
    delay: Option<Duration>,

    counts: RequestCounts,
}

/// An in-memory poll service implementing the [`Backend`] trait.
///
/// Clones share the same server.
#[derive(Debug, Clone, Default)]
pub struct DirectBackend {
    server: Arc<Mutex<Server>>,
}

impl DirectBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn server(&self) -> MutexGuard<'_, Server> {
        self.server.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Install a poll as the latest one, replacing a poll with the same id.
    pub fn add_poll(&self, poll: PollSnapshot) {
        let mut s = self.server();
        s.polls.retain(|p| p.id != poll.id);
        info!("DirectBackend::add_poll: {}", poll);
        s.polls.push(poll);
    }

    /// The server side copy of a poll.
    pub fn get_poll(&self, poll_id: &str) -> Option<PollSnapshot> {
        let s = self.server();
        s.polls.iter().find(|p| p.id == poll_id).cloned()
    }

    /// Add `n` votes on behalf of other clients.
    pub fn add_votes(&self, poll_id: &str, option_key: &str, n: u64) -> bool {
        let mut s = self.server();
        let opt = s
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .and_then(|p| p.options.get_mut(option_key));

        match opt {
            Some(opt) => {
                opt.votes += n;
                true
            }
            None => false,
        }
    }

    /// While offline every request fails with a network error.
    pub fn set_offline(&self, offline: bool) {
        info!("DirectBackend::set_offline: {}", offline);
        self.server().offline = offline;
    }

    /// Fail the next request, whichever endpoint it goes to, with `err`.
    ///
    /// Queued errors are consumed one per request.
    pub fn fail_next(&self, err: impl Into<PollError>) {
        self.server().failures.push_back(err.into());
    }

    /// Delay every response by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.server().delay = delay;
    }

    pub fn request_counts(&self) -> RequestCounts {
        self.server().counts
    }

    /// Wait for the configured delay, then check the injected faults.
    async fn respond(&self) -> Result<(), PollError> {
        let delay = self.server().delay;
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        let mut s = self.server();
        if s.offline {
            return Err(NetworkError::from_message("connection refused").into());
        }
        if let Some(err) = s.failures.pop_front() {
            debug!("DirectBackend: injected failure: {}", err);
            return Err(err);
        }
        Ok(())
    }
}

impl Backend for DirectBackend {
    async fn latest(&mut self) -> Result<PollSnapshot, PollError> {
        self.server().counts.latest += 1;
        self.respond().await?;

        let s = self.server();
        let Some(poll) = s.polls.last() else {
            return Err(Rejected::new(404, "no polls").into());
        };

        debug!("DirectBackend::latest: {}", poll);
        Ok(poll.clone())
    }

    async fn vote(
        &mut self,
        poll_id: &str,
        option_key: &str,
    ) -> Result<PollSnapshot, PollError> {
        self.server().counts.vote += 1;
        self.respond().await?;

        let mut s = self.server();
        let Some(poll) = s.polls.iter_mut().find(|p| p.id == poll_id) else {
            return Err(Rejected::new(404, "poll not found").into());
        };

        let Some(opt) = poll.options.get_mut(option_key) else {
            return Err(Rejected::new(404, "option not found").into());
        };
        opt.votes += 1;

        info!("DirectBackend::vote: {}/{}: {}", poll_id, option_key, poll);
        Ok(poll.clone())
    }

    async fn create(
        &mut self,
        poll: &NewPoll,
    ) -> Result<PollSnapshot, PollError> {
        self.server().counts.create += 1;
        self.respond().await?;

        if poll.options.len() < 2 {
            return Err(Rejected::new(400, "at least 2 options").into());
        }

        let mut s = self.server();
        s.next_id += 1;

        let created = poll.options.iter().fold(
            PollSnapshot::new(format!("poll-{}", s.next_id), &poll.question),
            |acc, label| acc.with_option(label, label, 0),
        );
        s.polls.push(created.clone());

        info!("DirectBackend::create: {}", created);
        Ok(created)
    }
}
