use core::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::guard::VoteGuard;
use crate::state::ViewState;

// Error variants related to waiting on view state.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("timeout after {0:?} when {1}")]
    Timeout(Duration, String),

    #[error("poll view is shutting down")]
    ShuttingDown,
}

/// Wait is a wrapper of the [`ViewState`] channel that impls several utils
/// to wait for the state to satisfy some condition.
pub struct Wait {
    pub timeout: Duration,
    pub rx: watch::Receiver<ViewState>,
}

impl Wait {
    /// Wait for the state to satisfy some condition or timeout.
    #[tracing::instrument(level = "trace", skip(self, func), fields(msg=%msg.to_string()))]
    pub async fn state<T>(
        &self,
        func: T,
        msg: impl ToString,
    ) -> Result<ViewState, WaitError>
    where
        T: Fn(&ViewState) -> bool + Send,
    {
        let timeout_at = Instant::now() + self.timeout;

        let mut rx = self.rx.clone();
        loop {
            let latest = rx.borrow_and_update().clone();

            tracing::debug!("wait {:} latest: {}", msg.to_string(), latest);

            if func(&latest) {
                tracing::debug!(
                    "done wait {:} latest: {}",
                    msg.to_string(),
                    latest
                );
                return Ok(latest);
            }

            let now = Instant::now();
            if now >= timeout_at {
                return Err(WaitError::Timeout(
                    self.timeout,
                    format!("{} latest: {}", msg.to_string(), latest),
                ));
            }

            let delay = tokio::time::sleep_until(timeout_at);

            futures::select_biased! {
                _ = delay.fuse() => {
                    tracing::debug!("timeout wait {:} latest: {}", msg.to_string(), latest);
                    return Err(WaitError::Timeout(self.timeout, format!("{} latest: {}", msg.to_string(), latest)));
                }
                changed = rx.changed().fuse() => {
                    match changed {
                        Ok(_) => {
                            // state changed, continue the waiting loop
                        },
                        Err(err) => {
                            tracing::debug!(
                                "error: {:?}; wait {:} latest: {:?}",
                                err,
                                msg.to_string(),
                                latest
                            );

                            return Err(WaitError::ShuttingDown);
                        }
                    }
                }
            };
        }
    }

    /// Wait until a snapshot has been loaded.
    #[tracing::instrument(level = "trace", skip(self), fields(msg=msg.to_string().as_str()))]
    pub async fn loaded(
        &self,
        msg: impl ToString,
    ) -> Result<ViewState, WaitError> {
        self.state(|s| s.is_loaded(), &format!("{} .loaded", msg.to_string()))
            .await
    }

    /// Wait until the snapshot of poll `poll_id` has been loaded.
    #[tracing::instrument(level = "trace", skip(self), fields(msg=msg.to_string().as_str()))]
    pub async fn poll_id(
        &self,
        poll_id: &str,
        msg: impl ToString,
    ) -> Result<ViewState, WaitError> {
        self.state(
            |s| s.snapshot.as_ref().map(|x| x.id.as_str()) == Some(poll_id),
            &format!("{} .snapshot.id == {}", msg.to_string(), poll_id),
        )
        .await
    }

    /// Wait for the guard to become `Voted(option_key)`.
    #[tracing::instrument(level = "trace", skip(self), fields(msg=msg.to_string().as_str()))]
    pub async fn voted(
        &self,
        option_key: &str,
        msg: impl ToString,
    ) -> Result<ViewState, WaitError> {
        let want = VoteGuard::Voted(option_key.to_string());
        self.state(
            |s| s.guard == want,
            &format!("{} .guard == {}", msg.to_string(), want),
        )
        .await
    }

    /// Wait until at least `n` fetches have succeeded.
    #[tracing::instrument(level = "trace", skip(self), fields(msg=msg.to_string().as_str()))]
    pub async fn fetch_succeeded_at_least(
        &self,
        n: u64,
        msg: impl ToString,
    ) -> Result<ViewState, WaitError> {
        self.state(
            |s| s.fetch_succeeded >= n,
            &format!("{} .fetch_succeeded >= {}", msg.to_string(), n),
        )
        .await
    }

    /// Wait until at least `n` fetches have failed.
    #[tracing::instrument(level = "trace", skip(self), fields(msg=msg.to_string().as_str()))]
    pub async fn fetch_failed_at_least(
        &self,
        n: u64,
        msg: impl ToString,
    ) -> Result<ViewState, WaitError> {
        self.state(
            |s| s.fetch_failed >= n,
            &format!("{} .fetch_failed >= {}", msg.to_string(), n),
        )
        .await
    }
}
