use std::convert::Infallible;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing::Instrument;
use tracing::Level;
use tracing::Span;

use crate::backend::Backend;
use crate::base::Liveness;
use crate::config::Config;
use crate::core::io::api_message::APIMessage;
use crate::core::io::callback::ResponseCallback;
use crate::core::io::notification::Notification;
use crate::errors::Fatal;
use crate::errors::PollError;
use crate::errors::Suppressed;
use crate::guard::VoteGuard;
use crate::poll::OptionKey;
use crate::poll::PollId;
use crate::poll::PollSnapshot;
use crate::state::ViewState;
use crate::storage::LockStorage;
use crate::storage::LockStorageExt;
use crate::view::VoteOutcome;

/// The core type owning the state of a poll view.
pub struct Core<B, S>
where
    B: Backend,
    S: LockStorage,
{
    /// This view's runtime config.
    pub(crate) config: Arc<Config>,

    /// The [`Backend`] implementation.
    pub(crate) backend: B,

    /// The [`LockStorage`] implementation holding vote locks.
    pub(crate) lock_store: S,

    /// The last snapshot received, replaced wholesale by every response.
    pub(crate) snapshot: Option<PollSnapshot>,

    pub(crate) guard: VoteGuard,

    /// The poll id for which `guard` was loaded from `lock_store`.
    pub(crate) guard_poll_id: Option<PollId>,

    pub(crate) vote_in_flight: bool,

    pub(crate) last_error: Option<PollError>,

    pub(crate) fetch_succeeded: u64,
    pub(crate) fetch_failed: u64,
    pub(crate) votes_sent: u64,

    /// Cleared when the core quits; checked by every [`ResponseCallback`].
    pub(crate) liveness: Liveness,

    pub(crate) rx_api: mpsc::UnboundedReceiver<APIMessage>,

    /// A Sender to send responses of spawned requests back to [`Core`].
    pub(crate) tx_notification: mpsc::UnboundedSender<Notification>,

    /// A Receiver to receive ticks and responses.
    pub(crate) rx_notification: mpsc::UnboundedReceiver<Notification>,

    pub(crate) tx_state: watch::Sender<ViewState>,

    pub(crate) span: Span,
}

impl<B, S> Core<B, S>
where
    B: Backend,
    S: LockStorage,
{
    /// The main loop of a poll view.
    pub(crate) async fn main(mut self) -> Result<Infallible, Fatal> {
        debug!("poll view core started, config: {:?}", self.config);

        self.report_state();

        // Load once at start, then on every tick.
        self.fetch();

        let span = tracing::span!(parent: &self.span, Level::DEBUG, "main");
        let res = self.runtime_loop().instrument(span).await;

        self.liveness.kill();

        let err = match res {
            Ok(never) => match never {},
            Err(e) => e,
        };

        match err {
            Fatal::Stopped => { /* Normal quit */ }
            _ => {
                error!(error = display(&err), "quit Core::main on error");
            }
        }

        debug!("update the state for shutdown");
        {
            let mut curr = self.tx_state.borrow().clone();
            curr.running_state = Err(err.clone());

            let _ = self.tx_state.send(curr);
        }

        info!("Core shutdown complete");

        Err(err)
    }

    /// Publish the current state to watchers.
    pub(crate) fn report_state(&mut self) {
        let s = ViewState {
            running_state: Ok(()),
            snapshot: self.snapshot.clone(),
            guard: self.guard.clone(),
            vote_in_flight: self.vote_in_flight,
            last_error: self.last_error.clone(),
            fetch_succeeded: self.fetch_succeeded,
            fetch_failed: self.fetch_failed,
            votes_sent: self.votes_sent,
        };

        debug!("report_state: {}", s);

        self.tx_state.send_if_modified(|curr| {
            if *curr == s {
                return false;
            }
            *curr = s;
            true
        });
    }

    /// Run an event handling loop
    ///
    /// It always returns a [`Fatal`] error upon returning.
    #[tracing::instrument(level = "debug", skip_all)]
    async fn runtime_loop(&mut self) -> Result<Infallible, Fatal> {
        loop {
            self.report_state();

            debug!("runtime_loop: wait for next event");

            futures::select_biased! {
                notify_res = self.rx_notification.recv().fuse() => {
                    match notify_res {
                        Some(notify) => self.handle_notification(notify).await,
                        None => {
                            error!("all rx_notification senders are dropped");
                            return Err(Fatal::Stopped);
                        }
                    };
                }

                msg_res = self.rx_api.recv().fuse() => {
                    match msg_res {
                        Some(msg) => self.handle_api_msg(msg)?,
                        None => {
                            info!("all rx_api senders are dropped");
                            return Err(Fatal::Stopped);
                        }
                    };
                }
            }
        }
    }

    fn handle_api_msg(&mut self, msg: APIMessage) -> Result<(), Fatal> {
        debug!("recv from rx_api: {}", msg);

        match msg {
            APIMessage::Refresh => {
                self.fetch();
            }
            APIMessage::Vote { option_key, tx } => {
                self.vote(option_key, tx);
            }
            APIMessage::Shutdown => {
                info!("received Shutdown");
                return Err(Fatal::Stopped);
            }
        }
        Ok(())
    }

    pub(crate) async fn handle_notification(&mut self, notify: Notification) {
        debug!("recv from rx_notification: {}", notify);

        // Queued before teardown; a dropped vote `tx` reads as `Stopped`.
        if !self.liveness.is_alive() {
            info!("view is torn down, discard: {}", notify);
            return;
        }

        match notify {
            Notification::Tick { i } => {
                debug!("received tick: {}", i);
                self.fetch();
            }

            Notification::Fetched { result } => match result {
                Ok(snapshot) => {
                    self.apply_fetched(snapshot).await;
                }
                Err(e) => {
                    // Keep the previous snapshot.
                    warn!("fetch latest poll failed: {}", e);
                    self.fetch_failed += 1;
                    self.last_error = Some(e);
                }
            },

            Notification::Voted {
                poll_id,
                option_key,
                result,
                tx,
            } => {
                self.vote_in_flight = false;

                let outcome = match result {
                    Ok(snapshot) => {
                        self.apply_voted(poll_id, option_key, snapshot.clone())
                            .await;
                        VoteOutcome::Voted(snapshot)
                    }
                    Err(e) => {
                        warn!(
                            "vote {}/{} failed, state untouched: {}",
                            poll_id, option_key, e
                        );
                        VoteOutcome::Failed(e)
                    }
                };

                // The caller must observe the new state once it has the
                // outcome.
                self.report_state();

                if tx.send(outcome).is_err() {
                    debug!("vote caller is gone, drop the outcome");
                }
            }
        }
    }

    /// Spawn a fetch of the latest poll.
    fn fetch(&mut self) {
        let callback = ResponseCallback::new(
            self.liveness.clone(),
            self.tx_notification.downgrade(),
        );

        let mut backend = self.backend.clone();
        let fu = async move {
            let result = backend.latest().await;
            callback.deliver(Notification::Fetched { result });
        };

        let _ = tokio::spawn(fu.instrument(tracing::debug_span!("fetch")));
    }

    async fn apply_fetched(&mut self, snapshot: PollSnapshot) {
        info!("fetched: {}", snapshot);

        if self.guard_poll_id.as_ref() != Some(&snapshot.id) {
            self.load_guard(&snapshot.id).await;
        }

        self.snapshot = Some(snapshot);
        self.fetch_succeeded += 1;
        self.last_error = None;
    }

    /// Rehydrate the guard from the vote lock of `poll_id`.
    ///
    /// If the lock can not be read, `guard_poll_id` is left unset: votes are
    /// suppressed and reloading is retried on the next fetch.
    async fn load_guard(&mut self, poll_id: &str) {
        match self.lock_store.read_vote_lock(poll_id).await {
            Ok(lock) => {
                self.guard = VoteGuard::from_lock(lock);
                self.guard_poll_id = Some(poll_id.to_string());
                info!("loaded guard for poll {}: {}", poll_id, self.guard);
            }
            Err(e) => {
                error!("failed to read vote lock of poll {}: {}", poll_id, e);
                self.guard = VoteGuard::Unvoted;
                self.guard_poll_id = None;
            }
        }
    }

    /// Check whether a vote for `option_key` may be sent now.
    fn check_vote(&self, option_key: &str) -> Result<PollId, Suppressed> {
        if let Some(voted) = self.guard.voted_for() {
            return Err(Suppressed::AlreadyVoted(voted.to_string()));
        }

        let Some(snapshot) = &self.snapshot else {
            return Err(Suppressed::NotLoaded);
        };

        if self.guard_poll_id.as_ref() != Some(&snapshot.id) {
            return Err(Suppressed::LockUnavailable);
        }

        if self.vote_in_flight {
            return Err(Suppressed::InFlight);
        }

        if !snapshot.contains_option(option_key) {
            return Err(Suppressed::UnknownOption(option_key.to_string()));
        }

        Ok(snapshot.id.clone())
    }

    fn vote(&mut self, option_key: OptionKey, tx: oneshot::Sender<VoteOutcome>) {
        let poll_id = match self.check_vote(&option_key) {
            Ok(poll_id) => poll_id,
            Err(suppressed) => {
                info!("vote {} suppressed: {}", option_key, suppressed);
                let _ = tx.send(VoteOutcome::Suppressed(suppressed));
                return;
            }
        };

        info!("send vote {}/{}", poll_id, option_key);

        self.vote_in_flight = true;
        self.votes_sent += 1;

        let callback = ResponseCallback::new(
            self.liveness.clone(),
            self.tx_notification.downgrade(),
        );

        let mut backend = self.backend.clone();
        let fu = async move {
            let result = backend.vote(&poll_id, &option_key).await;
            callback.deliver(Notification::Voted {
                poll_id,
                option_key,
                result,
                tx,
            });
        };

        let _ = tokio::spawn(fu.instrument(tracing::debug_span!("vote")));
    }

    /// Apply an accepted vote: replace the snapshot, lock the guard and
    /// persist the lock.
    async fn apply_voted(
        &mut self,
        poll_id: PollId,
        option_key: OptionKey,
        snapshot: PollSnapshot,
    ) {
        info!("vote {}/{} accepted: {}", poll_id, option_key, snapshot);

        self.snapshot = Some(snapshot);

        if self.guard_poll_id.as_ref() != Some(&poll_id) {
            // A fetch switched to another poll while this vote was in
            // flight; the guard belongs to the poll voted on.
            self.guard = VoteGuard::Unvoted;
            self.guard_poll_id = Some(poll_id.clone());
        }

        if !self.guard.accept_vote(&option_key) {
            warn!(
                "guard is already {}, keep it; accepted vote: {}",
                self.guard, option_key
            );
        }

        match self.lock_store.write_vote_lock(&poll_id, &option_key).await {
            Ok(true) => {
                debug!("vote lock persisted: {}={}", poll_id, option_key);
            }
            Ok(false) => {
                warn!("vote lock of poll {} already exists, keep it", poll_id);
            }
            Err(e) => {
                error!(
                    "failed to persist vote lock {}={}: {}",
                    poll_id, option_key, e
                );
            }
        }
    }
}
