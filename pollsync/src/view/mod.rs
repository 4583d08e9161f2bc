//! Public interface of a poll view.
//!
//! [`PollView`] is the handle an application holds to a running view of the
//! latest poll. The state itself is owned by a single `Core` task; a
//! `PollView` only sends it messages and watches what it publishes.
//!
//! `PollView` is cheap to clone, so several parts of an application can
//! share one view.

mod inner;
mod vote_outcome;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::sync::Mutex;
use tracing::info;
use tracing::trace_span;
use tracing::Instrument;
use tracing::Level;

pub use self::vote_outcome::VoteOutcome;
use crate::backend::Backend;
use crate::base::Liveness;
use crate::config::Config;
use crate::core::core::Core;
use crate::core::core_state::CoreState;
use crate::core::io::api_message::APIMessage;
use crate::core::Tick;
use crate::errors::Fatal;
use crate::guard::VoteGuard;
use crate::render::Rendered;
use crate::state::ViewState;
use crate::state::Wait;
use crate::storage::LockStorage;
use crate::view::inner::PollViewInner;

/// A live view of the latest poll.
///
/// ### Clone
///
/// This type implements `Clone`, and cloning itself is very cheap and helps to
/// facilitate use with async workflows.
///
/// ### Shutting down
///
/// If any of the interfaces returns a [`Fatal`], the view has stopped. Call
/// [`PollView::shutdown()`] to stop it; responses of requests still in flight
/// at that point are dropped.
#[derive(Clone)]
pub struct PollView {
    inner: Arc<PollViewInner>,
}

impl PollView {
    /// Create and spawn a new poll view.
    ///
    /// The view fetches the latest poll at once, then every
    /// `config.poll_interval` while ticking is enabled.
    ///
    /// ### `backend`
    /// An implementation of the [`Backend`] trait, the poll service.
    ///
    /// ### `lock_store`
    /// An implementation of [`LockStorage`] where vote locks are kept. Use a
    /// durable one to keep this client from voting twice across restarts.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new<B, S>(config: Arc<Config>, backend: B, lock_store: S) -> Self
    where
        B: Backend,
        S: LockStorage,
    {
        let (tx_api, rx_api) = mpsc::unbounded_channel();
        let (tx_notify, rx_notify) = mpsc::unbounded_channel();
        let (tx_state, rx_state) = watch::channel(ViewState::new_initial());

        let liveness = Liveness::new();

        let tick_handle = Tick::spawn(
            config.poll_interval(),
            tx_notify.clone(),
            config.enable_tick,
        );

        let core_span = tracing::span!(
            parent: tracing::Span::current(),
            Level::DEBUG,
            "Core",
            api = display(&config.api_url),
        );

        let core: Core<B, S> = Core {
            config: config.clone(),
            backend,
            lock_store,

            snapshot: None,
            guard: VoteGuard::Unvoted,
            guard_poll_id: None,
            vote_in_flight: false,
            last_error: None,

            fetch_succeeded: 0,
            fetch_failed: 0,
            votes_sent: 0,

            liveness: liveness.clone(),

            rx_api,

            tx_notification: tx_notify,
            rx_notification: rx_notify,

            tx_state,

            span: core_span,
        };

        let core_handle = tokio::spawn(
            core.main().instrument(trace_span!("spawn").or_current()),
        );

        let inner = PollViewInner {
            config,
            liveness,
            tick_handle,
            tx_api,
            rx_state,
            core_state: Mutex::new(CoreState::Running(core_handle)),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Return the config of this view.
    pub fn config(&self) -> &Arc<Config> {
        &self.inner.config
    }

    /// Returns `true` until the core task has been joined.
    pub fn is_running(&self) -> bool {
        self.inner.is_core_running()
    }

    /// Fetch the latest poll at once and return at once.
    ///
    /// The result shows up in [`PollView::state()`], not here. Returns error
    /// only when the view has stopped.
    pub async fn refresh(&self) -> Result<(), Fatal> {
        self.inner.send_msg(APIMessage::Refresh).await
    }

    /// Vote for `option_key` in the loaded poll and wait for the outcome.
    ///
    /// The vote goes through the guard first: if this client already voted
    /// for this poll, or the vote can not be sent for another reason, no
    /// request is issued and [`VoteOutcome::Suppressed`] is returned.
    ///
    /// On success the view state holds the snapshot the service returned and
    /// the vote lock is persisted before this returns.
    pub async fn vote(
        &self,
        option_key: impl ToString,
    ) -> Result<VoteOutcome, Fatal> {
        let option_key = option_key.to_string();
        info!("{}: option_key: {}", func_name!(), option_key);

        let (tx, rx) = oneshot::channel();
        self.inner.call_core(APIMessage::Vote { option_key, tx }, rx).await
    }

    /// Get a handle to the state channel.
    pub fn state(&self) -> watch::Receiver<ViewState> {
        self.inner.rx_state.clone()
    }

    /// A copy of the latest published state.
    pub fn current(&self) -> ViewState {
        self.inner.rx_state.borrow().clone()
    }

    /// Render the latest state with the configured failure policy.
    pub fn render(&self) -> Rendered {
        self.current().render(self.inner.config.failure_policy)
    }

    /// Get a handle to wait for the state to satisfy some condition.
    ///
    /// If `timeout` is `None`, then it will wait forever(10 years).
    /// If `timeout` is `Some`, then it will wait for the specified duration.
    ///
    /// ```ignore
    /// # use std::time::Duration;
    ///
    /// let timeout = Duration::from_millis(200);
    ///
    /// // wait for the first poll to load:
    /// view.wait(Some(timeout)).loaded("first load").await?;
    ///
    /// // wait for the vote lock of this client to be restored:
    /// view.wait(None).voted("a", "rehydrate").await?;
    /// ```
    pub fn wait(&self, timeout: Option<Duration>) -> Wait {
        let timeout = match timeout {
            Some(t) => t,
            None => Duration::from_secs(86400 * 365 * 100),
        };
        Wait {
            timeout,
            rx: self.inner.rx_state.clone(),
        }
    }

    /// Enable or disable the periodic fetch.
    pub fn enable_tick(&self, enabled: bool) {
        self.inner.tick_handle.enable(enabled);
    }

    /// Stop the view.
    ///
    /// The timer is stopped and joined first, then the core. Responses that
    /// arrive after this call are discarded. Calling it more than once is
    /// harmless.
    ///
    /// Returns error only if the core quit abnormally.
    pub async fn shutdown(&self) -> Result<(), Fatal> {
        info!("{}: shutting down poll view", func_name!());

        self.inner.liveness.kill();

        if let Some(jh) = self.inner.tick_handle.shutdown() {
            let _ = jh.await;
        }

        if self.inner.tx_api.send(APIMessage::Shutdown).is_err() {
            info!("Core already stopped before Shutdown was sent");
        }

        match self.inner.core_stopped().await {
            Fatal::Stopped => Ok(()),
            other => Err(other),
        }
    }
}
