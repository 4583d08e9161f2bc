use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::info;

use crate::base::Liveness;
use crate::config::Config;
use crate::core::core_state::CoreState;
use crate::core::io::api_message::APIMessage;
use crate::core::TickHandle;
use crate::errors::Fatal;
use crate::state::ViewState;

/// Everything a [`PollView`](crate::PollView) clone shares: the channels to
/// `Core` and the task handles.
pub(in crate::view) struct PollViewInner {
    pub(in crate::view) config: Arc<Config>,
    pub(in crate::view) liveness: Liveness,
    pub(in crate::view) tick_handle: TickHandle,
    pub(in crate::view) tx_api: mpsc::UnboundedSender<APIMessage>,
    pub(in crate::view) rx_state: watch::Receiver<ViewState>,

    /// Held across the join, so concurrent callers queue up behind the one
    /// joining and then read the `Done` result.
    pub(in crate::view) core_state: Mutex<CoreState>,
}

impl PollViewInner {
    /// Hand `msg` to `Core`, or return why `Core` is gone.
    pub(in crate::view) async fn send_msg(
        &self,
        msg: APIMessage,
    ) -> Result<(), Fatal> {
        if let Err(e) = self.tx_api.send(msg) {
            info!("Core is gone, can not deliver: {}", e.0);
            return Err(self.core_stopped().await);
        }
        Ok(())
    }

    /// Send `msg` and wait for `Core` to answer on `rx`.
    #[tracing::instrument(level = "debug", skip_all, fields(msg = %msg))]
    pub(in crate::view) async fn call_core<T>(
        &self,
        msg: APIMessage,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, Fatal> {
        self.send_msg(msg).await?;

        match rx.await {
            Ok(x) => Ok(x),
            Err(_) => {
                let fatal = self.core_stopped().await;
                debug!("Core quit before answering: {}", fatal);
                Err(fatal)
            }
        }
    }

    /// `true` until the Core task has been joined. A join in progress counts
    /// as running.
    pub(in crate::view) fn is_core_running(&self) -> bool {
        match self.core_state.try_lock() {
            Ok(state) => state.is_running(),
            Err(_) => true,
        }
    }

    /// Wait for the Core task to quit and return why it did.
    pub(in crate::view) async fn core_stopped(&self) -> Fatal {
        let mut state = self.core_state.lock().await;

        let fatal = match &mut *state {
            CoreState::Done(fatal) => return fatal.clone(),
            CoreState::Running(handle) => match handle.await {
                Ok(Ok(never)) => match never {},
                Ok(Err(fatal)) => fatal,
                Err(e) if e.is_panic() => Fatal::Panicked,
                Err(_) => Fatal::Stopped,
            },
        };

        info!("Core joined: {}", fatal);
        *state = CoreState::Done(fatal.clone());
        fatal
    }
}
