//! tick emitter emits a `Tick` event to the Core every `interval`.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::Instrument;
use tracing::Level;

use crate::core::io::notification::Notification;

/// Emit Notification::Tick event at regular `interval`.
pub(crate) struct Tick {
    interval: Duration,

    tx: mpsc::UnboundedSender<Notification>,

    /// Emit event or not
    enabled: Arc<AtomicBool>,
}

/// A cancellable handle of the running tick task.
pub(crate) struct TickHandle {
    enabled: Arc<AtomicBool>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    join_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Tick {
    pub(crate) fn spawn(
        interval: Duration,
        tx: mpsc::UnboundedSender<Notification>,
        enabled: bool,
    ) -> TickHandle {
        let enabled = Arc::new(AtomicBool::from(enabled));
        let this = Self {
            interval,
            enabled: enabled.clone(),
            tx,
        };

        let (shutdown, shutdown_rx) = oneshot::channel();

        let shutdown = Mutex::new(Some(shutdown));

        let join_handle = tokio::spawn(
            this.tick_loop(shutdown_rx)
                .instrument(tracing::span!(parent: &tracing::Span::current(), Level::DEBUG, "tick")),
        );

        TickHandle {
            enabled,
            shutdown,
            join_handle: Mutex::new(Some(join_handle)),
        }
    }

    pub(crate) async fn tick_loop(self, mut cancel_rx: oneshot::Receiver<()>) {
        let mut i = 0;

        loop {
            let at = Instant::now() + self.interval;
            let sleep = tokio::time::sleep_until(at);

            tokio::select! {
                _ = sleep => {
                    // tick
                }
                _ = &mut cancel_rx => {
                    tracing::info!("TickLoop received cancel signal, quit");
                    return;
                }
            }

            if !self.enabled.load(Ordering::Relaxed) {
                continue;
            }

            i += 1;

            let send_res = self.tx.send(Notification::Tick { i });
            if let Err(_e) = send_res {
                tracing::info!("Stopping tick_loop(), main loop terminated");
                break;
            } else {
                tracing::debug!("Tick sent: {}", i)
            }
        }
    }
}

impl TickHandle {
    pub(crate) fn enable(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Signal the tick loop to stop and return the handle to join it.
    ///
    /// Returns `None` if it has already been shut down.
    pub(crate) fn shutdown(&self) -> Option<JoinHandle<()>> {
        let shutdown = {
            let mut x = self.shutdown.lock().unwrap_or_else(|e| e.into_inner());
            x.take()
        };

        if let Some(shutdown) = shutdown {
            let send_res = shutdown.send(());
            tracing::info!("Timer shutdown signal sent: {:?}", send_res);
        } else {
            tracing::warn!("Double call to TickHandle::shutdown()");
        }

        let mut jh = self.join_handle.lock().unwrap_or_else(|e| e.into_inner());
        jh.take()
    }
}
