//! Callback used by spawned requests.

use tokio::sync::mpsc;

use crate::base::Liveness;
use crate::core::io::notification::Notification;

/// Delivers the response of a spawned request back to the
/// [`Core`](crate::core::core::Core).
///
/// It holds only a weak sender, so a pending request does not keep a stopped
/// core's channel open.
pub(crate) struct ResponseCallback {
    liveness: Liveness,
    tx: mpsc::WeakUnboundedSender<Notification>,
}

impl ResponseCallback {
    pub(crate) fn new(
        liveness: Liveness,
        tx: mpsc::WeakUnboundedSender<Notification>,
    ) -> Self {
        Self { liveness, tx }
    }

    /// Hand a response to the core, unless the view has been torn down.
    ///
    /// Returns whether the notification was delivered.
    pub(crate) fn deliver(self, notification: Notification) -> bool {
        if !self.liveness.is_alive() {
            tracing::info!(
                "{}: view is torn down, discard: {}",
                func_name!(),
                notification
            );
            return false;
        }

        let Some(tx) = self.tx.upgrade() else {
            tracing::warn!(
                "failed to upgrade tx, Core may have closed the receiver; discard: {}",
                notification
            );
            return false;
        };

        tracing::debug!("{}: deliver: {}", func_name!(), notification);

        if let Err(e) = tx.send(notification) {
            tracing::warn!("failed to deliver response: {}", e.0);
            return false;
        }
        true
    }
}
