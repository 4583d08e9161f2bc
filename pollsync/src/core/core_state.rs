use std::convert::Infallible;

use tokio::task::JoinHandle;

use crate::errors::Fatal;

/// Whether the Core task has been joined yet.
pub(crate) enum CoreState {
    Running(JoinHandle<Result<Infallible, Fatal>>),

    /// Joined; holds why the Core quit.
    Done(Fatal),
}

impl CoreState {
    pub(crate) fn is_running(&self) -> bool {
        matches!(self, CoreState::Running(_))
    }
}
