use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A shared flag telling whether a view is still alive.
///
/// Set once at creation, cleared once at teardown; never set again. Spawned
/// requests check it before delivering a response, so a response that lands
/// after teardown never reaches the view state.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark the view as torn down.
    ///
    /// Returns `true` if this call is the one that killed it.
    pub fn kill(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }
}
