//! Fixtures for testing poll views.

#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use memstore::MemLockStore;
use pollsync::Config;
use pollsync::PollView;
use pseudonet::DirectBackend;
use tracing_subscriber::EnvFilter;

lazy_static! {
    static ref UT_TRACING: () = init_ut_tracing();
}

/// Install a global subscriber writing to the test output, once per process.
pub fn init_default_ut_tracing() {
    lazy_static::initialize(&UT_TRACING);
}

fn init_ut_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let res = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_ansi(false)
        .try_init();

    if let Err(e) = res {
        eprintln!("tracing already initialized: {}", e);
    }
}

/// A test harness running an async test function in a multi-thread tokio
/// runtime, with tracing installed.
pub fn ut_harness<F, Fut>(f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    init_default_ut_tracing();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()?;

    let res = rt.block_on(f());
    if let Err(e) = &res {
        tracing::error!("test failed: {:?}", e);
    }
    res
}

pub fn timeout() -> Option<Duration> {
    Some(Duration::from_millis(2_000))
}

/// A config that never ticks: every fetch after the first is explicit.
pub fn manual_config() -> anyhow::Result<Arc<Config>> {
    let config = Config {
        enable_tick: false,
        ..Default::default()
    }
    .validate()?;
    Ok(Arc::new(config))
}

/// A poll service and a lock store shared by every view a test opens, so a
/// view can be shut down and reopened like a reloaded page.
#[derive(Clone, Default)]
pub struct PollSetup {
    pub backend: DirectBackend,
    pub lock_store: MemLockStore,
}

impl PollSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, config: Arc<Config>) -> PollView {
        PollView::new(config, self.backend.clone(), self.lock_store.clone())
    }

    /// The vote lock of `poll_id` as stored.
    pub fn lock_of(&self, poll_id: &str) -> Option<String> {
        self.lock_store.entries().get(&format!("poll-vote-{}", poll_id)).cloned()
    }
}
