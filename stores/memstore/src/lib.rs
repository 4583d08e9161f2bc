use std::collections::BTreeMap;
use std::io::Error;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use pollsync::storage::LockStorage;
use tracing::debug;

/// An in-memory lock storage implementing the [`LockStorage`] trait.
///
/// Clones share the same map, so a view can be dropped and rebuilt on the
/// same store to simulate a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemLockStore {
    store: Arc<Mutex<BTreeMap<String, String>>>,

    /// When set, every read fails as an unreadable disk would.
    fail_reads: Arc<AtomicBool>,
}

impl MemLockStore {
    /// A copy of every entry, for inspection.
    pub fn entries(&self) -> BTreeMap<String, String> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.clone()
    }

    /// Make every following read fail until called again with `false`.
    /// Writes are not affected.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }
}

impl LockStorage for MemLockStore {
    async fn read(&mut self, key: &str) -> Result<Option<String>, Error> {
        if self.fail_reads.load(Ordering::Relaxed) {
            debug!("MemLockStore::read: key={}, injected failure", key);
            return Err(Error::other("injected read failure"));
        }

        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let got = store.get(key).cloned();

        debug!("MemLockStore::read: key={}, got={:?}", key, got);
        Ok(got)
    }

    async fn write(
        &mut self,
        key: &str,
        value: &str,
        exclusive: bool,
    ) -> Result<bool, Error> {
        debug!(
            "MemLockStore::write: key={}, value={}, exclusive={}",
            key, value, exclusive
        );

        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        if exclusive && store.contains_key(key) {
            return Ok(false);
        }

        store.insert(key.to_string(), value.to_string());
        Ok(true)
    }
}
