//! A [`LockStorage`] that keeps all entries in one JSON file.
//!
//! The file holds a single JSON object of string keys to string values. Every
//! write replaces the file atomically: the new content is written to a
//! temporary file in the same directory, which is then renamed over the old
//! one. A reader never sees a half written file.
//!
//! File IO runs on tokio's blocking thread pool, so the store must be used
//! from within a tokio runtime.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use pollsync::storage::LockStorage;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;

/// A lock storage persisted to a JSON file.
///
/// Clones share the same file and serialize their writes. Separate processes
/// using the same file do not coordinate.
#[derive(Debug, Clone)]
pub struct FileLockStore {
    path: Arc<PathBuf>,

    /// Held for the whole read-modify-write of a `write()`.
    lock: Arc<Mutex<()>>,
}

impl FileLockStore {
    /// Open the store at `path`, creating its parent directory.
    ///
    /// The file itself is created on the first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        info!("FileLockStore::open: {}", path.display());

        Ok(Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Load all entries; a missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<String, String>, io::Error> {
        let buf = match fs::read(self.path.as_path()) {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e),
        };

        serde_json::from_slice(&buf).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed lock file {}: {}", self.path.display(), e),
            )
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), io::Error> {
        let dir = match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };

        let buf = serde_json::to_vec_pretty(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut f = NamedTempFile::new_in(dir)?;
        f.write_all(&buf)?;
        f.as_file().sync_all()?;
        f.persist(self.path.as_path()).map_err(|e| e.error)?;

        Ok(())
    }

    /// Run `f` on the blocking pool while holding the file lock.
    async fn with_file<T, F>(&self, f: F) -> Result<T, io::Error>
    where
        T: Send + 'static,
        F: FnOnce(&FileLockStore) -> Result<T, io::Error> + Send + 'static,
    {
        let store = self.clone();

        tokio::task::spawn_blocking(move || {
            let _g = store.lock.lock().unwrap_or_else(|e| e.into_inner());
            f(&store)
        })
        .await
        .map_err(io::Error::other)?
    }
}

impl LockStorage for FileLockStore {
    async fn read(&mut self, key: &str) -> Result<Option<String>, io::Error> {
        let k = key.to_string();
        let got = self.with_file(move |s| Ok(s.load()?.remove(&k))).await?;

        debug!("FileLockStore::read: key={}, got={:?}", key, got);
        Ok(got)
    }

    async fn write(
        &mut self,
        key: &str,
        value: &str,
        exclusive: bool,
    ) -> Result<bool, io::Error> {
        debug!(
            "FileLockStore::write: key={}, value={}, exclusive={}",
            key, value, exclusive
        );

        let (key, value) = (key.to_string(), value.to_string());

        self.with_file(move |s| {
            let mut entries = s.load()?;
            if exclusive && entries.contains_key(&key) {
                return Ok(false);
            }

            entries.insert(key, value);
            s.save(&entries)?;
            Ok(true)
        })
        .await
    }
}
