//! Defines [`LockStorage`] trait.

use std::io;

use openraft_macros::add_async_trait;

/// API for a process-wide string key-value store that survives restarts.
///
/// A view receives its storage as an explicit dependency, so tests can
/// substitute an in-memory one.
///
/// ### To ensure correctness:
///
/// - A write with `exclusive == true` must not overwrite an existing key, and
///   must report whether it stored the value. The vote lock relies on it to
///   write each poll's entry at most once.
/// - There is no cross-process locking: two processes sharing a store can
///   both vote before either sees the other's entry.
#[add_async_trait]
pub trait LockStorage: Clone + Send + Sync + 'static {
    /// Read the value stored under `key`.
    async fn read(&mut self, key: &str) -> Result<Option<String>, io::Error>;

    /// Store `value` under `key`.
    ///
    /// Returns `Ok(false)` if `exclusive` is set and `key` already exists.
    async fn write(
        &mut self,
        key: &str,
        value: &str,
        exclusive: bool,
    ) -> Result<bool, io::Error>;
}
