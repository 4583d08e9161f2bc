use std::io;

use openraft_macros::add_async_trait;

use crate::poll::OptionKey;
use crate::storage::vote_lock_key;
use crate::storage::LockStorage;

#[add_async_trait]
pub trait LockStorageExt: LockStorage {
    /// Read the option this client voted for on `poll_id`, if any.
    async fn read_vote_lock(
        &mut self,
        poll_id: &str,
    ) -> Result<Option<OptionKey>, io::Error> {
        let key = vote_lock_key(poll_id);
        let got = self.read(&key).await?;
        tracing::debug!("read_vote_lock: {}={:?}", key, got);
        Ok(got)
    }

    /// Record the option this client voted for on `poll_id`.
    ///
    /// An existing lock is never replaced; `Ok(false)` is returned instead.
    async fn write_vote_lock(
        &mut self,
        poll_id: &str,
        option_key: &str,
    ) -> Result<bool, io::Error> {
        let key = vote_lock_key(poll_id);
        let written = self.write(&key, option_key, true).await?;
        tracing::debug!(
            "write_vote_lock: {}={}, written: {}",
            key,
            option_key,
            written
        );
        Ok(written)
    }
}

impl<T> LockStorageExt for T where T: LockStorage {}
