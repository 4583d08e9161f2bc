//! The durable vote lock storage interface.

mod key_config;
mod lock_storage;
mod lock_storage_ext;

pub use key_config::vote_lock_key;
pub use lock_storage_ext::LockStorageExt;

pub use self::lock_storage::LockStorage;
