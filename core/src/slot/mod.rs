//! Persistence capability behind the report store.
//!
//! A slot backend maps string keys to string values, like a browser's
//! `localStorage`. Backends report quota exhaustion as
//! [`SlotError::QuotaExceeded`] so the store can evict and retry; every other
//! failure is passed through untouched.

pub(crate) mod db;
pub(crate) mod memory;

pub use db::RedbSlot;
pub use error::SlotError;
pub use memory::MemorySlot;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum SlotError {
        #[error("Quota exceeded: {requested} bytes requested, capacity is {capacity} bytes")]
        QuotaExceeded { requested: u64, capacity: u64 },

        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }

    impl SlotError {
        pub fn is_quota_exceeded(&self) -> bool {
            matches!(self, SlotError::QuotaExceeded { .. })
        }
    }
}

/// A string key-value store with a byte quota.
pub trait Slot {
    /// Returns the stored value, or `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Replaces the value under `key`.
    ///
    /// Fails with [`SlotError::QuotaExceeded`] and leaves the previous value in
    /// place when the write would take the backend over its capacity.
    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError>;
}

impl<S: Slot + ?Sized> Slot for &mut S {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        (**self).write(key, value)
    }
}

/// Bytes an entry occupies for quota accounting.
pub(crate) fn entry_len(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
