use super::{Slot, SlotError, entry_len};
use std::collections::HashMap;

/// In-memory slot backend.
///
/// Writes fail deterministically once the total size of all entries would
/// exceed `capacity`, which makes it the backend of choice for exercising the
/// store's eviction paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: HashMap<String, String>,
    capacity: Option<u64>,
    writes: usize,
}

impl MemorySlot {
    /// Unbounded backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes taking total usage above `capacity` bytes.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Backend that rejects every write.
    pub fn failing() -> Self {
        Self::with_capacity(0)
    }

    pub fn set_capacity(&mut self, capacity: Option<u64>) {
        self.capacity = capacity;
    }

    /// Stores `value` as-is, bypassing the capacity check.
    ///
    /// Stands in for another writer touching the same storage.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Total bytes used by all entries.
    pub fn used_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|(key, value)| entry_len(key, value))
            .sum()
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        if let Some(capacity) = self.capacity {
            let others: u64 = self
                .entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, value)| entry_len(existing, value))
                .sum();
            let requested = others + entry_len(key, value);
            if requested > capacity {
                return Err(SlotError::QuotaExceeded {
                    requested,
                    capacity,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
