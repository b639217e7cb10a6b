//! On-disk slot backend built on redb.
//!
//! All slots live in a single `slots` table (`&str → &str`). The backend
//! enforces a hard byte capacity across the whole table, mimicking a browser
//! origin's storage quota: a write that would exceed it is aborted and the
//! previous value stays committed.

use super::{Slot, SlotError, entry_len};
use crate::types::Config;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use tracing::debug;

/// Slot table: key → serialized payload
const SLOTS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("slots");

pub struct RedbSlot {
    db: redb::Database,
    capacity: u64,
}

impl RedbSlot {
    /// Creates or opens the slot database at `config.db_path()`.
    pub fn open(config: &Config, capacity: u64) -> Result<Self, SlotError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SLOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db, capacity })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Total bytes used by all slots.
    pub fn used_bytes(&self) -> Result<u64, SlotError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;

        let mut used = 0;
        for entry in table.iter()? {
            let (key, value) = entry?;
            used += entry_len(key.value(), value.value());
        }
        Ok(used)
    }
}

impl Slot for RedbSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;

        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        let write_txn = self.db.begin_write()?;

        let requested = {
            let mut table = write_txn.open_table(SLOTS_TABLE)?;

            let mut others = 0;
            for entry in table.iter()? {
                let (existing, existing_value) = entry?;
                if existing.value() != key {
                    others += entry_len(existing.value(), existing_value.value());
                }
            }

            let requested = others + entry_len(key, value);
            if requested <= self.capacity {
                table.insert(key, value)?;
            }
            requested
        };

        if requested > self.capacity {
            write_txn.abort()?;
            return Err(SlotError::QuotaExceeded {
                requested,
                capacity: self.capacity,
            });
        }

        write_txn.commit()?;
        debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
