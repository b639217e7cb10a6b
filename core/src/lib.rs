pub mod links;
pub mod slot;
pub mod store;
pub mod types;

pub use slot::{MemorySlot, RedbSlot, Slot, SlotError};
pub use store::error::{StorageFullGuidance, StoreError};
pub use store::{AddOutcome, ReportStore, Stats, StorageTrimmed};
