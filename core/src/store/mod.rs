//! Report store: the ordered report list mirrored into a single slot.
//!
//! The list is kept newest first and written wholesale as one JSON array on
//! every mutation. Capacity is measured in serialized bytes:
//!
//! - Before an `add` is written, the oldest reports are evicted while the
//!   payload exceeds `max_storage_size × storage_threshold`.
//! - If the slot still rejects a write with a quota error, exactly one more
//!   oldest report (never the one being added or updated) is evicted and the
//!   write is retried once.
//!
//! A failed mutation restores the in-memory list to what the slot holds.

use crate::slot::{Slot, SlotError};
use crate::types::{NewReport, Report, ReportId, Status, StoreConfig};
use chrono::{DateTime, Utc};
use error::{StorageFullGuidance, StoreError};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

pub mod error {
    use crate::slot::SlotError;
    use crate::types::ReportId;
    use std::fmt;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoreError {
        #[error("Persisted reports are unreadable: {0}")]
        CorruptState(#[source] serde_json::Error),

        #[error("Storage is full: {guidance}")]
        StorageFull { guidance: StorageFullGuidance },

        #[error("Report not found: {0}")]
        NotFound(ReportId),

        #[error("Invalid status: {0}")]
        InvalidStatus(String),

        #[error("Invalid report: {0}")]
        InvalidReport(&'static str),

        #[error("Failed to serialize reports: {0}")]
        Serialize(#[source] serde_json::Error),

        #[error("Slot error: {0}")]
        Slot(#[from] SlotError),
    }

    /// What the user can do after a [`StoreError::StorageFull`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StorageFullGuidance {
        /// Other reports are still stored; deleting some frees room for a retry.
        DeleteOldReports,
        /// Nothing left to evict; the backing storage itself has to be cleared.
        ClearStorage,
    }

    impl fmt::Display for StorageFullGuidance {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                StorageFullGuidance::DeleteOldReports => {
                    write!(f, "delete some old reports and try again")
                }
                StorageFullGuidance::ClearStorage => write!(f, "clear the storage"),
            }
        }
    }
}

/// Oldest reports were evicted to make a write fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTrimmed {
    /// Evicted ids, oldest first.
    pub evicted: Vec<ReportId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub id: ReportId,
    pub trimmed: Option<StorageTrimmed>,
}

/// Report counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub by_status: BTreeMap<Status, usize>,
}

impl Stats {
    fn count<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        let mut by_status: BTreeMap<Status, usize> =
            Status::ALL.into_iter().map(|status| (status, 0)).collect();
        let mut total = 0;
        for report in reports {
            *by_status.entry(report.status()).or_default() += 1;
            total += 1;
        }
        Self { total, by_status }
    }

    pub fn get(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

pub struct ReportStore<S: Slot> {
    slot: S,
    config: StoreConfig,
    reports: Vec<Report>,
    last_issued: u64,
}

impl<S: Slot> ReportStore<S> {
    /// Opens the store and loads the persisted reports.
    ///
    /// An unreadable slot is treated as empty; backend errors are returned.
    pub fn open(slot: S, config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self {
            slot,
            config,
            reports: Vec::new(),
            last_issued: 0,
        };

        match store.load().map(|_| ()) {
            Ok(()) | Err(StoreError::CorruptState(_)) => Ok(store),
            Err(e) => Err(e),
        }
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// On [`StoreError::CorruptState`] the in-memory list is left empty.
    pub fn load(&mut self) -> Result<&[Report], StoreError> {
        let loaded = match self.read_persisted() {
            Ok(reports) => reports,
            Err(e) => {
                if let StoreError::CorruptState(cause) = &e {
                    warn!(key = %self.config.reports_key, %cause, "discarding unreadable reports");
                    self.reports.clear();
                }
                return Err(e);
            }
        };

        self.reports = loaded;
        self.last_issued = self.last_issued.max(
            self.reports
                .iter()
                .filter_map(|report| report.id().millis())
                .max()
                .unwrap_or(0),
        );
        debug!(count = self.reports.len(), "reports loaded");
        Ok(&self.reports)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}

/// Read operations.
impl<S: Slot> ReportStore<S> {
    /// All reports, newest first.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &ReportId) -> Option<&Report> {
        self.reports.iter().find(|report| report.id() == id)
    }

    /// Reports with the given status, newest first. `None` matches all.
    pub fn filter(&self, status: Option<Status>) -> impl Iterator<Item = &Report> {
        self.reports
            .iter()
            .filter(move |report| status.is_none_or(|status| report.status() == status))
    }

    /// Serialized size of the in-memory list, as it would be written.
    pub fn serialized_len(&self) -> Result<u64, StoreError> {
        Ok(self.serialize()?.len() as u64)
    }

    /// Counts reports by status as currently persisted.
    ///
    /// Re-reads the slot so changes made by another writer are reflected. Falls
    /// back to the in-memory list if the slot cannot be read.
    pub fn stats(&self) -> Stats {
        match self.read_persisted() {
            Ok(persisted) => Stats::count(&persisted),
            Err(e) => {
                warn!(error = %e, "counting in-memory reports");
                Stats::count(&self.reports)
            }
        }
    }
}

/// Mutating operations.
impl<S: Slot> ReportStore<S> {
    /// Adds a report in the default status and persists the list.
    pub fn add(
        &mut self,
        candidate: NewReport,
        now: DateTime<Utc>,
    ) -> Result<AddOutcome, StoreError> {
        if candidate.image_data.trim().is_empty() {
            return Err(StoreError::InvalidReport("image is required"));
        }
        let location = candidate
            .location
            .ok_or(StoreError::InvalidReport("location is required"))?;
        if !location.is_finite() {
            return Err(StoreError::InvalidReport("location must be finite"));
        }
        let description = candidate
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map_or_else(|| self.config.default_description.clone(), String::from);

        let previous_issued = self.last_issued;
        let id = self.issue_id(now);
        self.reports.insert(
            0,
            Report::new(
                id.clone(),
                candidate.image_data,
                location,
                description,
                self.config.default_status,
                now,
            ),
        );

        let mut evicted = Vec::new();
        let result = self
            .trim_to_threshold(&mut evicted)
            .and_then(|payload| self.persist(payload, &id));

        match result {
            Ok(retry_evicted) => {
                evicted.extend(retry_evicted);
                debug!(%id, count = self.reports.len(), "report added");
                Ok(AddOutcome {
                    id,
                    trimmed: trimmed(&evicted),
                })
            }
            Err(e) => {
                self.reports.remove(0);
                // `evicted` is oldest first; the tail is rebuilt newest first.
                self.reports.extend(evicted.into_iter().rev());
                self.last_issued = previous_issued;
                warn!(error = %e, "add rolled back");
                Err(e)
            }
        }
    }

    /// Moves a report to `new_status` and persists the list.
    pub fn update_status(
        &mut self,
        id: &ReportId,
        new_status: &str,
    ) -> Result<Option<StorageTrimmed>, StoreError> {
        let status = new_status
            .parse::<Status>()
            .ok()
            .filter(|status| self.config.allows(*status))
            .ok_or_else(|| StoreError::InvalidStatus(new_status.to_string()))?;

        let index = self.index_of(id)?;
        let previous = self.reports[index].status();
        if previous == status {
            return Ok(None);
        }

        self.reports[index].set_status(status);
        let result = self.serialize().and_then(|payload| self.persist(payload, id));

        match result {
            Ok(evicted) => {
                debug!(%id, %status, "status updated");
                Ok(trimmed(&evicted))
            }
            Err(e) => {
                // Eviction never touches `id`, but its index may have moved.
                if let Some(report) = self.reports.iter_mut().find(|report| report.id() == id) {
                    report.set_status(previous);
                }
                warn!(error = %e, "status update rolled back");
                Err(e)
            }
        }
    }

    /// Deletes a report and persists the list.
    pub fn remove(&mut self, id: &ReportId) -> Result<Report, StoreError> {
        let index = self.index_of(id)?;
        let removed = self.reports.remove(index);

        let result = self
            .serialize()
            .and_then(|payload| self.write(&payload).map_err(storage_error(&self.reports)));

        match result {
            Ok(()) => {
                debug!(%id, count = self.reports.len(), "report removed");
                Ok(removed)
            }
            Err(e) => {
                self.reports.insert(index, removed);
                warn!(error = %e, "remove rolled back");
                Err(e)
            }
        }
    }
}

/// Persistence internals.
impl<S: Slot> ReportStore<S> {
    fn read_persisted(&self) -> Result<Vec<Report>, StoreError> {
        let Some(raw) = self.slot.read(&self.config.reports_key)? else {
            return Ok(Vec::new());
        };
        let reports: Vec<Report> =
            serde_json::from_str(&raw).map_err(StoreError::CorruptState)?;
        Ok(dedup_ids(reports))
    }

    fn serialize(&self) -> Result<String, StoreError> {
        serde_json::to_string(&self.reports).map_err(StoreError::Serialize)
    }

    fn write(&mut self, payload: &str) -> Result<(), SlotError> {
        self.slot.write(&self.config.reports_key, payload)
    }

    /// Evicts the oldest reports until the payload fits under the threshold or
    /// a single report remains. Returns the payload to write.
    fn trim_to_threshold(&mut self, evicted: &mut Vec<Report>) -> Result<String, StoreError> {
        let limit = self.config.threshold_bytes();
        let payload = self.serialize()?;
        if payload.len() as u64 <= limit {
            debug!(size = payload.len(), limit, "payload measured");
            return Ok(payload);
        }

        let size = self.evict_to(payload.len() as u64, limit, evicted)?;
        let payload = self.serialize()?;
        debug_assert_eq!(payload.len() as u64, size);
        debug!(size, limit, "payload measured");
        Ok(payload)
    }

    /// Pops the oldest reports while `size`, the serialized length of the
    /// list, exceeds `limit` and more than one report remains. Returns the
    /// serialized length left.
    fn evict_to(
        &mut self,
        mut size: u64,
        limit: u64,
        evicted: &mut Vec<Report>,
    ) -> Result<u64, StoreError> {
        while size > limit && self.reports.len() > 1 {
            let Some(oldest) = self.reports.pop() else {
                break;
            };
            info!(id = %oldest.id(), size, limit, "evicting oldest report");
            let len = serde_json::to_string(&oldest).map(|json| json.len() as u64);
            evicted.push(oldest);

            // The report and the comma before it
            size -= len.map_err(StoreError::Serialize)? + 1;
        }
        Ok(size)
    }

    /// Writes `payload`, evicting one report other than `protected` and
    /// retrying once if the slot is over quota.
    ///
    /// Returns the report evicted by the retry, if any. On error the in-memory
    /// list is as it was on entry.
    fn persist(
        &mut self,
        payload: String,
        protected: &ReportId,
    ) -> Result<Option<Report>, StoreError> {
        match self.write(&payload) {
            Ok(()) => return Ok(None),
            Err(e) if e.is_quota_exceeded() => {
                warn!(
                    error = %e,
                    size = payload.len(),
                    "write rejected, retrying with one report fewer"
                );
            }
            Err(e) => return Err(e.into()),
        }

        let Some(index) = self
            .reports
            .iter()
            .rposition(|report| report.id() != protected)
        else {
            return Err(StoreError::StorageFull {
                guidance: StorageFullGuidance::ClearStorage,
            });
        };
        let oldest = self.reports.remove(index);

        let result = self
            .serialize()
            .and_then(|payload| self.write(&payload).map_err(storage_error(&self.reports)));

        match result {
            Ok(()) => {
                info!(id = %oldest.id(), "evicted oldest report after quota error");
                Ok(Some(oldest))
            }
            Err(e) => {
                self.reports.insert(index, oldest);
                Err(e)
            }
        }
    }

    fn index_of(&self, id: &ReportId) -> Result<usize, StoreError> {
        self.reports
            .iter()
            .position(|report| report.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Time-derived id, greater than every id issued or loaded so far.
    ///
    /// Once the counter is exhausted, ids restart from `now` and skip the
    /// numeric ids already held.
    fn issue_id(&mut self, now: DateTime<Utc>) -> ReportId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let mut next = match self.last_issued.checked_add(1) {
            Some(after_last) => millis.max(after_last),
            None => {
                warn!(last = self.last_issued, "id counter exhausted, restarting from clock");
                millis
            }
        };
        while self.reports.iter().any(|report| report.id().millis() == Some(next)) {
            next = next.wrapping_add(1);
        }
        self.last_issued = next;
        ReportId::from_millis(next)
    }
}

/// Maps a failed write to the error reported to the caller.
fn storage_error(remaining: &[Report]) -> impl FnOnce(SlotError) -> StoreError + use<> {
    let guidance = if remaining.len() > 1 {
        StorageFullGuidance::DeleteOldReports
    } else {
        StorageFullGuidance::ClearStorage
    };
    move |e| {
        if e.is_quota_exceeded() {
            StoreError::StorageFull { guidance }
        } else {
            StoreError::Slot(e)
        }
    }
}

fn trimmed<'a>(evicted: impl IntoIterator<Item = &'a Report>) -> Option<StorageTrimmed> {
    let evicted: Vec<ReportId> = evicted
        .into_iter()
        .map(|report| report.id().clone())
        .collect();
    (!evicted.is_empty()).then_some(StorageTrimmed { evicted })
}

/// Drops repeated ids, keeping the first (newest) occurrence.
fn dedup_ids(reports: Vec<Report>) -> Vec<Report> {
    let mut seen = HashSet::new();
    let before = reports.len();
    let reports: Vec<Report> = reports
        .into_iter()
        .filter(|report| seen.insert(report.id().clone()))
        .collect();
    if reports.len() != before {
        warn!(dropped = before - reports.len(), "dropped reports with duplicate ids");
    }
    reports
}
