use chrono::{TimeZone, Utc};
use gtracker_core::types::{AppConfig, Config, Coordinates, NewReport, Status, StoreConfig};
use gtracker_core::{RedbSlot, ReportStore, StorageFullGuidance, StoreError};
use tempfile::TempDir;

fn open_store(temp: &TempDir, capacity: u64) -> ReportStore<RedbSlot> {
    let config = Config {
        base_path: temp.path().to_path_buf(),
    };
    let slot = RedbSlot::open(&config, capacity).unwrap();
    ReportStore::open(slot, StoreConfig::default()).unwrap()
}

fn candidate(image_len: usize) -> NewReport {
    NewReport::new("x".repeat(image_len), Coordinates::new(40.4168, -3.7038))
        .with_description("Plastic bags along the fence")
}

#[test]
fn test_reports_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let mut store = open_store(&temp, 1024 * 1024);
    let first = store.add(candidate(64), now).unwrap().id;
    let second = store.add(candidate(64), now).unwrap().id;
    store.update_status(&first, "resolved").unwrap();
    drop(store);

    let store = open_store(&temp, 1024 * 1024);
    assert_eq!(store.reports().len(), 2);
    assert_eq!(store.reports()[0].id(), &second);
    assert_eq!(store.get(&first).unwrap().status(), Status::Resolved);
    assert_eq!(
        store.get(&second).unwrap().description(),
        "Plastic bags along the fence"
    );

    let stats = store.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.get(Status::Resolved), 1);
}

#[test]
fn test_slot_capacity_triggers_single_eviction() {
    let temp = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    // Unbounded first, to measure what two reports take
    let mut store = open_store(&temp, u64::MAX);
    let oldest = store.add(candidate(256), now).unwrap().id;
    store.add(candidate(256), now).unwrap();
    let used = store.slot().used_bytes().unwrap();
    drop(store);

    // A third report does not fit next to both
    let mut store = open_store(&temp, used + 100);
    let outcome = store.add(candidate(256), now).unwrap();

    assert_eq!(outcome.trimmed.unwrap().evicted, vec![oldest.clone()]);
    assert_eq!(store.reports().len(), 2);
    assert!(store.get(&oldest).is_none());
    assert!(store.slot().used_bytes().unwrap() <= used + 100);
}

#[test]
fn test_full_slot_reports_storage_full() {
    let temp = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let mut store = open_store(&temp, 64);
    assert_eq!(store.slot().capacity(), 64);
    let result = store.add(candidate(256), now);

    assert!(matches!(
        result,
        Err(StoreError::StorageFull {
            guidance: StorageFullGuidance::ClearStorage
        })
    ));
    assert!(store.reports().is_empty());
    drop(store);

    let store = open_store(&temp, 64);
    assert!(store.reports().is_empty());
}

#[test]
fn test_store_config_follows_app_config() {
    let mut app = AppConfig::default();
    app.storage.reports_key = "custom-key".to_string();
    app.storage.max_storage_size = 2000;
    app.storage.storage_threshold = 0.5;
    app.status.default = Status::InProgress;

    let config = StoreConfig::from(&app);
    assert_eq!(config.reports_key, "custom-key");
    assert_eq!(config.threshold_bytes(), 1000);
    assert_eq!(config.default_status, Status::InProgress);
    assert!(config.allows(Status::Resolved));
}
