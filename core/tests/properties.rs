use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gtracker_core::types::{Coordinates, NewReport, Report, StoreConfig};
use gtracker_core::{MemorySlot, ReportStore, Slot};
use proptest::prelude::*;

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(seconds)
}

fn candidate(image_len: usize) -> NewReport {
    NewReport::new("x".repeat(image_len), Coordinates::new(-33.8688, 151.2093))
}

proptest! {
    #[test]
    fn add_keeps_payload_under_threshold_or_one_report(
        quota in 200u64..20_000,
        threshold in 0.1f64..=1.0,
        image_lens in prop::collection::vec(1usize..2_000, 1..30),
    ) {
        let config = StoreConfig {
            max_storage_size: quota,
            storage_threshold: threshold,
            ..StoreConfig::default()
        };
        let limit = config.threshold_bytes();
        let mut slot = MemorySlot::new();
        let mut store = ReportStore::open(&mut slot, config.clone()).unwrap();

        for (i, image_len) in image_lens.iter().enumerate() {
            let outcome = store.add(candidate(*image_len), at(i as i64)).unwrap();

            prop_assert_eq!(store.reports()[0].id(), &outcome.id);
            let size = store.serialized_len().unwrap();
            prop_assert!(size <= limit || store.reports().len() == 1);
        }

        let in_memory = store.reports().to_vec();
        drop(store);
        let raw = slot.read(&config.reports_key).unwrap().unwrap();
        let persisted: Vec<Report> = serde_json::from_str(&raw).unwrap();
        prop_assert_eq!(persisted, in_memory);
    }

    #[test]
    fn reports_stay_newest_first(count in 1usize..40, step in 0i64..3) {
        let mut slot = MemorySlot::new();
        let mut store = ReportStore::open(&mut slot, StoreConfig::default()).unwrap();

        let mut added = Vec::new();
        for i in 0..count {
            added.push(store.add(candidate(16), at(i as i64 * step)).unwrap().id);
        }

        added.reverse();
        let listed: Vec<_> = store.reports().iter().map(|r| r.id().clone()).collect();
        prop_assert_eq!(listed, added);

        let created: Vec<_> = store.reports().iter().map(|r| r.created_at()).collect();
        prop_assert!(created.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn failing_backend_never_changes_reports(existing in 0usize..6, image_len in 1usize..500) {
        let mut slot = MemorySlot::new();
        let mut store = ReportStore::open(&mut slot, StoreConfig::default()).unwrap();
        for i in 0..existing {
            store.add(candidate(image_len), at(i as i64)).unwrap();
        }
        drop(store);

        slot.set_capacity(Some(0));
        let mut store = ReportStore::open(&mut slot, StoreConfig::default()).unwrap();
        let before = store.reports().to_vec();

        prop_assert!(store.add(candidate(image_len), at(100)).is_err());
        prop_assert_eq!(store.reports(), before.as_slice());
    }
}
