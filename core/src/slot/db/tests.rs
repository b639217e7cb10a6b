mod common {
    use crate::slot::RedbSlot;
    use crate::types::Config;
    use tempfile::TempDir;

    pub(super) fn create_test_slot(capacity: u64) -> (RedbSlot, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_path: temp_dir.path().to_path_buf(),
        };
        let slot = RedbSlot::open(&config, capacity).unwrap();
        (slot, temp_dir)
    }
}

mod read_write {
    use super::common::create_test_slot;
    use crate::slot::Slot;

    #[test]
    fn test_read_missing_key() {
        let (slot, _temp) = create_test_slot(1024);
        assert_eq!(slot.read("gtracker-reports").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let (mut slot, _temp) = create_test_slot(1024);

        slot.write("gtracker-reports", "[]").unwrap();
        assert_eq!(
            slot.read("gtracker-reports").unwrap().as_deref(),
            Some("[]")
        );

        slot.write("gtracker-reports", "[1]").unwrap();
        assert_eq!(
            slot.read("gtracker-reports").unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(slot.used_bytes().unwrap(), 19);
    }

    #[test]
    fn test_values_survive_reopen() {
        use crate::slot::RedbSlot;
        use crate::types::Config;

        let (mut slot, temp) = create_test_slot(1024);
        slot.write("k", "persisted").unwrap();
        drop(slot);

        let config = Config {
            base_path: temp.path().to_path_buf(),
        };
        // Capacity is per handle, not stored in the file
        let reopened = RedbSlot::open(&config, 4096).unwrap();
        assert_eq!(reopened.capacity(), 4096);
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("persisted"));
    }
}

mod quota {
    use super::common::create_test_slot;
    use crate::slot::{Slot, SlotError};

    #[test]
    fn test_over_capacity_write_is_rejected_and_aborted() {
        let (mut slot, _temp) = create_test_slot(10);
        slot.write("k", "123456789").unwrap();

        let err = slot.write("k", "0123456789").unwrap_err();
        assert!(matches!(
            err,
            SlotError::QuotaExceeded {
                requested: 11,
                capacity: 10
            }
        ));

        // Previous value is still committed
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("123456789"));
    }

    #[test]
    fn test_capacity_spans_all_keys() {
        let (mut slot, _temp) = create_test_slot(10);
        slot.write("a", "1234").unwrap();

        assert!(slot.write("b", "12345").unwrap_err().is_quota_exceeded());
        slot.write("b", "1234").unwrap();
        assert_eq!(slot.used_bytes().unwrap(), 10);
    }

    #[test]
    fn test_shrinking_write_always_fits() {
        let (mut slot, _temp) = create_test_slot(10);
        slot.write("k", "123456789").unwrap();
        slot.write("k", "1").unwrap();
        assert_eq!(slot.used_bytes().unwrap(), 2);
    }
}
