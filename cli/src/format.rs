//! Human-readable output and user-facing error messages.

use gtracker_core::types::{Report, Status};
use gtracker_core::{Stats, StorageFullGuidance, StorageTrimmed, StoreError};

pub fn print_reports<'a>(reports: impl IntoIterator<Item = &'a Report>) {
    let mut empty = true;
    for report in reports {
        empty = false;
        let location = report.location();
        println!(
            "{}  {:<11}  {}  {:.6},{:.6}  {}",
            report.id(),
            report.status().label(),
            report.created_at().format("%Y-%m-%d %H:%M"),
            location.latitude,
            location.longitude,
            report.description(),
        );
    }
    if empty {
        println!("No reports found.");
    }
}

pub fn print_reports_json<'a>(reports: impl IntoIterator<Item = &'a Report>) -> anyhow::Result<()> {
    let reports: Vec<&Report> = reports.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

pub fn print_stats(stats: &Stats) {
    println!("Total        {}", stats.total);
    for status in Status::ALL {
        println!("{:<12} {}", status.label(), stats.get(status));
    }
}

pub fn trimmed_notice(trimmed: &StorageTrimmed) -> String {
    format!(
        "Storage was getting full. {} older report(s) were removed to save space.",
        trimmed.evicted.len()
    )
}

/// Message shown to the user for a failed store operation.
pub fn user_message(error: &StoreError) -> String {
    match error {
        StoreError::StorageFull {
            guidance: StorageFullGuidance::DeleteOldReports,
        } => "Storage is full. Please delete some old reports and try again.".to_string(),
        StoreError::StorageFull {
            guidance: StorageFullGuidance::ClearStorage,
        } => "Storage is full. Please clear the report storage or use a different data directory."
            .to_string(),
        StoreError::NotFound(id) => format!("No report with id {id}."),
        StoreError::InvalidStatus(status) => format!(
            "'{status}' is not a valid status. Use one of: {}.",
            Status::ALL.map(Status::as_str).join(", ")
        ),
        StoreError::InvalidReport(reason) => {
            format!("Please provide an image and a location ({reason}).")
        }
        other => format!("Error saving report: {other}. Please try again."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtracker_core::types::ReportId;

    #[test]
    fn test_storage_full_messages_differ_by_guidance() {
        let retry = user_message(&StoreError::StorageFull {
            guidance: StorageFullGuidance::DeleteOldReports,
        });
        let clear = user_message(&StoreError::StorageFull {
            guidance: StorageFullGuidance::ClearStorage,
        });
        assert!(retry.contains("delete some old reports"));
        assert!(clear.contains("clear"));
    }

    #[test]
    fn test_invalid_status_lists_options() {
        let message = user_message(&StoreError::InvalidStatus("archived".to_string()));
        assert_eq!(
            message,
            "'archived' is not a valid status. Use one of: reported, in-progress, resolved."
        );
    }

    #[test]
    fn test_not_found_names_id() {
        let id = ReportId::try_from("123").unwrap();
        assert_eq!(user_message(&StoreError::NotFound(id)), "No report with id 123.");
    }

    #[test]
    fn test_trimmed_notice_counts() {
        let trimmed = StorageTrimmed {
            evicted: vec![ReportId::try_from("1").unwrap(), ReportId::try_from("2").unwrap()],
        };
        assert!(trimmed_notice(&trimmed).contains("2 older report(s)"));
    }
}
