use super::AppConfig;
use crate::types::Status;

/// Settings consumed by [`ReportStore`](crate::ReportStore).
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub reports_key: String,
    pub max_storage_size: u64,
    pub storage_threshold: f64,
    pub default_status: Status,
    pub status_options: Vec<Status>,
    pub default_description: String,
}

impl StoreConfig {
    /// Serialized size above which the oldest reports are evicted before a write.
    pub fn threshold_bytes(&self) -> u64 {
        (self.max_storage_size as f64 * self.storage_threshold).floor() as u64
    }

    pub fn allows(&self, status: Status) -> bool {
        self.status_options.contains(&status)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for StoreConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            reports_key: config.storage.reports_key.clone(),
            max_storage_size: config.storage.max_storage_size,
            storage_threshold: config.storage.storage_threshold,
            default_status: config.status.default,
            status_options: config.status.options.clone(),
            default_description: config.report.default_description.clone(),
        }
    }
}
