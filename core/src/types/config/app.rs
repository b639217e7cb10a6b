use crate::types::Status;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// User-facing application configuration, persisted as config.toml.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub map: MapConfig,
}

impl AppConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> std::path::PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.storage.reports_key.trim().is_empty() {
            errors.push("reports_key must not be empty".to_string());
        }

        if self.storage.max_storage_size == 0 {
            errors.push("max_storage_size must be at least 1".to_string());
        }

        if !threshold_in_range(self.storage.storage_threshold) {
            errors.push("storage_threshold must be greater than 0 and at most 1".to_string());
        }

        if self.storage.slot_capacity == 0 {
            errors.push("slot_capacity must be at least 1".to_string());
        }

        if self.status.options.is_empty() {
            errors.push("status options must not be empty".to_string());
        } else if !self.status.options.contains(&self.status.default) {
            errors.push(format!(
                "default status '{}' is not one of the status options",
                self.status.default
            ));
        }

        if self.image.max_file_size == 0 {
            errors.push("max_file_size must be at least 1".to_string());
        }

        if self.map.zoom > MAX_MAP_ZOOM {
            errors.push(format!("map zoom must be at most {MAX_MAP_ZOOM}"));
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();

        let status = if self.status.options.is_empty()
            || !self.status.options.contains(&self.status.default)
        {
            defaults.status
        } else {
            self.status.clone()
        };

        Self {
            storage: StorageConfig {
                reports_key: if self.storage.reports_key.trim().is_empty() {
                    defaults.storage.reports_key
                } else {
                    self.storage.reports_key.clone()
                },
                max_storage_size: if self.storage.max_storage_size == 0 {
                    defaults.storage.max_storage_size
                } else {
                    self.storage.max_storage_size
                },
                storage_threshold: if threshold_in_range(self.storage.storage_threshold) {
                    self.storage.storage_threshold
                } else {
                    defaults.storage.storage_threshold
                },
                slot_capacity: if self.storage.slot_capacity == 0 {
                    defaults.storage.slot_capacity
                } else {
                    self.storage.slot_capacity
                },
            },
            report: self.report.clone(),
            status,
            image: ImageConfig {
                max_file_size: if self.image.max_file_size == 0 {
                    defaults.image.max_file_size
                } else {
                    self.image.max_file_size
                },
                accepted_formats: self.image.accepted_formats.clone(),
            },
            map: MapConfig {
                zoom: self.map.zoom.min(MAX_MAP_ZOOM),
                ..self.map.clone()
            },
        }
    }
}

const MAX_MAP_ZOOM: u8 = 19;

fn threshold_in_range(threshold: f64) -> bool {
    threshold > 0.0 && threshold <= 1.0
}

/// Persistence slot settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_reports_key")]
    pub reports_key: String,
    /// Quota in bytes that the serialized report list is measured against.
    #[serde(default = "default_max_storage_size")]
    pub max_storage_size: u64,
    /// Fraction of the quota at which the oldest reports are evicted before writing.
    #[serde(default = "default_storage_threshold")]
    pub storage_threshold: f64,
    /// Hard byte limit enforced by the on-disk slot backend.
    #[serde(default = "default_slot_capacity")]
    pub slot_capacity: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reports_key: default_reports_key(),
            max_storage_size: default_max_storage_size(),
            storage_threshold: default_storage_threshold(),
            slot_capacity: default_slot_capacity(),
        }
    }
}

fn default_reports_key() -> String {
    "gtracker-reports".to_string()
}

fn default_max_storage_size() -> u64 {
    4 * 1024 * 1024
}

fn default_storage_threshold() -> f64 {
    0.9
}

fn default_slot_capacity() -> u64 {
    5 * 1024 * 1024
}

/// Report content settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_description")]
    pub default_description: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_description: default_description(),
        }
    }
}

fn default_description() -> String {
    "No description provided".to_string()
}

/// Status workflow settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub default: Status,
    #[serde(default = "default_status_options")]
    pub options: Vec<Status>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            default: Status::default(),
            options: default_status_options(),
        }
    }
}

fn default_status_options() -> Vec<Status> {
    Status::ALL.to_vec()
}

/// Limits applied to images before they are encoded into a report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_accepted_formats")]
    pub accepted_formats: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            accepted_formats: default_accepted_formats(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_accepted_formats() -> Vec<String> {
    ["image/png", "image/jpg", "image/jpeg", "image/gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// External map service settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub provider: MapProvider,
    #[serde(default = "default_openstreetmap_base_url")]
    pub openstreetmap_base_url: String,
    #[serde(default = "default_google_maps_base_url")]
    pub google_maps_base_url: String,
    #[serde(default = "default_graphhopper_url")]
    pub graphhopper_url: String,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            provider: MapProvider::default(),
            openstreetmap_base_url: default_openstreetmap_base_url(),
            google_maps_base_url: default_google_maps_base_url(),
            graphhopper_url: default_graphhopper_url(),
            zoom: default_zoom(),
        }
    }
}

fn default_openstreetmap_base_url() -> String {
    "https://www.openstreetmap.org".to_string()
}

fn default_google_maps_base_url() -> String {
    "https://www.google.com/maps".to_string()
}

fn default_graphhopper_url() -> String {
    "https://graphhopper.com/maps".to_string()
}

fn default_zoom() -> u8 {
    18
}

/// Map service used for "view on map" links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    #[default]
    OpenStreetMap,
    Google,
}

impl fmt::Display for MapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapProvider::OpenStreetMap => write!(f, "openstreetmap"),
            MapProvider::Google => write!(f, "google"),
        }
    }
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
