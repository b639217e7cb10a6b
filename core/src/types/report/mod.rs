//! Report records and the candidate accepted by `ReportStore::add`.
//!
//! The persisted shape is a camelCase JSON object. Records written by older
//! releases used `image` and `date` and carried an extra numeric `timestamp`;
//! those are still accepted on read.

use crate::types::{ReportId, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single persisted litter observation.
///
/// Reports are only created, mutated and destroyed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    id: ReportId,
    #[serde(alias = "image")]
    image_data: String,
    latitude: f64,
    longitude: f64,
    description: String,
    status: Status,
    #[serde(alias = "date")]
    created_at: DateTime<Utc>,
}

impl Report {
    pub(crate) fn new(
        id: ReportId,
        image_data: String,
        location: Coordinates,
        description: String,
        status: Status,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            image_data,
            latitude: location.latitude,
            longitude: location.longitude,
            description,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> &ReportId {
        &self.id
    }

    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn location(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Input to `ReportStore::add`.
///
/// `status` is accepted for convenience but ignored: new reports always start
/// in the configured default status.
#[derive(Debug, Clone, Default)]
pub struct NewReport {
    pub image_data: String,
    pub location: Option<Coordinates>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl NewReport {
    pub fn new(image_data: impl Into<String>, location: Coordinates) -> Self {
        Self {
            image_data: image_data.into(),
            location: Some(location),
            description: None,
            status: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
