//! Core domain records for busboard.
//!
//! This module defines the records the board manages: the buses on the live
//! roster, immutable end-of-day snapshots, reusable roster templates, and
//! driver complaints.
//!
//! All records serialize with `camelCase` field names so that JSON written by
//! the previous application version parses unchanged during legacy migration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single bus on the board.
///
/// Platform labels are conventionally "1" through "9" but are stored as
/// free text and not validated beyond that convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusRecord {
    /// Unique identifier for this record.
    pub id: String,
    /// Line label (e.g. "47").
    pub line_number: String,
    /// License plate label.
    pub plate_number: String,
    /// Assigned parking platform label.
    pub platform_number: String,
    /// Destination label.
    pub destination: String,
    /// Whether the bus has arrived.
    pub arrived: bool,
    /// Free-text operator note. Absent in legacy data.
    #[serde(default)]
    pub notes: String,
}

impl BusRecord {
    /// Create a blank record with a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_number: String::new(),
            plate_number: String::new(),
            platform_number: String::new(),
            destination: String::new(),
            arrived: false,
            notes: String::new(),
        }
    }

    /// Check whether the given key identifies this bus (by id, plate, or line).
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.plate_number == key || self.line_number == key
    }
}

impl Default for BusRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable end-of-day snapshot of the roster with derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLog {
    /// Unique identifier for this log.
    pub id: String,
    /// When the snapshot was taken.
    pub date: DateTime<Utc>,
    /// Copies of the roster records at snapshot time.
    pub buses: Vec<BusRecord>,
    /// Number of buses marked arrived at snapshot time.
    pub arrived_count: usize,
    /// Total number of buses at snapshot time.
    pub total_count: usize,
}

impl DayLog {
    /// Snapshot the given roster into a new log with derived counts.
    #[must_use]
    pub fn from_roster(buses: &[BusRecord]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            buses: buses.to_vec(),
            arrived_count: buses.iter().filter(|b| b.arrived).count(),
            total_count: buses.len(),
        }
    }

    /// The arrival rate of this log as a percentage (0 when empty).
    #[must_use]
    pub fn arrival_rate(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                (self.arrived_count as f64 / self.total_count as f64) * 100.0
            }
        }
    }
}

/// A saved roster that can be reloaded on a matching day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identifier for this template.
    pub id: String,
    /// Operator-chosen name.
    pub name: String,
    /// Day-of-week label this template applies to (empty for any day).
    pub day_of_week: String,
    /// The saved roster records.
    pub buses: Vec<BusRecord>,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Create a template from the current roster.
    ///
    /// Saved records get fresh identifiers and their arrival flags reset,
    /// so loading the template later starts a clean day.
    #[must_use]
    pub fn from_roster(name: String, day_of_week: String, buses: &[BusRecord]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            day_of_week,
            buses: buses.iter().map(reset_record).collect(),
            created_at: Utc::now(),
        }
    }

    /// Produce a fresh roster from this template.
    ///
    /// Records get new identifiers and `arrived = false`.
    #[must_use]
    pub fn instantiate(&self) -> Vec<BusRecord> {
        self.buses.iter().map(reset_record).collect()
    }
}

fn reset_record(bus: &BusRecord) -> BusRecord {
    BusRecord {
        id: Uuid::new_v4().to_string(),
        arrived: false,
        ..bus.clone()
    }
}

/// A driver complaint recorded by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Unique identifier for this complaint.
    pub id: String,
    /// When the complaint was recorded.
    pub date: DateTime<Utc>,
    /// Line label, if known.
    pub line_number: String,
    /// Plate label, if known.
    pub plate_number: String,
    /// Free-text driver description.
    pub driver_description: String,
    /// Complaint category label.
    pub complaint_type: String,
    /// Free-text details.
    pub details: String,
    /// Optional photo as a data URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Complaint {
    /// Create a new complaint with a fresh identifier and timestamp.
    #[must_use]
    pub fn new(
        line_number: String,
        plate_number: String,
        driver_description: String,
        complaint_type: String,
        details: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            line_number,
            plate_number,
            driver_description,
            complaint_type,
            details,
            photo: None,
        }
    }
}
