//! Core types for the activity preprocessor
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: the per-sample [`Record`], the [`Sport`] classification and the
//! [`Activity`] that ties the two together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sport classification used by the moving predicate.
///
/// Serialized as its lowercase name. Deserialization goes through
/// [`Sport::from_name`], so case and short aliases are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sport {
    Running,
    Cycling,
    Walking,
    Hiking,
    Swimming,
    Generic,
    /// Any sport name not listed above
    Other(String),
}

impl Default for Sport {
    fn default() -> Self {
        Sport::Generic
    }
}

impl Sport {
    pub fn as_str(&self) -> &str {
        match self {
            Sport::Running => "running",
            Sport::Cycling => "cycling",
            Sport::Walking => "walking",
            Sport::Hiking => "hiking",
            Sport::Swimming => "swimming",
            Sport::Generic => "generic",
            Sport::Other(name) => name.as_str(),
        }
    }

    /// Resolve a sport from its name, ignoring case. Unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "running" | "run" => Sport::Running,
            "cycling" | "ride" | "biking" => Sport::Cycling,
            "walking" | "walk" => Sport::Walking,
            "hiking" | "hike" => Sport::Hiking,
            "swimming" | "swim" => Sport::Swimming,
            "generic" | "" => Sport::Generic,
            other => Sport::Other(other.to_string()),
        }
    }
}

impl From<String> for Sport {
    fn from(name: String) -> Self {
        Sport::from_name(&name)
    }
}

impl From<Sport> for String {
    fn from(sport: Sport) -> Self {
        sport.as_str().to_string()
    }
}

/// One timestamped activity sample.
///
/// Every field except the timestamp is optional. `grade` and `pace` are only
/// ever produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Sample time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Latitude in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_lat: Option<f64>,
    /// Longitude in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_long: Option<f64>,
    /// Altitude (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Cumulative distance from the activity start (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Speed (meters/second)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Cadence (rpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<u8>,
    /// Heart rate (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u8>,
    /// Power (watts)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u16>,
    /// Temperature (celsius)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i8>,
    /// Slope (percent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
    /// Pace (seconds per kilometer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
}

impl Record {
    /// Create a record with only a timestamp set
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            position_lat: None,
            position_long: None,
            altitude: None,
            distance: None,
            speed: None,
            cadence: None,
            heart_rate: None,
            power: None,
            temperature: None,
            grade: None,
            pace: None,
        }
    }

    pub fn with_position(mut self, lat: f64, long: f64) -> Self {
        self.position_lat = Some(lat);
        self.position_long = Some(long);
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Latitude and longitude, only when both are present
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.position_lat, self.position_long) {
            (Some(lat), Some(long)) => Some((lat, long)),
            _ => None,
        }
    }

    /// Distance and altitude, only when both are present
    pub fn distance_and_altitude(&self) -> Option<(f64, f64)> {
        match (self.distance, self.altitude) {
            (Some(distance), Some(altitude)) => Some((distance, altitude)),
            _ => None,
        }
    }

    /// Whether the timestamp carries a real value rather than the zero default
    pub fn has_timestamp(&self) -> bool {
        self.timestamp != DateTime::<Utc>::default()
    }
}

/// An activity: the sport being performed and its ordered records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub sport: Sport,
    pub records: Vec<Record>,
}

impl Activity {
    pub fn new(sport: Sport, records: Vec<Record>) -> Self {
        Self { sport, records }
    }
}

/// Producer metadata attached to encoded output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Whole-activity figures computed from the processed records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub record_count: usize,
    /// Last cumulative distance (meters)
    pub total_distance_meters: Option<f64>,
    /// Time between first and last record (seconds)
    pub elapsed_seconds: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_altitude: Option<f64>,
    pub max_altitude: Option<f64>,
    /// Mean of the per-record paces (seconds per kilometer)
    pub average_pace: Option<f64>,
}

/// Encoded, preprocessed activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPayload {
    pub producer: Producer,
    pub computed_at_utc: String,
    pub sport: Sport,
    pub summary: ActivitySummary,
    pub records: Vec<Record>,
}
