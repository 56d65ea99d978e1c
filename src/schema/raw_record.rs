//! Serialized record schema
//!
//! `RawRecord` is the JSON shape of one activity sample as produced by an
//! upstream decoder. Integer sensor fields are read wide and checked against
//! the width of the [`Record`] field they end up in, so an out-of-range value
//! is reported instead of silently wrapping.

use crate::error::PreprocessError;
use crate::types::{Record, Sport};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One serialized activity sample
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    /// Sample time (UTC, RFC 3339)
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, alias = "lat")]
    pub position_lat: Option<f64>,
    #[serde(default, alias = "long", alias = "lon")]
    pub position_long: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub cadence: Option<i64>,
    #[serde(default)]
    pub heart_rate: Option<i64>,
    #[serde(default)]
    pub power: Option<i64>,
    #[serde(default)]
    pub temperature: Option<i64>,
}

/// Serialized activity: sport plus records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActivity {
    #[serde(default)]
    pub sport: Sport,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl RawRecord {
    /// Check the record on its own. `index` is used in error reports.
    pub fn validate(&self, index: usize) -> Result<(), PreprocessError> {
        if self.timestamp.is_none() {
            return Err(PreprocessError::MissingField(format!(
                "timestamp (record {index})"
            )));
        }

        match (self.position_lat, self.position_long) {
            (Some(lat), Some(long)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(PreprocessError::InvalidPosition {
                        index,
                        reason: format!("latitude {lat} outside -90..90"),
                    });
                }
                if !(-180.0..=180.0).contains(&long) {
                    return Err(PreprocessError::InvalidPosition {
                        index,
                        reason: format!("longitude {long} outside -180..180"),
                    });
                }
            }
            (None, None) => {}
            _ => {
                return Err(PreprocessError::InvalidPosition {
                    index,
                    reason: "latitude and longitude must be given together".to_string(),
                })
            }
        }

        narrow::<u8>("cadence", self.cadence)?;
        narrow::<u8>("heart_rate", self.heart_rate)?;
        narrow::<u16>("power", self.power)?;
        narrow::<i8>("temperature", self.temperature)?;

        Ok(())
    }

    /// Validate and convert into a pipeline [`Record`]
    pub fn into_record(self, index: usize) -> Result<Record, PreprocessError> {
        self.validate(index)?;

        let timestamp = self
            .timestamp
            .ok_or_else(|| PreprocessError::MissingField(format!("timestamp (record {index})")))?;

        Ok(Record {
            timestamp,
            position_lat: self.position_lat,
            position_long: self.position_long,
            altitude: self.altitude,
            distance: self.distance,
            speed: self.speed,
            cadence: narrow("cadence", self.cadence)?,
            heart_rate: narrow("heart_rate", self.heart_rate)?,
            power: narrow("power", self.power)?,
            temperature: narrow("temperature", self.temperature)?,
            grade: None,
            pace: None,
        })
    }
}

/// Narrow a wide integer into the target field width
fn narrow<T>(field: &'static str, value: Option<i64>) -> Result<Option<T>, PreprocessError>
where
    T: TryFrom<i64>,
{
    value
        .map(|v| {
            T::try_from(v).map_err(|_| PreprocessError::OutOfRange {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}
