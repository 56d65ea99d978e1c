//! Output encoding
//!
//! This module wraps a processed activity into an [`ActivityPayload`]: producer
//! metadata, a whole-activity summary and the records themselves.

use crate::error::PreprocessError;
use crate::types::{Activity, ActivityPayload, ActivitySummary, Producer, Record};
use crate::{PREPROCESSOR_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Encoder for preprocessed activities
pub struct ActivityEncoder {
    instance_id: String,
}

impl Default for ActivityEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode a processed activity into a payload
    pub fn encode(&self, activity: &Activity) -> Result<ActivityPayload, PreprocessError> {
        let producer = Producer {
            name: PRODUCER_NAME.to_string(),
            version: PREPROCESSOR_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        Ok(ActivityPayload {
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            sport: activity.sport.clone(),
            summary: summarize(&activity.records),
            records: activity.records.clone(),
        })
    }

    /// Encode to a compact JSON string
    pub fn encode_to_json(&self, activity: &Activity) -> Result<String, PreprocessError> {
        let payload = self.encode(activity)?;
        serde_json::to_string(&payload).map_err(|e| PreprocessError::EncodingError(e.to_string()))
    }

    /// Encode to an indented JSON string
    pub fn encode_to_json_pretty(&self, activity: &Activity) -> Result<String, PreprocessError> {
        let payload = self.encode(activity)?;
        serde_json::to_string_pretty(&payload)
            .map_err(|e| PreprocessError::EncodingError(e.to_string()))
    }

    /// Encode each record on its own line, without the envelope
    pub fn encode_to_ndjson(&self, activity: &Activity) -> Result<String, PreprocessError> {
        let mut out = String::new();
        for record in &activity.records {
            let line = serde_json::to_string(record)
                .map_err(|e| PreprocessError::EncodingError(e.to_string()))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Compute whole-activity figures. Absent values are ignored.
pub fn summarize(records: &[Record]) -> ActivitySummary {
    let total_distance_meters = records.iter().rev().find_map(|r| r.distance);

    let elapsed_seconds = match (records.first(), records.last()) {
        (Some(first), Some(last)) if first.has_timestamp() && last.has_timestamp() => {
            Some((last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0)
        }
        _ => None,
    };

    let paces: Vec<f64> = records.iter().filter_map(|r| r.pace).collect();
    let average_pace = if paces.is_empty() {
        None
    } else {
        Some(paces.iter().sum::<f64>() / paces.len() as f64)
    };

    ActivitySummary {
        record_count: records.len(),
        total_distance_meters,
        elapsed_seconds,
        max_speed: records.iter().filter_map(|r| r.speed).reduce(f64::max),
        min_altitude: records.iter().filter_map(|r| r.altitude).reduce(f64::min),
        max_altitude: records.iter().filter_map(|r| r.altitude).reduce(f64::max),
        average_pace,
    }
}
