//! Adapter for converting serialized records into pipeline records
//!
//! Decoding is all-or-nothing: the first malformed or out-of-range record
//! aborts the whole document.

use crate::error::PreprocessError;
use crate::schema::raw_record::{RawActivity, RawRecord};
use crate::types::{Activity, Record};
use log::debug;

/// Adapter for converting raw records to pipeline records
pub struct RecordAdapter;

impl RecordAdapter {
    /// Parse a JSON array of raw records without validating them
    pub fn parse_raw_array(json: &str) -> Result<Vec<RawRecord>, PreprocessError> {
        let records: Vec<RawRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) raw records without validating them
    pub fn parse_raw_ndjson(ndjson: &str) -> Result<Vec<RawRecord>, PreprocessError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(PreprocessError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Parse and validate a JSON array of records
    pub fn parse_array(json: &str) -> Result<Vec<Record>, PreprocessError> {
        Self::to_records(Self::parse_raw_array(json)?)
    }

    /// Parse and validate NDJSON records
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<Record>, PreprocessError> {
        Self::to_records(Self::parse_raw_ndjson(ndjson)?)
    }

    /// Parse and validate an activity document: `{"sport": ..., "records": [...]}`
    pub fn parse_activity(json: &str) -> Result<Activity, PreprocessError> {
        let raw: RawActivity = serde_json::from_str(json)?;
        let records = Self::to_records(raw.records)?;
        Ok(Activity::new(raw.sport, records))
    }

    /// Validate raw records and convert them, checking timestamp order
    pub fn to_records(raw: Vec<RawRecord>) -> Result<Vec<Record>, PreprocessError> {
        let mut records: Vec<Record> = Vec::with_capacity(raw.len());

        for (index, raw_record) in raw.into_iter().enumerate() {
            let record = raw_record.into_record(index)?;
            if let Some(prev) = records.last() {
                if record.timestamp < prev.timestamp {
                    return Err(PreprocessError::UnorderedTimestamps { index });
                }
            }
            records.push(record);
        }

        debug!("decoded {} records", records.len());
        Ok(records)
    }

    /// Validate a batch of raw records, returning only the failures
    pub fn validate_records(records: &[RawRecord]) -> Vec<ValidationResult> {
        let mut failures = Vec::new();
        let mut prev_timestamp = None;

        for (index, record) in records.iter().enumerate() {
            if let Err(error) = record.validate(index) {
                failures.push(ValidationResult { index, error });
                continue;
            }

            if let (Some(prev), Some(ts)) = (prev_timestamp, record.timestamp) {
                if ts < prev {
                    failures.push(ValidationResult {
                        index,
                        error: PreprocessError::UnorderedTimestamps { index },
                    });
                    continue;
                }
            }
            prev_timestamp = record.timestamp;
        }

        failures
    }
}

/// A record that failed validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub error: PreprocessError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sport;

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"timestamp": "2024-01-15T08:00:00Z", "distance": 0.0},
            {"timestamp": "2024-01-15T08:00:01Z", "distance": 3.1}
        ]"#;

        let records = RecordAdapter::parse_array(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].distance, Some(3.1));
    }

    #[test]
    fn test_parse_ndjson() {
        let ndjson = "{\"timestamp\": \"2024-01-15T08:00:00Z\"}\n\n{\"timestamp\": \"2024-01-15T08:00:01Z\", \"cadence\": 88}\n";

        let records = RecordAdapter::parse_ndjson(ndjson).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].cadence, Some(88));
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let ndjson = "{\"timestamp\": \"2024-01-15T08:00:00Z\"}\n{not json}\n";

        match RecordAdapter::parse_ndjson(ndjson) {
            Err(PreprocessError::ParseError(msg)) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_activity() {
        let json = r#"{
            "sport": "cycling",
            "records": [{"timestamp": "2024-01-15T08:00:00Z", "power": 210}]
        }"#;

        let activity = RecordAdapter::parse_activity(json).unwrap();
        assert_eq!(activity.sport, Sport::Cycling);
        assert_eq!(activity.records[0].power, Some(210));
    }

    #[test]
    fn test_parse_activity_defaults_sport() {
        let activity = RecordAdapter::parse_activity(r#"{"records": []}"#).unwrap();
        assert_eq!(activity.sport, Sport::Generic);
        assert!(activity.records.is_empty());
    }

    #[test]
    fn test_out_of_range_aborts_decoding() {
        let json = r#"[
            {"timestamp": "2024-01-15T08:00:00Z", "power": 100},
            {"timestamp": "2024-01-15T08:00:01Z", "power": 70000}
        ]"#;

        let result = RecordAdapter::parse_array(json);
        assert!(matches!(
            result,
            Err(PreprocessError::OutOfRange { field: "power", .. })
        ));
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let json = r#"[
            {"timestamp": "2024-01-15T08:00:05Z"},
            {"timestamp": "2024-01-15T08:00:05Z"},
            {"timestamp": "2024-01-15T08:00:01Z"}
        ]"#;

        let result = RecordAdapter::parse_array(json);
        assert!(matches!(
            result,
            Err(PreprocessError::UnorderedTimestamps { index: 2 })
        ));
    }

    #[test]
    fn test_malformed_structure() {
        let result = RecordAdapter::parse_array(r#"{"timestamp": "2024-01-15T08:00:00Z"}"#);
        assert!(matches!(result, Err(PreprocessError::JsonError(_))));
    }

    #[test]
    fn test_validate_records_collects_failures() {
        let json = r#"[
            {"timestamp": "2024-01-15T08:00:00Z"},
            {"timestamp": "2024-01-15T08:00:02Z", "heart_rate": 999},
            {"altitude": 5.0},
            {"timestamp": "2024-01-15T08:00:01Z"},
            {"timestamp": "2024-01-15T08:00:03Z"}
        ]"#;

        let raw = RecordAdapter::parse_raw_array(json).unwrap();
        let failures = RecordAdapter::validate_records(&raw);

        let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(matches!(
            failures[0].error,
            PreprocessError::OutOfRange { .. }
        ));
        assert!(matches!(
            failures[1].error,
            PreprocessError::MissingField(_)
        ));
    }
}
