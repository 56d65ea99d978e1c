//! Timestamp aggregation
//!
//! Some devices and platforms split one sample across several records that
//! share a timestamp. This module merges every run of consecutive records with
//! an identical timestamp into the first record of the run:
//! - Sensor and kinematic fields are averaged pairwise
//! - Coordinates are never blended, the first available fix wins

use crate::types::Record;
use log::debug;

/// Pairwise averaging in a field's own numeric domain
pub trait Mean: Copy {
    fn mean(self, other: Self) -> Self;
}

impl Mean for f64 {
    fn mean(self, other: Self) -> Self {
        (self + other) / 2.0
    }
}

macro_rules! impl_truncating_mean {
    ($($t:ty),*) => {
        $(
            impl Mean for $t {
                fn mean(self, other: Self) -> Self {
                    ((self as f64 + other as f64) / 2.0) as $t
                }
            }
        )*
    };
}

impl_truncating_mean!(u8, u16, i8);

/// Average two optional values; when only one is present it is returned
pub fn avg<T: Mean>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.mean(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// Merges records that share a timestamp
pub struct Aggregator;

impl Aggregator {
    /// Collapse each run of records with an identical timestamp into one.
    ///
    /// The first record of a run is kept and updated in place; the rest are
    /// dropped. Relative order is preserved.
    pub fn aggregate(records: Vec<Record>) -> Vec<Record> {
        let input_len = records.len();
        let mut aggregated: Vec<Record> = Vec::with_capacity(input_len);

        for record in records {
            if let Some(lead) = aggregated.last_mut() {
                if lead.timestamp == record.timestamp {
                    merge_into(lead, &record);
                    continue;
                }
            }
            aggregated.push(record);
        }

        if aggregated.len() != input_len {
            debug!(
                "aggregated {} records into {} by timestamp",
                input_len,
                aggregated.len()
            );
        }

        aggregated
    }
}

/// Fold `candidate` into the lead record of its run
fn merge_into(lead: &mut Record, candidate: &Record) {
    if lead.position_lat.is_none() {
        lead.position_lat = candidate.position_lat;
    }
    if lead.position_long.is_none() {
        lead.position_long = candidate.position_long;
    }

    lead.altitude = avg(lead.altitude, candidate.altitude);
    lead.cadence = avg(lead.cadence, candidate.cadence);
    lead.speed = avg(lead.speed, candidate.speed);
    lead.distance = avg(lead.distance, candidate.distance);
    lead.heart_rate = avg(lead.heart_rate, candidate.heart_rate);
    lead.power = avg(lead.power, candidate.power);
    lead.temperature = avg(lead.temperature, candidate.temperature);
}
