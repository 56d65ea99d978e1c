//! Distance and speed imputation
//!
//! Fills in cumulative distance from consecutive GPS fixes when the device did
//! not record it, and derives speed from the distance covered between samples.

use crate::geodesic::vincenty_distance;
use crate::types::Record;
use log::trace;

/// Imputes missing distance and speed values
pub struct DistanceImputer;

impl DistanceImputer {
    /// Calculate distance from coordinates and speed from distance deltas
    /// wherever they are missing. Recorded values are never overwritten.
    pub fn impute(records: &mut [Record]) {
        for i in 1..records.len() {
            let (head, tail) = records.split_at_mut(i);
            let prev = &head[i - 1];
            let rec = &mut tail[0];

            let mut point_distance = 0.0;
            match rec.distance {
                None => {
                    if let (Some((lat, long)), Some((prev_lat, prev_long))) =
                        (rec.position(), prev.position())
                    {
                        point_distance = vincenty_distance(lat, long, prev_lat, prev_long);
                        rec.distance = Some(prev.distance.unwrap_or(0.0) + point_distance);
                    }
                }
                Some(distance) => {
                    if let Some(prev_distance) = prev.distance {
                        point_distance = distance - prev_distance;
                    }
                }
            }

            if rec.speed.is_none() && point_distance > 0.0 {
                let elapsed = elapsed_seconds(prev, rec);
                if elapsed > 0.0 {
                    rec.speed = Some(point_distance / elapsed);
                } else {
                    trace!("record {i}: no elapsed time, speed left unset");
                }
            }
        }
    }
}

/// Seconds between two records, negative when out of order
pub(crate) fn elapsed_seconds(prev: &Record, rec: &Record) -> f64 {
    let delta = rec.timestamp - prev.timestamp;
    delta.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn test_coincident_coordinates_give_zero_distance() {
        let mut records = vec![
            Record::new(at(0)).with_position(51.5, -0.12),
            Record::new(at(1)).with_position(51.5, -0.12),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].distance, Some(0.0));
        // Zero distance covered, so no speed is derived.
        assert_eq!(records[1].speed, None);
    }

    #[test]
    fn test_distance_and_speed_from_coordinates() {
        let mut records = vec![
            Record::new(at(0)).with_position(0.0, 0.0),
            Record::new(at(10)).with_position(0.001, 0.0),
        ];

        DistanceImputer::impute(&mut records);

        // The first record has no predecessor and stays untouched.
        assert_eq!(records[0].distance, None);

        let distance = records[1].distance.unwrap();
        assert!((distance - 110.57).abs() < 0.1, "got {distance}");

        let speed = records[1].speed.unwrap();
        assert!((speed - distance / 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_monotonic() {
        let mut records: Vec<Record> = (0..20)
            .map(|i| {
                let offset = i as f64 * 0.0003;
                Record::new(at(i)).with_position(45.0 + offset, 7.0 + offset / 2.0)
            })
            .collect();

        DistanceImputer::impute(&mut records);

        let distances: Vec<f64> = records.iter().skip(1).map(|r| r.distance.unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_recorded_distance_is_kept_and_used_for_speed() {
        let mut records = vec![
            Record::new(at(0)).with_distance(100.0).with_position(0.0, 0.0),
            Record::new(at(4)).with_distance(120.0).with_position(1.0, 1.0),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].distance, Some(120.0));
        assert_eq!(records[1].speed, Some(5.0));
    }

    #[test]
    fn test_recorded_speed_is_not_overwritten() {
        let mut records = vec![
            Record::new(at(0)).with_distance(0.0),
            Record::new(at(2)).with_distance(10.0).with_speed(3.3),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].speed, Some(3.3));
    }

    #[test]
    fn test_previous_distance_missing_starts_from_zero() {
        let mut records = vec![
            Record::new(at(0)).with_position(0.0, 0.0),
            Record::new(at(1)).with_position(0.0, 0.0001),
        ];

        DistanceImputer::impute(&mut records);

        let distance = records[1].distance.unwrap();
        assert!(distance > 11.0 && distance < 11.2, "got {distance}");
    }

    #[test]
    fn test_no_speed_without_elapsed_time() {
        let mut records = vec![
            Record::new(at(5)).with_distance(0.0),
            Record::new(at(5)).with_distance(10.0),
            Record::new(at(3)).with_distance(20.0),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].speed, None);
        assert_eq!(records[2].speed, None);
    }

    #[test]
    fn test_missing_position_leaves_distance_unset() {
        let mut records = vec![
            Record::new(at(0)).with_position(0.0, 0.0),
            Record::new(at(1)),
            Record::new(at(2)).with_position(0.0, 0.001),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].distance, None);
        assert_eq!(records[2].distance, None);
    }

    #[test]
    fn test_recorded_distance_without_previous_gives_no_speed() {
        let mut records = vec![
            Record::new(at(0)),
            Record::new(at(10)).with_distance(50.0),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].distance, Some(50.0));
        assert_eq!(records[1].speed, None);
    }

    #[test]
    fn test_decreasing_recorded_distance_gives_no_speed() {
        let mut records = vec![
            Record::new(at(0)).with_distance(80.0),
            Record::new(at(10)).with_distance(60.0),
        ];

        DistanceImputer::impute(&mut records);

        assert_eq!(records[1].distance, Some(60.0));
        assert_eq!(records[1].speed, None);
    }

    #[test]
    fn test_single_record_is_noop() {
        let mut records = vec![Record::new(at(0)).with_position(1.0, 1.0)];
        DistanceImputer::impute(&mut records);
        assert_eq!(records[0].distance, None);
    }
}
