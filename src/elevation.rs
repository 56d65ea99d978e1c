//! Elevation smoothing
//!
//! Barometric and GPS altitude are noisy sample to sample. Each altitude is
//! replaced by a trailing, distance-windowed moving average: the mean of the
//! altitudes of the record itself and of every earlier record within the
//! window. The filter is causal, it never looks ahead.

use crate::config::{SmoothingMode, DEFAULT_SMOOTHING_DISTANCE};
use crate::types::Record;

/// Trailing moving-average filter over altitude
#[derive(Debug, Clone, Copy)]
pub struct ElevationSmoother {
    window_meters: f64,
    mode: SmoothingMode,
}

impl Default for ElevationSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_DISTANCE, SmoothingMode::default())
    }
}

impl ElevationSmoother {
    pub fn new(window_meters: f64, mode: SmoothingMode) -> Self {
        Self {
            window_meters,
            mode,
        }
    }

    /// Smooth altitudes in place.
    ///
    /// Records missing distance or altitude are left as they are and do not
    /// take part in any window. The scan backward stops at the first record
    /// further away than the window.
    pub fn smooth(&self, records: &mut [Record]) {
        let mut samples: Vec<Option<(f64, f64)>> =
            records.iter().map(Record::distance_and_altitude).collect();

        for (i, rec) in records.iter_mut().enumerate() {
            let Some(altitude) = self.window_mean(&samples, i) else {
                continue;
            };
            rec.altitude = Some(altitude);

            if self.mode == SmoothingMode::Progressive {
                if let Some(sample) = samples[i].as_mut() {
                    sample.1 = altitude;
                }
            }
        }
    }

    /// Mean altitude of the window ending at `index`, or `None` when the
    /// sample at `index` lacks distance or altitude.
    fn window_mean(&self, samples: &[Option<(f64, f64)>], index: usize) -> Option<f64> {
        let (distance, _) = samples[index]?;

        let mut sum = 0.0;
        let mut count = 0usize;
        for (prev_distance, prev_altitude) in samples[..=index].iter().rev().flatten() {
            if distance - prev_distance > self.window_meters {
                break;
            }
            sum += prev_altitude;
            count += 1;
        }

        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn profile(samples: &[(f64, f64)]) -> Vec<Record> {
        samples
            .iter()
            .enumerate()
            .map(|(i, &(distance, altitude))| {
                Record::new(at(i as i64))
                    .with_distance(distance)
                    .with_altitude(altitude)
            })
            .collect()
    }

    fn altitudes(records: &[Record]) -> Vec<Option<f64>> {
        records.iter().map(|r| r.altitude).collect()
    }

    #[test]
    fn test_flat_profile_unchanged() {
        for window in [1.0, 30.0, 1000.0] {
            for mode in [SmoothingMode::Original, SmoothingMode::Progressive] {
                let mut records = profile(&[(0.0, 50.0), (10.0, 50.0), (20.0, 50.0), (45.0, 50.0)]);
                ElevationSmoother::new(window, mode).smooth(&mut records);
                assert!(altitudes(&records).iter().all(|a| *a == Some(50.0)));
            }
        }
    }

    #[test]
    fn test_smoothing_from_original_readings() {
        let mut records = profile(&[(0.0, 10.0), (10.0, 20.0), (20.0, 30.0), (50.0, 40.0)]);

        ElevationSmoother::new(30.0, SmoothingMode::Original).smooth(&mut records);

        assert_eq!(
            altitudes(&records),
            vec![
                Some(10.0),
                Some(15.0), // (10 + 20) / 2
                Some(20.0), // (10 + 20 + 30) / 3
                Some(35.0), // (30 + 40) / 2, 0 m and 10 m are beyond the window
            ]
        );
    }

    #[test]
    fn test_progressive_smoothing_reads_smoothed_values() {
        let mut records = profile(&[(0.0, 10.0), (10.0, 20.0), (20.0, 30.0), (50.0, 40.0)]);

        ElevationSmoother::new(30.0, SmoothingMode::Progressive).smooth(&mut records);

        assert_eq!(
            altitudes(&records),
            vec![
                Some(10.0),
                Some(15.0),                        // (10 + 20) / 2
                Some((10.0 + 15.0 + 30.0) / 3.0), // earlier values already smoothed
                Some(((10.0 + 15.0 + 30.0) / 3.0 + 40.0) / 2.0),
            ]
        );
    }

    #[test]
    fn test_incomplete_records_are_skipped_not_window_breaking() {
        let mut records = profile(&[(0.0, 10.0), (10.0, 20.0), (20.0, 30.0)]);
        records[1].altitude = None;

        ElevationSmoother::default().smooth(&mut records);

        assert_eq!(records[1].altitude, None);
        assert_eq!(records[2].altitude, Some(20.0)); // (10 + 30) / 2
    }

    #[test]
    fn test_record_without_distance_keeps_altitude() {
        let mut records = vec![
            Record::new(at(0)).with_altitude(100.0),
            Record::new(at(1)).with_distance(5.0).with_altitude(110.0),
        ];

        ElevationSmoother::default().smooth(&mut records);

        assert_eq!(records[0].altitude, Some(100.0));
        assert_eq!(records[1].altitude, Some(110.0));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let mut records = profile(&[(0.0, 0.0), (30.0, 60.0)]);

        ElevationSmoother::new(30.0, SmoothingMode::Original).smooth(&mut records);

        assert_eq!(records[1].altitude, Some(30.0));
    }
}
