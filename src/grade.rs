//! Grade calculation
//!
//! Slope is estimated looking forward from each record. The farthest record
//! still inside the look-ahead window is used as the far end of the slope,
//! which damps the noise a single neighbouring sample would give.

use crate::config::DEFAULT_GRADE_DISTANCE;
use crate::types::Record;

/// Forward-looking grade estimator
#[derive(Debug, Clone, Copy)]
pub struct GradeCalculator {
    window_meters: f64,
}

impl Default for GradeCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_GRADE_DISTANCE)
    }
}

impl GradeCalculator {
    pub fn new(window_meters: f64) -> Self {
        Self { window_meters }
    }

    /// Calculate grade percentage in place.
    ///
    /// For every record with distance and altitude, rise and run are taken
    /// against the last later record whose run is within the window. No grade
    /// is set when rise or run is zero.
    pub fn calculate(&self, records: &mut [Record]) {
        for i in 0..records.len() {
            let Some((distance, altitude)) = records[i].distance_and_altitude() else {
                continue;
            };

            let mut rise = 0.0;
            let mut run = 0.0;
            for (next_distance, next_altitude) in records[i + 1..]
                .iter()
                .filter_map(Record::distance_and_altitude)
            {
                let d = next_distance - distance;
                if d > self.window_meters {
                    break;
                }
                rise = next_altitude - altitude;
                run = d;
            }

            if rise == 0.0 || run == 0.0 {
                continue;
            }

            records[i].grade = Some(rise / run * 100.0);
        }
    }
}
