//! Pace calculation
//!
//! Pace is time per kilometer, derived only while the athlete is moving.

use crate::distance::elapsed_seconds;
use crate::moving::MovingPredicate;
use crate::types::{Record, Sport};

/// Sport-aware pace derivation
pub struct PaceCalculator;

impl PaceCalculator {
    /// Calculate pace in seconds per kilometer.
    ///
    /// Recorded speed takes precedence; without it pace comes from the time
    /// and distance covered since the previous record.
    pub fn calculate<P>(sport: &Sport, predicate: &P, records: &mut [Record])
    where
        P: MovingPredicate + ?Sized,
    {
        for i in 1..records.len() {
            let (head, tail) = records.split_at_mut(i);
            let prev = &head[i - 1];
            let rec = &mut tail[0];

            let (Some(distance), Some(prev_distance)) = (rec.distance, prev.distance) else {
                continue;
            };
            if !rec.has_timestamp() || !prev.has_timestamp() {
                continue;
            }
            if !predicate.is_moving(sport, rec.speed) {
                continue;
            }

            match rec.speed {
                None => {
                    let point_distance_km = (distance - prev_distance) / 1000.0;
                    if point_distance_km == 0.0 {
                        continue;
                    }
                    rec.pace = Some(elapsed_seconds(prev, rec) / point_distance_km);
                }
                Some(speed) => {
                    let speed_kph = speed * 3.6;
                    if speed_kph <= 0.0 {
                        continue;
                    }
                    rec.pace = Some(3600.0 / speed_kph);
                }
            }
        }
    }
}
