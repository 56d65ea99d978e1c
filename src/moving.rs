//! Moving detection
//!
//! Pace is only meaningful while the athlete is moving. Whether a sample
//! counts as moving depends on the sport and on the instantaneous speed; the
//! pipeline consumes that decision through [`MovingPredicate`].

use crate::types::Sport;

/// Decides whether a sample of a given sport counts as moving
pub trait MovingPredicate {
    fn is_moving(&self, sport: &Sport, speed: Option<f64>) -> bool;
}

impl<F> MovingPredicate for F
where
    F: Fn(&Sport, Option<f64>) -> bool,
{
    fn is_moving(&self, sport: &Sport, speed: Option<f64>) -> bool {
        self(sport, speed)
    }
}

/// Default predicate: moving when speed reaches a per-sport threshold.
///
/// A sample without speed is treated as moving, the pace is then derived
/// from the distance and time deltas instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedThreshold;

impl SpeedThreshold {
    /// Minimum speed in m/s considered moving for the sport
    pub fn threshold(sport: &Sport) -> f64 {
        match sport {
            Sport::Running => 1.0,
            Sport::Cycling => 1.4,
            Sport::Walking | Sport::Hiking => 0.5,
            Sport::Swimming => 0.2,
            Sport::Generic | Sport::Other(_) => 0.5,
        }
    }
}

impl MovingPredicate for SpeedThreshold {
    fn is_moving(&self, sport: &Sport, speed: Option<f64>) -> bool {
        match speed {
            Some(speed) => speed >= Self::threshold(sport),
            None => true,
        }
    }
}

/// Convenience wrapper around [`SpeedThreshold`]
pub fn is_considered_moving(sport: &Sport, speed: Option<f64>) -> bool {
    SpeedThreshold.is_moving(sport, speed)
}
