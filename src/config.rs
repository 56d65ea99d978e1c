//! Preprocessor configuration
//!
//! Two distance windows tune the pipeline. Non-positive or non-finite values
//! are ignored and the default is kept.

use crate::error::PreprocessError;
use serde::{Deserialize, Serialize};

/// Default elevation smoothing window in meters
pub const DEFAULT_SMOOTHING_DISTANCE: f64 = 30.0;

/// Default grade look-ahead window in meters
pub const DEFAULT_GRADE_DISTANCE: f64 = 100.0;

/// Which altitude values the elevation smoother averages over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Average the altitudes as they were before smoothing started
    #[default]
    Original,
    /// Average earlier altitudes that have already been smoothed
    Progressive,
}

/// Read-only pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Backward window for elevation smoothing (meters)
    smoothing_distance: f64,
    /// Forward window for grade calculation (meters)
    grade_distance: f64,
    /// Elevation smoothing source
    smoothing_mode: SmoothingMode,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            smoothing_distance: DEFAULT_SMOOTHING_DISTANCE,
            grade_distance: DEFAULT_GRADE_DISTANCE,
            smoothing_mode: SmoothingMode::default(),
        }
    }
}

impl PreprocessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the elevation smoothing window. Ignored unless positive.
    pub fn with_smoothing_distance(mut self, meters: f64) -> Self {
        if is_valid_distance(meters) {
            self.smoothing_distance = meters;
        }
        self
    }

    /// Set the grade look-ahead window. Ignored unless positive.
    pub fn with_grade_distance(mut self, meters: f64) -> Self {
        if is_valid_distance(meters) {
            self.grade_distance = meters;
        }
        self
    }

    pub fn with_smoothing_mode(mut self, mode: SmoothingMode) -> Self {
        self.smoothing_mode = mode;
        self
    }

    pub fn smoothing_distance(&self) -> f64 {
        self.smoothing_distance
    }

    pub fn grade_distance(&self) -> f64 {
        self.grade_distance
    }

    pub fn smoothing_mode(&self) -> SmoothingMode {
        self.smoothing_mode
    }

    /// Load configuration from JSON. Missing keys take their defaults and
    /// invalid distances fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, PreprocessError> {
        let raw: PreprocessorConfig =
            serde_json::from_str(json).map_err(|e| PreprocessError::Config(e.to_string()))?;

        Ok(Self::default()
            .with_smoothing_distance(raw.smoothing_distance)
            .with_grade_distance(raw.grade_distance)
            .with_smoothing_mode(raw.smoothing_mode))
    }

    pub fn to_json(&self) -> Result<String, PreprocessError> {
        serde_json::to_string_pretty(self).map_err(|e| PreprocessError::Config(e.to_string()))
    }
}

fn is_valid_distance(meters: f64) -> bool {
    meters.is_finite() && meters > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreprocessorConfig::default();
        assert_eq!(config.smoothing_distance(), 30.0);
        assert_eq!(config.grade_distance(), 100.0);
        assert_eq!(config.smoothing_mode(), SmoothingMode::Original);
    }

    #[test]
    fn test_non_positive_values_are_ignored() {
        let config = PreprocessorConfig::new()
            .with_smoothing_distance(0.0)
            .with_grade_distance(-5.0);
        assert_eq!(config.smoothing_distance(), DEFAULT_SMOOTHING_DISTANCE);
        assert_eq!(config.grade_distance(), DEFAULT_GRADE_DISTANCE);

        let config = PreprocessorConfig::new().with_smoothing_distance(f64::NAN);
        assert_eq!(config.smoothing_distance(), DEFAULT_SMOOTHING_DISTANCE);
    }

    #[test]
    fn test_valid_values_are_applied() {
        let config = PreprocessorConfig::new()
            .with_smoothing_distance(50.0)
            .with_grade_distance(200.0)
            .with_smoothing_mode(SmoothingMode::Progressive);
        assert_eq!(config.smoothing_distance(), 50.0);
        assert_eq!(config.grade_distance(), 200.0);
        assert_eq!(config.smoothing_mode(), SmoothingMode::Progressive);
    }

    #[test]
    fn test_from_json() {
        let config = PreprocessorConfig::from_json(r#"{"grade_distance": 150.0}"#).unwrap();
        assert_eq!(config.smoothing_distance(), DEFAULT_SMOOTHING_DISTANCE);
        assert_eq!(config.grade_distance(), 150.0);

        let config = PreprocessorConfig::from_json(
            r#"{"smoothing_distance": -1, "smoothing_mode": "progressive"}"#,
        )
        .unwrap();
        assert_eq!(config.smoothing_distance(), DEFAULT_SMOOTHING_DISTANCE);
        assert_eq!(config.smoothing_mode(), SmoothingMode::Progressive);
    }

    #[test]
    fn test_from_invalid_json() {
        let result = PreprocessorConfig::from_json("not json");
        assert!(matches!(result, Err(PreprocessError::Config(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let config = PreprocessorConfig::new().with_grade_distance(75.0);
        let json = config.to_json().unwrap();
        assert_eq!(PreprocessorConfig::from_json(&json).unwrap(), config);
    }
}
