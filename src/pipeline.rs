//! Pipeline orchestration
//!
//! This module provides the public API of the preprocessor. The
//! [`Preprocessor`] exposes every stage individually and runs them in the
//! canonical order:
//! 1. Aggregator - merge records sharing a timestamp
//! 2. DistanceImputer - fill distance and speed
//! 3. ElevationSmoother - smooth altitude
//! 4. GradeCalculator - derive grade
//! 5. PaceCalculator - derive pace

use crate::aggregator::Aggregator;
use crate::config::PreprocessorConfig;
use crate::distance::DistanceImputer;
use crate::elevation::ElevationSmoother;
use crate::encoder::ActivityEncoder;
use crate::error::PreprocessError;
use crate::grade::GradeCalculator;
use crate::moving::{MovingPredicate, SpeedThreshold};
use crate::pace::PaceCalculator;
use crate::schema::RecordAdapter;
use crate::types::{Activity, Record, Sport};
use log::debug;

/// Convert a JSON activity document into an encoded, preprocessed payload.
///
/// # Arguments
/// * `raw_json` - Activity JSON: `{"sport": "running", "records": [...]}`
/// * `config` - Pipeline configuration
///
/// # Example
/// ```ignore
/// let payload = preprocess_json(activity_json, &PreprocessorConfig::default())?;
/// ```
pub fn preprocess_json(raw_json: &str, config: &PreprocessorConfig) -> Result<String, PreprocessError> {
    let mut activity = RecordAdapter::parse_activity(raw_json)?;

    let preprocessor = Preprocessor::with_config(config.clone());
    preprocessor.process(&mut activity);

    ActivityEncoder::new().encode_to_json(&activity)
}

/// Selection of pipeline stages to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub aggregate: bool,
    pub distance: bool,
    pub elevation: bool,
    pub grade: bool,
    pub pace: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self::all()
    }
}

impl Stages {
    pub fn all() -> Self {
        Self {
            aggregate: true,
            distance: true,
            elevation: true,
            grade: true,
            pace: true,
        }
    }

    pub fn none() -> Self {
        Self {
            aggregate: false,
            distance: false,
            elevation: false,
            grade: false,
            pace: false,
        }
    }
}

/// Activity record preprocessor.
///
/// Holds read-only configuration only, so one instance can be shared across
/// threads processing independent activities.
pub struct Preprocessor {
    config: PreprocessorConfig,
    predicate: Box<dyn MovingPredicate + Send + Sync>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    /// Create a preprocessor with default settings
    pub fn new() -> Self {
        Self::with_config(PreprocessorConfig::default())
    }

    pub fn with_config(config: PreprocessorConfig) -> Self {
        Self {
            config,
            predicate: Box::new(SpeedThreshold),
        }
    }

    /// Replace the moving predicate consulted by the pace stage
    pub fn with_moving_predicate<P>(mut self, predicate: P) -> Self
    where
        P: MovingPredicate + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Merge records sharing a timestamp, returning the shortened sequence
    pub fn aggregate_by_timestamp(&self, records: Vec<Record>) -> Vec<Record> {
        Aggregator::aggregate(records)
    }

    /// Fill in missing distance and speed
    pub fn calculate_distance_and_speed(&self, records: &mut [Record]) {
        DistanceImputer::impute(records);
    }

    /// Smooth altitude with the configured trailing window
    pub fn smooth_elevation(&self, records: &mut [Record]) {
        ElevationSmoother::new(self.config.smoothing_distance(), self.config.smoothing_mode())
            .smooth(records);
    }

    /// Derive grade with the configured look-ahead window
    pub fn calculate_grade(&self, records: &mut [Record]) {
        GradeCalculator::new(self.config.grade_distance()).calculate(records);
    }

    /// Derive pace for the given sport
    pub fn calculate_pace(&self, sport: &Sport, records: &mut [Record]) {
        PaceCalculator::calculate(sport, self.predicate.as_ref(), records);
    }

    /// Run every stage in canonical order
    pub fn process(&self, activity: &mut Activity) {
        self.process_with(activity, &Stages::all());
    }

    /// Run the selected stages in canonical order
    pub fn process_with(&self, activity: &mut Activity, stages: &Stages) {
        let input_len = activity.records.len();

        if stages.aggregate {
            let records = std::mem::take(&mut activity.records);
            activity.records = self.aggregate_by_timestamp(records);
        }
        if stages.distance {
            self.calculate_distance_and_speed(&mut activity.records);
        }
        if stages.elevation {
            self.smooth_elevation(&mut activity.records);
        }
        if stages.grade {
            self.calculate_grade(&mut activity.records);
        }
        if stages.pace {
            self.calculate_pace(&activity.sport, &mut activity.records);
        }

        debug!(
            "preprocessed {} activity: {} records in, {} out",
            activity.sport.as_str(),
            input_len,
            activity.records.len()
        );
    }

    /// Process independent activities in parallel
    #[cfg(feature = "parallel")]
    pub fn process_batch(&self, activities: &mut [Activity]) {
        use rayon::prelude::*;

        activities
            .par_iter_mut()
            .for_each(|activity| self.process(activity));
    }

    /// Process independent activities one after another
    #[cfg(not(feature = "parallel"))]
    pub fn process_batch(&self, activities: &mut [Activity]) {
        for activity in activities.iter_mut() {
            self.process(activity);
        }
    }
}
