//! Activity Preprocessor - deterministic cleanup of GPS/sensor activity records
//!
//! Records decoded from a device file flow through a fixed sequence of stages:
//! timestamp aggregation → distance/speed imputation → elevation smoothing
//! → grade → pace. The processed activity is then wrapped into a JSON payload
//! with producer metadata and a summary.
//!
//! ## Modules
//!
//! - **Stages**: [`aggregator`], [`distance`], [`elevation`], [`grade`], [`pace`]
//! - **Orchestration**: [`pipeline::Preprocessor`] and [`pipeline::preprocess_json`]
//! - **Boundaries**: [`schema`] for decoding, [`encoder`] for output

pub mod aggregator;
pub mod config;
pub mod distance;
pub mod elevation;
pub mod encoder;
pub mod error;
pub mod geodesic;
pub mod grade;
pub mod moving;
pub mod pace;
pub mod pipeline;
pub mod schema;
pub mod types;

pub use config::{PreprocessorConfig, SmoothingMode};
pub use encoder::ActivityEncoder;
pub use error::PreprocessError;
pub use moving::{MovingPredicate, SpeedThreshold};
pub use pipeline::{preprocess_json, Preprocessor, Stages};
pub use types::{Activity, ActivityPayload, Record, Sport};

// Schema exports
pub use schema::{RawActivity, RawRecord, RecordAdapter};

/// Preprocessor version embedded in all payloads
pub const PREPROCESSOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for payloads
pub const PRODUCER_NAME: &str = "activity-preprocessor";
