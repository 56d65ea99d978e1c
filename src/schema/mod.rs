//! Serialized record schema
//!
//! This module defines the JSON input accepted by the preprocessor, either as
//! a bare record array, as NDJSON records, or as an activity document that
//! also carries the sport.

mod adapter;
mod raw_record;

pub use adapter::*;
pub use raw_record::*;
