//! Test-point repository and processing pipeline for flight-test air data
//! system calibration.
//!
//! This crate provides tools for:
//! - Loading per-maneuver flight datasets ("test points") from channel CSVs
//! - Enforcing label uniqueness and channel-shape invariants at ingest
//! - Summarizing the flight regime of each maneuver (speed range, altitude
//!   envelope, level-turn detection)
//! - Driving a per-point survey workflow against a pluggable calibration
//!   solver, with ordered progress messages
//!
//! # Example
//!
//! ```no_run
//! use airdata_pipeline::{
//!     load_channel_csv, ChannelMap, ChannelSet, SurveyEstimator, SurveySolver,
//! };
//!
//! struct SampleCounter;
//!
//! impl SurveySolver for SampleCounter {
//!     type Output = usize;
//!
//!     fn survey(&self, channels: &ChannelSet<'_>) -> anyhow::Result<usize> {
//!         Ok(channels.num_samples())
//!     }
//! }
//!
//! let mut estimator = SurveyEstimator::new(ChannelMap::identity(), SampleCounter);
//! let table = load_channel_csv("flight1.csv").unwrap();
//! estimator.add_test_point("flight1.csv", table).unwrap();
//! estimator.process_all(None).unwrap();
//! ```

pub mod config;
pub mod core;
pub mod estimator;
pub mod messages;
pub mod processors;

pub use config::{Channel, ChannelMap, ConfigError};
pub use core::dataset::{ChannelError, ChannelTable, ParameterAccessor};
pub use core::loader::{load_channel_csv, LoaderError};
pub use estimator::SurveyEstimator;
pub use messages::{MessageCatalog, MessageId, MessageVars};
pub use processors::pipeline::{
    ChannelSet, PointState, ProcessError, ReprocessPolicy, SurveyPipeline, SurveySolver,
};
pub use processors::store::{derive_label, StoreError, TestPoint, TestPointStore};
pub use processors::summary::{compute_summary, SummaryRecord, TURN_THRESHOLD_DEG};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
