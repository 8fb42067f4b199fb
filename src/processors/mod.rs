//! Processing components: flight-regime summaries, the test-point store,
//! and the survey workflow.

pub mod pipeline;
pub mod store;
pub mod summary;

// Re-export key types for convenience
pub use pipeline::{
    ChannelSet, PointState, ProcessError, ReprocessPolicy, SurveyPipeline, SurveySolver,
};
pub use store::{derive_label, StoreError, TestPoint, TestPointStore};
pub use summary::{compute_summary, SummaryRecord, TURN_THRESHOLD_DEG};
