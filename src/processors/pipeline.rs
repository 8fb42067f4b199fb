//! Per-label survey processing workflow.
//!
//! The pipeline walks stored test points, extracts the canonical channel set
//! for each, hands it to the calibration solver, and records one result per
//! label. Results and per-label processing states live here, apart from the
//! immutable test-point data in the store.

use std::collections::HashMap;

use log::{debug, warn};
use thiserror::Error;

use crate::config::{Channel, ChannelMap};
use crate::core::dataset::{ChannelError, ParameterAccessor};
use crate::messages::{MessageCatalog, MessageId, MessageVars};
use super::store::{TestPoint, TestPointStore};

/// Errors raised by the processing workflow.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Test point labeled '{0}' is not in the store")]
    UnknownLabel(String),

    #[error("Channel extraction failed: {0}")]
    Channel(#[from] ChannelError),

    #[error("Test point '{0}' has not been processed")]
    NotProcessed(String),

    #[error("Test point '{0}' has already been processed")]
    AlreadyProcessed(String),

    #[error("Calibration solver failed for test point '{label}': {cause}")]
    Solver {
        label: String,
        cause: anyhow::Error,
    },
}

/// Result type for processing operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// The twelve canonical channel histories handed to the calibration solver,
/// sample-aligned and borrowed from one stored test point.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSet<'a> {
    pub total_pressure: &'a [f64],
    pub static_pressure: &'a [f64],
    pub total_temperature: &'a [f64],
    pub angle_of_attack: &'a [f64],
    pub angle_of_sideslip: &'a [f64],
    pub north_velocity: &'a [f64],
    pub east_velocity: &'a [f64],
    pub down_velocity: &'a [f64],
    pub geometric_height: &'a [f64],
    pub roll_angle: &'a [f64],
    pub pitch_angle: &'a [f64],
    pub true_heading: &'a [f64],
}

impl<'a> ChannelSet<'a> {
    /// Extracts all canonical channels from a test point, validating that
    /// every channel is present and that all share the sample index.
    pub fn extract(
        point: &'a TestPoint,
        names: &'a ChannelMap,
    ) -> std::result::Result<Self, ChannelError> {
        let access = ParameterAccessor::new(&point.data, names);
        let seqs = access.aligned(&Channel::ALL)?;

        // Sequence order follows Channel::ALL.
        Ok(Self {
            total_pressure: seqs[0],
            static_pressure: seqs[1],
            total_temperature: seqs[2],
            angle_of_attack: seqs[3],
            angle_of_sideslip: seqs[4],
            north_velocity: seqs[5],
            east_velocity: seqs[6],
            down_velocity: seqs[7],
            geometric_height: seqs[8],
            roll_angle: seqs[9],
            pitch_angle: seqs[10],
            true_heading: seqs[11],
        })
    }

    /// Returns the shared sample count.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.total_pressure.len()
    }
}

/// Calibration entry point the pipeline drives for each test point.
///
/// Implementations receive the aligned channel histories of one maneuver and
/// produce whatever per-point record their calibration method yields.
pub trait SurveySolver {
    /// Result record stored for each processed test point.
    type Output;

    /// Runs the calibration survey over one test point's channel histories.
    fn survey(&self, channels: &ChannelSet<'_>) -> anyhow::Result<Self::Output>;
}

/// What [`SurveyPipeline::process_one`] does when a label already has a
/// stored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReprocessPolicy {
    /// Replace the prior result; last write wins.
    #[default]
    Overwrite,
    /// Refuse with [`ProcessError::AlreadyProcessed`], emitting nothing.
    Reject,
}

/// Processing lifecycle of one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointState {
    Unprocessed,
    Processing,
    Done,
    Error,
}

/// Drives the survey solver over stored test points and records the results.
pub struct SurveyPipeline<S: SurveySolver> {
    names: ChannelMap,
    solver: S,
    policy: ReprocessPolicy,
    results: HashMap<String, S::Output>,
    states: HashMap<String, PointState>,
}

impl<S: SurveySolver> SurveyPipeline<S> {
    /// Creates a pipeline with the default reprocess policy.
    pub fn new(names: ChannelMap, solver: S) -> Self {
        Self::with_policy(names, solver, ReprocessPolicy::default())
    }

    /// Creates a pipeline with an explicit reprocess policy.
    pub fn with_policy(names: ChannelMap, solver: S, policy: ReprocessPolicy) -> Self {
        Self {
            names,
            solver,
            policy,
            results: HashMap::new(),
            states: HashMap::new(),
        }
    }

    /// Processes test points sequentially, stopping at the first failure.
    ///
    /// `labels = None` processes every stored point in insertion order, as
    /// snapshotted at the time of the call.
    pub fn process_all(
        &mut self,
        store: &TestPointStore,
        catalog: &MessageCatalog,
        labels: Option<&[String]>,
    ) -> Result<()> {
        let labels = match labels {
            Some(subset) => subset.to_vec(),
            None => store.list(),
        };
        for label in &labels {
            self.process_one(store, catalog, label)?;
        }
        Ok(())
    }

    /// Processes one test point: emits the progress message, extracts the
    /// canonical channels, runs the solver, and stores the result.
    ///
    /// # Errors
    ///
    /// [`ProcessError::UnknownLabel`] for a label with no stored data,
    /// [`ProcessError::AlreadyProcessed`] under the reject policy (nothing
    /// is emitted), [`ProcessError::Channel`] when extraction fails, and
    /// [`ProcessError::Solver`] when the solver reports a failure. The two
    /// latter leave the label in the error state with its prior result, if
    /// any, still stored.
    pub fn process_one(
        &mut self,
        store: &TestPointStore,
        catalog: &MessageCatalog,
        label: &str,
    ) -> Result<()> {
        let point = store
            .get(label)
            .map_err(|_| ProcessError::UnknownLabel(label.to_string()))?;

        if self.policy == ReprocessPolicy::Reject && self.results.contains_key(label) {
            return Err(ProcessError::AlreadyProcessed(label.to_string()));
        }

        catalog.emit(
            MessageId::Processing,
            Some(&MessageVars::Scalar(label.to_string())),
        );
        self.states.insert(label.to_string(), PointState::Processing);

        match self.run_survey(point) {
            Ok(output) => {
                self.results.insert(label.to_string(), output);
                self.states.insert(label.to_string(), PointState::Done);
                catalog.emit(MessageId::Done, None);
                debug!("test point '{}' processed", label);
                Ok(())
            }
            Err(err) => {
                self.states.insert(label.to_string(), PointState::Error);
                warn!("processing failed for test point '{}': {}", label, err);
                Err(err)
            }
        }
    }

    fn run_survey(&self, point: &TestPoint) -> Result<S::Output> {
        let channels = ChannelSet::extract(point, &self.names)?;
        self.solver
            .survey(&channels)
            .map_err(|cause| ProcessError::Solver {
                label: point.label.clone(),
                cause,
            })
    }

    /// Returns the stored result for a label.
    ///
    /// # Errors
    ///
    /// [`ProcessError::NotProcessed`] when the label has no stored result.
    pub fn get_result(&self, label: &str) -> Result<&S::Output> {
        self.results
            .get(label)
            .ok_or_else(|| ProcessError::NotProcessed(label.to_string()))
    }

    /// Returns results for several labels, erroring on any unprocessed one.
    ///
    /// `labels = None` returns every stored point's result in insertion
    /// order; a stored point without a result is an error.
    pub fn get_results(
        &self,
        store: &TestPointStore,
        labels: Option<&[String]>,
    ) -> Result<Vec<&S::Output>> {
        let labels = match labels {
            Some(subset) => subset.to_vec(),
            None => store.list(),
        };
        labels.iter().map(|label| self.get_result(label)).collect()
    }

    /// Returns the processing state of a label. Labels never touched by the
    /// pipeline report [`PointState::Unprocessed`].
    pub fn state(&self, label: &str) -> PointState {
        self.states
            .get(label)
            .copied()
            .unwrap_or(PointState::Unprocessed)
    }

    /// Returns the number of stored results.
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Returns the configured reprocess policy.
    pub fn policy(&self) -> ReprocessPolicy {
        self.policy
    }
}
