//! Test-point repository with unique labels and insertion order.
//!
//! Each test point is one maneuver's dataset keyed by a label derived from
//! its source identifier. Adds are all-or-nothing: the flight-regime summary
//! is computed first, and only a successful summary commits the entry.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::config::ChannelMap;
use crate::core::dataset::{ChannelError, ChannelTable};
use super::summary::{compute_summary, SummaryRecord};

/// Errors raised by test-point repository operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Test point labeled '{0}' has already been added")]
    DuplicateLabel(String),

    #[error("Test point labeled '{0}' is not in the store")]
    UnknownLabel(String),

    #[error("Summary computation failed: {0}")]
    Summary(#[from] ChannelError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Derives a test-point label from a source identifier.
///
/// Directory components and the final extension are stripped, so
/// `data/flight1.csv` becomes `flight1`. Identifiers without a file stem are
/// used as-is.
pub fn derive_label(source_id: &str) -> String {
    Path::new(source_id)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_id.to_string())
}

/// One stored maneuver: the raw channel data plus the summary computed when
/// it was added.
#[derive(Debug, Clone, PartialEq)]
pub struct TestPoint {
    pub label: String,
    pub data: ChannelTable,
    pub summary: SummaryRecord,
}

/// Repository of test points keyed by unique label.
///
/// Insertion order is remembered and drives every whole-store walk.
#[derive(Debug)]
pub struct TestPointStore {
    names: ChannelMap,
    points: HashMap<String, TestPoint>,
    order: Vec<String>,
}

impl TestPointStore {
    /// Creates an empty store using `names` to resolve channel roles.
    pub fn new(names: ChannelMap) -> Self {
        Self {
            names,
            points: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Adds a test point, deriving its label from `source_id`.
    ///
    /// The summary is computed before anything is stored; a summary failure
    /// leaves the store unchanged.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateLabel`] when the derived label is already
    /// present (the existing entry is untouched), or
    /// [`StoreError::Summary`] when the dataset cannot be summarized.
    pub fn add(&mut self, source_id: &str, data: ChannelTable) -> Result<&TestPoint> {
        let label = derive_label(source_id);
        if self.points.contains_key(&label) {
            return Err(StoreError::DuplicateLabel(label));
        }

        let summary = compute_summary(&data, &self.names)?;
        debug!(
            "test point '{}' added ({} channels)",
            label,
            data.num_columns()
        );

        self.order.push(label.clone());
        let point = TestPoint {
            label: label.clone(),
            data,
            summary,
        };
        Ok(self.points.entry(label).or_insert(point))
    }

    /// Returns the stored test point for a label.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownLabel`] when no entry has this label.
    pub fn get(&self, label: &str) -> Result<&TestPoint> {
        self.points
            .get(label)
            .ok_or_else(|| StoreError::UnknownLabel(label.to_string()))
    }

    /// Returns true if a test point with this label is stored.
    pub fn contains(&self, label: &str) -> bool {
        self.points.contains_key(label)
    }

    /// Returns all labels in insertion order, as an independent snapshot.
    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Returns the number of stored test points.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no test points are stored.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the channel-name mapping this store resolves roles with.
    pub fn names(&self) -> &ChannelMap {
        &self.names
    }
}
