//! Columnar test-point datasets and role-based channel access.
//!
//! A [`ChannelTable`] holds named `f64` sample columns over an implicit
//! sample index; it is the shape every dataset source must produce. Columns
//! may differ in length inside the table, so consumers that need aligned
//! channels validate lengths at access time through a [`ParameterAccessor`].

use std::collections::HashMap;

use thiserror::Error;

use crate::config::{Channel, ChannelMap};

/// Errors raised when required channel data is absent or mis-shaped.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The role is unmapped, or the mapped column is not in the table.
    #[error("Parameter '{0}' is not available for this test point")]
    MissingParameter(String),

    /// A required channel holds no samples.
    #[error("Channel '{0}' holds no samples")]
    EmptyChannel(String),

    /// Channels that must share the sample index differ in length.
    #[error("Channel '{name}' has {actual} samples where {expected} were expected")]
    MisalignedChannels {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for channel access operations.
pub type Result<T> = std::result::Result<T, ChannelError>;

/// Table of named sample columns for one test point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTable {
    columns: HashMap<String, Vec<f64>>,
    order: Vec<String>,
}

impl ChannelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, samples)` pairs, keeping pair order.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, samples) in columns {
            table.insert(name, samples);
        }
        table
    }

    /// Inserts a column, replacing any existing column of the same name.
    pub fn insert<S: Into<String>>(&mut self, name: S, samples: Vec<f64>) {
        let name = name.into();
        if !self.columns.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.columns.insert(name, samples);
    }

    /// Returns the samples of a column, if present.
    #[inline]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Returns true if a column of this name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterates over column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns the number of columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the table holds no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Role-based view over one [`ChannelTable`].
///
/// Resolves canonical channel roles to DAS column names through a
/// [`ChannelMap`] and hands out sample sequences, so callers never touch raw
/// column names.
#[derive(Debug, Clone, Copy)]
pub struct ParameterAccessor<'a> {
    table: &'a ChannelTable,
    names: &'a ChannelMap,
}

impl<'a> ParameterAccessor<'a> {
    /// Creates an accessor over `table` using the role mapping in `names`.
    pub fn new(table: &'a ChannelTable, names: &'a ChannelMap) -> Self {
        Self { table, names }
    }

    /// Extracts the sample sequence recorded for a canonical channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::MissingParameter`] when the role is unmapped
    /// or the mapped column is absent from the table. The error carries the
    /// role name, not the DAS column name.
    pub fn sequence(&self, channel: Channel) -> Result<&'a [f64]> {
        self.names
            .column_for(channel)
            .and_then(|column| self.table.column(column))
            .ok_or_else(|| ChannelError::MissingParameter(channel.name().to_string()))
    }

    /// Extracts several channels that must share the sample index.
    ///
    /// Sequences are returned in the order requested. The first channel sets
    /// the expected length; any other length is reported against the
    /// offending channel.
    ///
    /// # Errors
    ///
    /// [`ChannelError::MissingParameter`] for an unavailable channel,
    /// [`ChannelError::MisalignedChannels`] for a length mismatch, then
    /// [`ChannelError::EmptyChannel`] when the aligned length is zero.
    pub fn aligned(&self, channels: &[Channel]) -> Result<Vec<&'a [f64]>> {
        let mut sequences = Vec::with_capacity(channels.len());
        for &channel in channels {
            sequences.push((channel, self.sequence(channel)?));
        }

        if let Some(&(first, first_seq)) = sequences.first() {
            let expected = first_seq.len();
            for &(channel, seq) in &sequences[1..] {
                if seq.len() != expected {
                    return Err(ChannelError::MisalignedChannels {
                        name: channel.name().to_string(),
                        expected,
                        actual: seq.len(),
                    });
                }
            }
            if expected == 0 {
                return Err(ChannelError::EmptyChannel(first.name().to_string()));
            }
        }

        Ok(sequences.into_iter().map(|(_, seq)| seq).collect())
    }
}
