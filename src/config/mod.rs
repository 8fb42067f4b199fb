//! Channel-name configuration for the survey pipeline.
//!
//! Every data-acquisition system (DAS) names its recorded channels
//! differently. A [`ChannelMap`] ties the canonical channel roles the
//! pipeline consumes to the column names of one specific DAS, so datasets
//! are always accessed by role rather than by raw column name. The mapping
//! is ordered, fixed after construction, and loadable from YAML.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors that can occur while building or loading a channel map.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Channel role '{0}' is mapped more than once")]
    DuplicateRole(String),

    #[error("Channel map entries must be string 'role: column' pairs")]
    InvalidEntry,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The canonical channel roles consumed by the survey pipeline.
///
/// [`Channel::ALL`] fixes the extraction order: channels are pulled from a
/// dataset and handed to the calibration solver in exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    TotalPressure,
    StaticPressure,
    TotalTemperature,
    AngleOfAttack,
    AngleOfSideslip,
    NorthVelocity,
    EastVelocity,
    DownVelocity,
    GeometricHeight,
    RollAngle,
    PitchAngle,
    TrueHeading,
}

impl Channel {
    /// All canonical channels in extraction order.
    pub const ALL: [Channel; 12] = [
        Channel::TotalPressure,
        Channel::StaticPressure,
        Channel::TotalTemperature,
        Channel::AngleOfAttack,
        Channel::AngleOfSideslip,
        Channel::NorthVelocity,
        Channel::EastVelocity,
        Channel::DownVelocity,
        Channel::GeometricHeight,
        Channel::RollAngle,
        Channel::PitchAngle,
        Channel::TrueHeading,
    ];

    /// Role name as it appears in channel maps, settings text, and errors.
    pub fn name(self) -> &'static str {
        match self {
            Channel::TotalPressure => "total pressure",
            Channel::StaticPressure => "static pressure",
            Channel::TotalTemperature => "total temperature",
            Channel::AngleOfAttack => "angle of attack",
            Channel::AngleOfSideslip => "angle of sideslip",
            Channel::NorthVelocity => "north velocity",
            Channel::EastVelocity => "east velocity",
            Channel::DownVelocity => "down velocity",
            Channel::GeometricHeight => "geometric height",
            Channel::RollAngle => "roll angle",
            Channel::PitchAngle => "pitch angle",
            Channel::TrueHeading => "true heading",
        }
    }

    /// Looks up a canonical channel by its role name.
    pub fn from_name(name: &str) -> Option<Channel> {
        Channel::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered mapping from channel-role names to DAS column names.
///
/// Roles beyond [`Channel::ALL`] (a time channel, for example) are allowed;
/// they appear in settings text but are never extracted for processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMap {
    entries: Vec<(String, String)>,
}

impl ChannelMap {
    /// Builds a map from ordered `(role, column)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRole`] if the same role appears twice.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (role, column) in pairs {
            let role = role.into();
            if entries.iter().any(|(r, _)| *r == role) {
                return Err(ConfigError::DuplicateRole(role));
            }
            entries.push((role, column.into()));
        }
        Ok(ChannelMap { entries })
    }

    /// Builds the identity map: every canonical role maps to its own name.
    pub fn identity() -> Self {
        let entries = Channel::ALL
            .iter()
            .map(|c| (c.name().to_string(), c.name().to_string()))
            .collect();
        ChannelMap { entries }
    }

    /// Looks up the DAS column name configured for a role.
    pub fn resolve(&self, role: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, column)| column.as_str())
    }

    /// Looks up the DAS column name for a canonical channel.
    pub fn column_for(&self, channel: Channel) -> Option<&str> {
        self.resolve(channel.name())
    }

    /// Iterates over `(role, column)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(r, c)| (r.as_str(), c.as_str()))
    }

    /// Returns the number of mapped roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no roles are mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a channel map from a YAML file of `role: column` pairs.
    ///
    /// Document order is preserved as the map order.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mapping: Mapping = serde_yaml::from_str(&content)?;

        let mut pairs: Vec<(String, String)> = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            match (key.as_str(), value.as_str()) {
                (Some(role), Some(column)) => pairs.push((role.to_string(), column.to_string())),
                _ => return Err(ConfigError::InvalidEntry),
            }
        }
        Self::from_pairs(pairs)
    }

    /// Save the channel map to a YAML file, preserving map order.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut mapping = Mapping::new();
        for (role, column) in &self.entries {
            mapping.insert(
                Value::String(role.clone()),
                Value::String(column.clone()),
            );
        }
        let content = serde_yaml::to_string(&mapping)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::identity()
    }
}
