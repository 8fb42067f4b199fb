//! Core data types, air-data math, and dataset I/O.

pub mod airdata;
pub mod dataset;
pub mod loader;

pub use dataset::{ChannelError, ChannelTable, ParameterAccessor};
pub use loader::{load_channel_csv, LoaderError};
