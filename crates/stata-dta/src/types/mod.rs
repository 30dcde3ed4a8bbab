//! Core types for DTA file handling.
//!
//! This module provides the fundamental data structures for representing
//! DTA datasets, columns, values, and writer options.

mod column;
mod dataset;
mod options;
mod value;

pub use column::{ColumnData, DtaColumn, DtaType};
pub use dataset::DtaDataset;
pub use options::{DEFAULT_DATA_LABEL, DtaVersion, DtaWriterOptions};
pub use value::{DtaValue, str_until_nul};
