//! Stata `.dta` file format reader and writer (versions 5 and 6).
//!
//! This crate decodes `.dta` files into a typed in-memory table and encodes
//! tables back into files readable by the original format's readers.
//!
//! # Features
//!
//! - Version 5 and version 6 files, big- or little-endian
//! - Byte, int, long, float, double and fixed-width string variables
//! - Sentinel-based missing values mapped to `None`
//! - Print formats and variable labels kept as attributes
//! - Optional Polars DataFrame integration (with `polars` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use stata_dta::{DtaColumn, DtaDataset, read_dta, write_dta};
//!
//! // Read a DTA file
//! let dataset = read_dta(Path::new("survey.dta")).unwrap();
//! println!("{} ({} rows)", dataset.label, dataset.num_rows());
//!
//! // Create a new dataset
//! let ds = DtaDataset::with_columns(vec![
//!     DtaColumn::int32("id", vec![Some(1), Some(2)]),
//!     DtaColumn::float64("income", vec![Some(31_500.0), None]),
//!     DtaColumn::string("region", vec!["north", "south"]),
//! ]);
//!
//! // Write to a DTA file
//! write_dta(Path::new("out.dta"), &ds).unwrap();
//! ```
//!
//! # Missing Values
//!
//! Each numeric type reserves one bit pattern for "missing". Those patterns
//! decode to `None`, and `None` encodes back to them:
//!
//! ```
//! use stata_dta::{DtaValue, INT32_MISSING};
//!
//! let missing = DtaValue::Int32(None);
//! assert!(missing.is_missing());
//! assert_eq!(INT32_MISSING, i32::MAX);
//! ```
//!
//! A genuine value equal to a sentinel cannot be stored: it reads back as missing.
//!
//! # Names
//!
//! Variable names are stored in 8 bytes with `_`; the host sees `.` instead.
//! See [`mangle_name_in`] for the one case where this is lossy.

pub mod endian;
mod error;
pub mod header;
pub mod primitive;
mod reader;
mod rows;
mod types;
mod writer;

#[cfg(feature = "polars")]
mod polars_ext;

// Re-export error types
pub use error::{DtaError, Result};

// Re-export core types
pub use endian::{ByteOrder, CodecContext};
pub use header::{mangle_name_in, mangle_name_out};
pub use primitive::{
    BYTE_MISSING, FLOAT32_MISSING, FLOAT64_MISSING, INT16_MISSING, INT32_MISSING,
};
pub use types::{
    ColumnData, DEFAULT_DATA_LABEL, DtaColumn, DtaDataset, DtaType, DtaValue, DtaVersion,
    DtaWriterOptions, str_until_nul,
};

// Re-export reader functionality
pub use reader::{DtaReader, read_dta};

// Re-export writer functionality
pub use writer::{DtaWriter, write_dta, write_dta_with_options};

// Re-export Polars integration
#[cfg(feature = "polars")]
pub use polars_ext::{
    dataframe_to_dataset, dataset_to_dataframe, read_dta_to_dataframe, write_dataframe_to_dta,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
