//! Header and descriptor records.
//!
//! This module handles everything that precedes the data block:
//! - The file header (version, byte order, counts, label, timestamp)
//! - Variable descriptors (types, names, formats, labels)
//! - The characteristics block (skipped)

pub mod descriptor;
pub mod file;
pub mod name;
pub mod text;

// Re-export commonly used items
pub use descriptor::{
    FORMAT_LEN, NAME_FIELD_LEN, NUMERIC_FORMAT, VariableDescriptor, read_characteristics,
    read_descriptors, write_characteristics, write_descriptors,
};
pub use file::{FileHeader, TIMESTAMP_LEN, read_header, write_header};
pub use name::{NAME_LEN, mangle_name_in, mangle_name_out};
pub use text::{fixed_text, read_text, truncate_str};
