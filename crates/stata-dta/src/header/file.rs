//! File header record.
//!
//! # Layout
//!
//! | Field              | Size        | Notes                               |
//! |--------------------|-------------|-------------------------------------|
//! | release            | 1           | 0x69 = version 5, 0x6C = version 6  |
//! | byte order         | 1           | 1 = big-endian, 2 = little-endian   |
//! | filetype           | 1           | ignored, written as 1               |
//! | padding            | 1           | ignored, written as 0               |
//! | nvar               | 2           | file byte order                     |
//! | nobs               | 4           | swapped per byte-order flag         |
//! | data label         | 32 / 81     | NUL-terminated                      |
//! | timestamp          | 18          | NUL-terminated                      |

use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::endian::{ByteOrder, CodecContext, FileOrder};
use crate::error::{DtaError, Result};
use crate::primitive::{PrimitiveReader, PrimitiveWriter};
use crate::types::DtaVersion;

use super::text::{fixed_text, read_text};

/// Width of the timestamp field.
pub const TIMESTAMP_LEN: usize = 18;

/// Filetype byte written to new files.
const FILETYPE: u8 = 1;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: DtaVersion,
    pub byte_order: ByteOrder,
    pub nvar: u16,
    pub nobs: usize,
    pub data_label: String,
    pub timestamp: String,
}

/// Read the header and switch the reader to the file's byte order.
///
/// # Errors
///
/// `UnsupportedVersion` for an unknown release byte, `CorruptFile` for an
/// invalid byte-order flag, a negative observation count, or a short read.
pub fn read_header<R: Read>(
    reader: &mut PrimitiveReader<R>,
    ctx: CodecContext,
) -> Result<FileHeader> {
    let tag = reader.read_u8("release byte")?;
    let version = DtaVersion::from_tag(tag).ok_or(DtaError::UnsupportedVersion { tag })?;

    let flag = reader.read_u8("byte-order flag")?;
    let byte_order = ByteOrder::from_flag(flag)
        .ok_or_else(|| DtaError::corrupt(format!("invalid byte-order flag {flag}")))?;
    reader.set_order(FileOrder::new(ctx, byte_order));

    let _filetype = reader.read_u8("filetype")?;
    let _padding = reader.read_u8("header padding")?;

    let nvar = reader.read_u16("variable count")?;
    let nobs = reader.read_i32("observation count")?;
    let nobs = usize::try_from(nobs)
        .map_err(|_| DtaError::corrupt(format!("negative observation count {nobs}")))?;

    let data_label = read_text(&reader.read_bytes(version.label_len(), "data label")?);
    let timestamp = read_text(&reader.read_bytes(TIMESTAMP_LEN, "timestamp")?);

    debug!(
        %version,
        %byte_order,
        swap = reader.order().swap,
        nvar,
        nobs,
        "read header"
    );

    Ok(FileHeader {
        version,
        byte_order,
        nvar,
        nobs,
        data_label,
        timestamp,
    })
}

/// Write the header in the writer's byte order.
pub fn write_header<W: Write>(writer: &mut PrimitiveWriter<W>, header: &FileHeader) -> Result<()> {
    let nobs = i32::try_from(header.nobs).map_err(|_| {
        DtaError::invalid_input(format!("{} rows exceed the format limit", header.nobs))
    })?;

    writer.write_u8(header.version.tag())?;
    writer.write_u8(writer.order().order.flag())?;
    writer.write_u8(FILETYPE)?;
    writer.write_u8(0)?;
    writer.write_u16(header.nvar)?;
    writer.write_i32(nobs)?;

    let (label, truncated) = fixed_text(&header.data_label, header.version.label_len());
    if truncated {
        warn!(label = %header.data_label, "data label truncated");
    }
    writer.write_bytes(&label)?;
    writer.write_bytes(&fixed_text(&header.timestamp, TIMESTAMP_LEN).0)?;

    debug!(nvar = header.nvar, nobs, "wrote header");
    Ok(())
}
