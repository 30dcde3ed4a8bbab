//! Variable descriptors and the characteristics block.
//!
//! Descriptors are stored field-by-field across all variables, in this order:
//!
//! 1. type codes, 1 byte each
//! 2. names, 9 bytes each (8 significant + terminator)
//! 3. sort list, `2 * (nvar + 1)` bytes (ignored)
//! 4. print formats, 12 bytes each
//! 5. value-label names, 9 bytes each (ignored)
//! 6. variable labels, 32 (v5) or 81 (v6) bytes each
//!
//! The characteristics block follows: `(flag, len, payload)` records while the
//! flag byte is non-zero, then a 16-bit zero length.

use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::error::{DtaError, Result};
use crate::primitive::{PrimitiveReader, PrimitiveWriter};
use crate::types::{DtaColumn, DtaType, DtaVersion};

use super::name::{NAME_LEN, mangle_name_in, mangle_name_out};
use super::text::{fixed_text, read_text};

/// Width of a stored name, terminator included.
pub const NAME_FIELD_LEN: usize = NAME_LEN + 1;

/// Width of a print-format field.
pub const FORMAT_LEN: usize = 12;

/// Format written for numeric variables.
pub const NUMERIC_FORMAT: &str = "%9.0g";

/// One variable's descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDescriptor {
    pub dtype: DtaType,
    /// Host-form name (`.` where the file stores `_`).
    pub name: String,
    pub format: String,
    pub label: String,
}

impl VariableDescriptor {
    /// Derive the descriptor written for a column.
    ///
    /// String width is the longest value in the column, not its declared width.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a string value is longer than one type byte can express.
    pub fn for_column(column: &DtaColumn) -> Result<Self> {
        let dtype = match column.data.max_str_len() {
            Some(len) => {
                let width = u8::try_from(len)
                    .ok()
                    .filter(|w| *w <= DtaType::MAX_STR_WIDTH)
                    .ok_or_else(|| {
                        DtaError::invalid_input(format!(
                            "string column '{}' has a {len}-byte value, maximum is {}",
                            column.name,
                            DtaType::MAX_STR_WIDTH
                        ))
                    })?;
                DtaType::Str(width)
            }
            None => column.dtype(),
        };
        let format = match dtype {
            DtaType::Str(width) => format!("%{width}s"),
            _ => NUMERIC_FORMAT.to_string(),
        };
        Ok(Self {
            dtype,
            name: column.name.clone(),
            format,
            label: column.name.clone(),
        })
    }
}

/// Read descriptors for `nvar` variables.
///
/// # Errors
///
/// `UnknownTypeCode` for a type byte below the string range that is not a
/// reserved code; `CorruptFile` on a short read.
pub fn read_descriptors<R: Read>(
    reader: &mut PrimitiveReader<R>,
    nvar: usize,
    version: DtaVersion,
) -> Result<Vec<VariableDescriptor>> {
    let mut dtypes = Vec::with_capacity(nvar);
    for index in 0..nvar {
        let code = reader.read_u8("type codes")?;
        let dtype = DtaType::from_code(code).ok_or(DtaError::UnknownTypeCode { index, code })?;
        dtypes.push(dtype);
    }

    let mut names = Vec::with_capacity(nvar);
    for _ in 0..nvar {
        let raw = read_text(&reader.read_bytes(NAME_FIELD_LEN, "variable names")?);
        names.push(mangle_name_in(&raw));
    }

    reader.skip(2 * (nvar as u64 + 1), "sort list")?;

    let mut formats = Vec::with_capacity(nvar);
    for _ in 0..nvar {
        formats.push(read_text(&reader.read_bytes(FORMAT_LEN, "formats")?));
    }

    reader.skip((nvar * NAME_FIELD_LEN) as u64, "value label names")?;

    let mut labels = Vec::with_capacity(nvar);
    for _ in 0..nvar {
        labels.push(read_text(
            &reader.read_bytes(version.label_len(), "variable labels")?,
        ));
    }

    debug!(nvar, "read variable descriptors");

    Ok(dtypes
        .into_iter()
        .zip(names)
        .zip(formats)
        .zip(labels)
        .map(|(((dtype, name), format), label)| VariableDescriptor {
            dtype,
            name,
            format,
            label,
        })
        .collect())
}

/// Skip the characteristics block, returning the number of records skipped.
///
/// # Errors
///
/// `CorruptFile` if the terminating length is non-zero or the block is cut short.
pub fn read_characteristics<R: Read>(reader: &mut PrimitiveReader<R>) -> Result<usize> {
    let mut skipped = 0usize;
    while reader.read_u8("characteristics")? != 0 {
        let len = reader.read_u16("characteristic length")?;
        reader.skip(u64::from(len), "characteristic")?;
        skipped += 1;
    }
    let terminator = reader.read_u16("characteristics terminator")?;
    if terminator != 0 {
        return Err(DtaError::corrupt(format!(
            "characteristics terminator has length {terminator}, expected 0"
        )));
    }
    debug!(skipped, "skipped characteristics");
    Ok(skipped)
}

/// Write descriptors in version `version` layout.
pub fn write_descriptors<W: Write>(
    writer: &mut PrimitiveWriter<W>,
    descriptors: &[VariableDescriptor],
    version: DtaVersion,
) -> Result<()> {
    for var in descriptors {
        let code = var.dtype.code().ok_or_else(|| {
            DtaError::invalid_input(format!("variable '{}' has no type code", var.name))
        })?;
        writer.write_u8(code)?;
    }

    let mut seen = std::collections::HashSet::new();
    for var in descriptors {
        let stored = mangle_name_out(&var.name);
        let (field, truncated) = fixed_text(&stored, NAME_FIELD_LEN);
        if truncated {
            warn!(name = %var.name, "variable name truncated to {NAME_LEN} bytes");
        }
        if !seen.insert(field.clone()) {
            warn!(name = %var.name, "duplicate variable name after truncation");
        }
        writer.write_bytes(&field)?;
    }

    writer.write_zeros(2 * (descriptors.len() + 1))?;

    for var in descriptors {
        writer.write_bytes(&fixed_text(&var.format, FORMAT_LEN).0)?;
    }

    writer.write_zeros(descriptors.len() * NAME_FIELD_LEN)?;

    for var in descriptors {
        let (field, truncated) = fixed_text(&var.label, version.label_len());
        if truncated {
            warn!(name = %var.name, "variable label truncated");
        }
        writer.write_bytes(&field)?;
    }

    debug!(nvar = descriptors.len(), "wrote variable descriptors");
    Ok(())
}

/// Write an empty characteristics block.
pub fn write_characteristics<W: Write>(writer: &mut PrimitiveWriter<W>) -> Result<()> {
    writer.write_u8(0)?;
    writer.write_u16(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endian::{ByteOrder, CodecContext, FileOrder};
    use std::io::Cursor;

    fn order(file: ByteOrder) -> FileOrder {
        FileOrder::new(CodecContext::detect().unwrap(), file)
    }

    fn written(descriptors: &[VariableDescriptor]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = PrimitiveWriter::new(&mut out, order(ByteOrder::Little));
        write_descriptors(&mut writer, descriptors, DtaVersion::V6).unwrap();
        write_characteristics(&mut writer).unwrap();
        out
    }

    #[test]
    fn test_descriptor_for_string_column_uses_longest_value() {
        let mut col = DtaColumn::string("town", vec!["ab", "abcde"]);
        if let crate::types::ColumnData::Str { width, .. } = &mut col.data {
            *width = 40;
        }
        let desc = VariableDescriptor::for_column(&col).unwrap();
        assert_eq!(desc.dtype, DtaType::Str(5));
        assert_eq!(desc.format, "%5s");
        assert_eq!(desc.label, "town");
    }

    #[test]
    fn test_descriptor_for_numeric_column() {
        let desc = VariableDescriptor::for_column(&DtaColumn::float32("w", vec![])).unwrap();
        assert_eq!(desc.dtype, DtaType::Float32);
        assert_eq!(desc.format, NUMERIC_FORMAT);
    }

    #[test]
    fn test_descriptor_rejects_wide_string() {
        let col = DtaColumn::string("memo", vec![vec![b'x'; 129]]);
        assert!(matches!(
            VariableDescriptor::for_column(&col),
            Err(DtaError::InvalidInput { .. })
        ));
        let col = DtaColumn::string("memo", vec![vec![b'x'; 128]]);
        assert_eq!(
            VariableDescriptor::for_column(&col).unwrap().dtype,
            DtaType::Str(128)
        );
    }

    #[test]
    fn test_descriptor_block_layout() {
        let descs = vec![
            VariableDescriptor::for_column(&DtaColumn::int32("household.id", vec![])).unwrap(),
            VariableDescriptor::for_column(&DtaColumn::string("nm", vec!["abc"])).unwrap(),
        ];
        let bytes = written(&descs);
        let expected_len = 2 + 2 * 9 + 2 * 3 + 2 * 12 + 2 * 9 + 2 * 81 + 3;
        assert_eq!(bytes.len(), expected_len);
        assert_eq!(&bytes[..2], &[b'l', 0x7F + 3]);
        // Name truncated to 8 bytes and mangled, then terminated.
        assert_eq!(&bytes[2..11], b"househol\0");
        assert_eq!(&bytes[11..20], b"nm\0\0\0\0\0\0\0");
        // Full host name survives in the label.
        let label_start = 2 + 18 + 6 + 24 + 18;
        assert_eq!(&bytes[label_start..label_start + 12], b"household.id");
        assert_eq!(&bytes[bytes.len() - 3..], &[0, 0, 0]);
    }

    #[test]
    fn test_read_descriptors_roundtrip() {
        let descs = vec![
            VariableDescriptor::for_column(&DtaColumn::float64("gdp.pc", vec![])).unwrap(),
            VariableDescriptor::for_column(&DtaColumn::byte("flag", vec![])).unwrap(),
        ];
        let bytes = written(&descs);
        let mut reader = PrimitiveReader::new(Cursor::new(bytes), order(ByteOrder::Little));
        let parsed = read_descriptors(&mut reader, 2, DtaVersion::V6).unwrap();
        assert_eq!(parsed, descs);
        assert_eq!(read_characteristics(&mut reader).unwrap(), 0);
    }

    #[test]
    fn test_unknown_type_code() {
        let mut reader =
            PrimitiveReader::new(Cursor::new(vec![b'd', b'x']), order(ByteOrder::Little));
        assert!(matches!(
            read_descriptors(&mut reader, 2, DtaVersion::V6),
            Err(DtaError::UnknownTypeCode { index: 1, code: b'x' })
        ));
    }

    #[test]
    fn test_characteristics_skipped() {
        // Two records of lengths 3 and 1, then the terminator.
        let bytes = vec![1, 3, 0, b'a', b'b', b'c', 1, 1, 0, b'z', 0, 0, 0];
        let mut reader = PrimitiveReader::new(Cursor::new(bytes), order(ByteOrder::Little));
        assert_eq!(read_characteristics(&mut reader).unwrap(), 2);
    }

    #[test]
    fn test_characteristics_bad_terminator() {
        let bytes = vec![0, 5, 0];
        let mut reader = PrimitiveReader::new(Cursor::new(bytes), order(ByteOrder::Little));
        assert!(matches!(
            read_characteristics(&mut reader),
            Err(DtaError::CorruptFile { .. })
        ));
    }
}
