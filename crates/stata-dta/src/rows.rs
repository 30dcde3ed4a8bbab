//! Row-major data block.
//!
//! Each row holds one cell per variable, in descriptor order, encoded with the
//! variable's storage type. Cells are streamed one at a time in both
//! directions.

use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::error::Result;
use crate::header::VariableDescriptor;
use crate::primitive::{PrimitiveReader, PrimitiveWriter};
use crate::types::{ColumnData, DtaColumn, DtaType, str_until_nul};

/// Upper bound on rows preallocated from an untrusted header count.
const MAX_PREALLOC_ROWS: usize = 1 << 16;

/// Read `nobs` rows into one storage vector per descriptor.
pub fn read_rows<R: Read>(
    reader: &mut PrimitiveReader<R>,
    descriptors: &[VariableDescriptor],
    nobs: usize,
) -> Result<Vec<ColumnData>> {
    let capacity = nobs.min(MAX_PREALLOC_ROWS);
    let mut columns: Vec<ColumnData> = descriptors
        .iter()
        .map(|d| ColumnData::with_capacity(d.dtype, capacity))
        .collect();

    if !columns.is_empty() {
        for _ in 0..nobs {
            for column in &mut columns {
                read_cell(reader, column)?;
            }
        }
    }

    debug!(nobs, nvar = columns.len(), "read data block");
    Ok(columns)
}

fn read_cell<R: Read>(reader: &mut PrimitiveReader<R>, column: &mut ColumnData) -> Result<()> {
    match column {
        ColumnData::Byte(v) => v.push(reader.read_byte()?),
        ColumnData::Int16(v) => v.push(reader.read_int16()?),
        ColumnData::Int32(v) => v.push(reader.read_int32()?),
        ColumnData::Float32(v) => v.push(reader.read_float32()?),
        ColumnData::Float64(v) => v.push(reader.read_float64()?),
        ColumnData::Str { width, values } => {
            values.push(reader.read_bytes(usize::from(*width), "string cell")?);
        }
    }
    Ok(())
}

/// Write `nobs` rows.
///
/// `descriptors` must be derived from `columns` (same order) and every column
/// must hold at least `nobs` cells.
pub fn write_rows<W: Write>(
    writer: &mut PrimitiveWriter<W>,
    columns: &[DtaColumn],
    descriptors: &[VariableDescriptor],
    nobs: usize,
) -> Result<()> {
    let mut coerced = 0usize;
    for row in 0..nobs {
        for (column, desc) in columns.iter().zip(descriptors) {
            coerced += write_cell(writer, &column.data, desc.dtype, row)?;
        }
    }
    if coerced > 0 {
        warn!(count = coerced, "non-finite values written as missing");
    }
    debug!(nobs, nvar = columns.len(), "wrote data block");
    Ok(())
}

/// Write one cell, returning 1 if a non-finite float was coerced to missing.
fn write_cell<W: Write>(
    writer: &mut PrimitiveWriter<W>,
    data: &ColumnData,
    dtype: DtaType,
    row: usize,
) -> Result<usize> {
    let mut coerced = 0;
    match data {
        ColumnData::Byte(v) => writer.write_byte(v[row])?,
        ColumnData::Int16(v) => writer.write_int16(v[row])?,
        ColumnData::Int32(v) => writer.write_int32(v[row])?,
        ColumnData::Float32(v) => {
            coerced = usize::from(v[row].is_some_and(|x| !x.is_finite()));
            writer.write_float32(v[row])?;
        }
        ColumnData::Float64(v) => {
            coerced = usize::from(v[row].is_some_and(|x| !x.is_finite()));
            writer.write_float64(v[row])?;
        }
        ColumnData::Str { values, .. } => {
            let value = str_until_nul(&values[row]);
            writer.write_bytes(value)?;
            writer.write_zeros(dtype.cell_width().saturating_sub(value.len()))?;
        }
    }
    Ok(coerced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endian::{ByteOrder, CodecContext, FileOrder};
    use crate::error::DtaError;
    use std::io::Cursor;

    fn order(file: ByteOrder) -> FileOrder {
        FileOrder::new(CodecContext::detect().unwrap(), file)
    }

    fn descriptors(columns: &[DtaColumn]) -> Vec<VariableDescriptor> {
        columns
            .iter()
            .map(|c| VariableDescriptor::for_column(c).unwrap())
            .collect()
    }

    #[test]
    fn test_rows_are_row_major() {
        let columns = vec![
            DtaColumn::byte("a", vec![Some(1), Some(2)]),
            DtaColumn::string("b", vec!["x", "yz"]),
        ];
        let descs = descriptors(&columns);
        let mut out = Vec::new();
        let mut writer = PrimitiveWriter::new(&mut out, order(ByteOrder::Big));
        write_rows(&mut writer, &columns, &descs, 2).unwrap();
        assert_eq!(out, vec![1, b'x', 0, 2, b'y', b'z']);
    }

    #[test]
    fn test_read_rows_typed() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7i16.to_be_bytes());
        bytes.extend_from_slice(&1.5f32.to_be_bytes());
        bytes.extend_from_slice(b"ab\0");
        bytes.extend_from_slice(&i16::MAX.to_be_bytes());
        bytes.extend_from_slice(&(-0.25f32).to_be_bytes());
        bytes.extend_from_slice(b"abc");

        let descs = vec![
            VariableDescriptor::for_column(&DtaColumn::int16("n", vec![])).unwrap(),
            VariableDescriptor::for_column(&DtaColumn::float32("f", vec![])).unwrap(),
            VariableDescriptor::for_column(&DtaColumn::string("s", vec!["abc"])).unwrap(),
        ];
        let mut reader = PrimitiveReader::new(Cursor::new(bytes), order(ByteOrder::Big));
        let columns = read_rows(&mut reader, &descs, 2).unwrap();

        assert_eq!(columns[0], ColumnData::Int16(vec![Some(7), None]));
        assert_eq!(columns[1], ColumnData::Float32(vec![Some(1.5), Some(-0.25)]));
        assert_eq!(
            columns[2],
            ColumnData::Str {
                width: 3,
                values: vec![b"ab\0".to_vec(), b"abc".to_vec()],
            }
        );
    }

    #[test]
    fn test_read_rows_truncated_block() {
        let descs = vec![VariableDescriptor::for_column(&DtaColumn::float64("x", vec![])).unwrap()];
        let mut reader = PrimitiveReader::new(Cursor::new(vec![0u8; 12]), order(ByteOrder::Big));
        assert!(matches!(
            read_rows(&mut reader, &descs, 2),
            Err(DtaError::CorruptFile { .. })
        ));
    }

    #[test]
    fn test_zero_columns_reads_nothing() {
        let mut reader = PrimitiveReader::new(Cursor::new(Vec::new()), order(ByteOrder::Big));
        assert!(read_rows(&mut reader, &[], 1_000_000).unwrap().is_empty());
    }
}
