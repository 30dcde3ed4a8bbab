//! In-memory dataset.

use crate::endian::ByteOrder;
use crate::error::{DtaError, Result};

use super::column::DtaColumn;
use super::options::DtaVersion;
use super::value::DtaValue;

/// A typed table: ordered columns sharing one row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DtaDataset {
    /// Dataset label.
    pub label: String,
    /// Creation timestamp text, as stored.
    pub timestamp: String,
    /// Format version the dataset was read from.
    pub version: DtaVersion,
    /// Byte order the dataset was read from, if it came from a file.
    pub byte_order: Option<ByteOrder>,
    /// Columns in file order.
    pub columns: Vec<DtaColumn>,
}

impl DtaDataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset with the given columns.
    #[must_use]
    pub fn with_columns(columns: Vec<DtaColumn>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Set the dataset label.
    ///
    /// Written unless the writer options supply their own label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Append a column.
    pub fn add_column(&mut self, column: DtaColumn) {
        self.columns.push(column);
    }

    /// Number of rows (length of the first column).
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, DtaColumn::len)
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Find a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&DtaColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cells of one row, in column order.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<DtaValue>> {
        if index >= self.num_rows() {
            return None;
        }
        self.columns.iter().map(|c| c.data.get(index)).collect()
    }

    /// Append one row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the row has the wrong number of cells or a
    /// cell does not match its column's type. The dataset is left unchanged.
    pub fn add_row(&mut self, row: Vec<DtaValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DtaError::invalid_input(format!(
                "row has {} values, dataset has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter().zip(&row) {
            if !matches_type(column, value) {
                return Err(DtaError::invalid_input(format!(
                    "value {value:?} does not match {} column '{}'",
                    column.dtype(),
                    column.name
                )));
            }
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            if let DtaValue::Str(bytes) = &value
                && let super::ColumnData::Str { width, .. } = &mut column.data
            {
                let len = u8::try_from(bytes.len()).unwrap_or(u8::MAX);
                *width = (*width).max(len);
            }
            column
                .data
                .push(value)
                .map_err(|v| DtaError::invalid_input(format!("unexpected value {v:?}")))?;
        }
        Ok(())
    }

    /// Check that every column has the same number of cells.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first column whose length differs.
    pub fn validate(&self) -> Result<()> {
        let expected = self.num_rows();
        for column in &self.columns {
            if column.len() != expected {
                return Err(DtaError::invalid_input(format!(
                    "column '{}' has {} rows, expected {expected}",
                    column.name,
                    column.len()
                )));
            }
        }
        Ok(())
    }
}

fn matches_type(column: &DtaColumn, value: &DtaValue) -> bool {
    use super::ColumnData as C;
    matches!(
        (&column.data, value),
        (C::Byte(_), DtaValue::Byte(_))
            | (C::Int16(_), DtaValue::Int16(_))
            | (C::Int32(_), DtaValue::Int32(_))
            | (C::Float32(_), DtaValue::Float32(_))
            | (C::Float64(_), DtaValue::Float64(_))
            | (C::Str { .. }, DtaValue::Str(_))
    )
}
