//! Polars DataFrame conversion.
//!
//! Byte and int columns are widened to `Int32`; string cells are cut at the
//! first NUL. Going the other way, small integers and booleans become `long`,
//! wide integers become `double`.

use std::path::Path;

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, PolarsError, Series};

use crate::error::{DtaError, Result};
use crate::reader::read_dta;
use crate::types::{ColumnData, DtaColumn, DtaDataset, str_until_nul};
use crate::writer::write_dta;

fn polars_err(err: PolarsError) -> DtaError {
    DtaError::invalid_input(err.to_string())
}

/// Convert a dataset into a DataFrame.
pub fn dataset_to_dataframe(dataset: &DtaDataset) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.columns.len());
    for column in &dataset.columns {
        let name = column.name.as_str().into();
        let series = match &column.data {
            ColumnData::Byte(v) => {
                Series::new(name, v.iter().map(|x| x.map(i32::from)).collect::<Vec<_>>())
            }
            ColumnData::Int16(v) => {
                Series::new(name, v.iter().map(|x| x.map(i32::from)).collect::<Vec<_>>())
            }
            ColumnData::Int32(v) => Series::new(name, v.clone()),
            ColumnData::Float32(v) => Series::new(name, v.clone()),
            ColumnData::Float64(v) => Series::new(name, v.clone()),
            ColumnData::Str { values, .. } => Series::new(
                name,
                values
                    .iter()
                    .map(|b| String::from_utf8_lossy(str_until_nul(b)).into_owned())
                    .collect::<Vec<_>>(),
            ),
        };
        columns.push(series.into_column());
    }
    DataFrame::new(columns).map_err(polars_err)
}

/// Convert a DataFrame into a dataset.
pub fn dataframe_to_dataset(df: &DataFrame) -> Result<DtaDataset> {
    let mut dataset = DtaDataset::new();
    for column in df.get_columns() {
        let name = column.name().to_string();
        let series = column.as_materialized_series();
        let dtype = series.dtype().clone();

        let converted = if dtype == DataType::String {
            let values: Vec<Vec<u8>> = series
                .str()
                .map_err(polars_err)?
                .into_iter()
                .map(|v| v.unwrap_or("").as_bytes().to_vec())
                .collect();
            DtaColumn::string(name, values)
        } else if dtype == DataType::Float32 {
            DtaColumn::float32(name, series.f32().map_err(polars_err)?.into_iter().collect())
        } else if dtype.is_float()
            || matches!(dtype, DataType::Int64 | DataType::UInt32 | DataType::UInt64)
        {
            let cast = series.cast(&DataType::Float64).map_err(polars_err)?;
            DtaColumn::float64(name, cast.f64().map_err(polars_err)?.into_iter().collect())
        } else if dtype.is_integer() || dtype == DataType::Boolean {
            let cast = series.cast(&DataType::Int32).map_err(polars_err)?;
            DtaColumn::int32(name, cast.i32().map_err(polars_err)?.into_iter().collect())
        } else {
            return Err(DtaError::invalid_input(format!(
                "column '{}' has unsupported type {dtype}",
                column.name()
            )));
        };
        dataset.add_column(converted);
    }
    Ok(dataset)
}

/// Read a DTA file into a DataFrame.
pub fn read_dta_to_dataframe(path: &Path) -> Result<DataFrame> {
    dataset_to_dataframe(&read_dta(path)?)
}

/// Write a DataFrame to a DTA file.
pub fn write_dataframe_to_dta(path: &Path, df: &DataFrame) -> Result<()> {
    write_dta(path, &dataframe_to_dataset(df)?)
}
