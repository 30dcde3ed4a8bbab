//! DTA file writer.
//!
//! Always writes version 6. Header, descriptors, characteristics and data are
//! written in the same order the reader consumes them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::endian::{ByteOrder, CodecContext, FileOrder};
use crate::error::{DtaError, Result};
use crate::header::{
    FileHeader, VariableDescriptor, write_characteristics, write_descriptors, write_header,
};
use crate::primitive::PrimitiveWriter;
use crate::rows::write_rows;
use crate::types::{DEFAULT_DATA_LABEL, DtaDataset, DtaVersion, DtaWriterOptions};

/// Version written by this crate.
const WRITE_VERSION: DtaVersion = DtaVersion::V6;

/// DTA file writer.
pub struct DtaWriter<W: Write> {
    writer: BufWriter<W>,
    options: DtaWriterOptions,
    ctx: Option<CodecContext>,
}

impl<W: Write> DtaWriter<W> {
    /// Create a new DTA writer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, DtaWriterOptions::default())
    }

    /// Create a new DTA writer with options.
    pub fn with_options(writer: W, options: DtaWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
            ctx: None,
        }
    }

    /// Use an already detected context instead of detecting on write.
    #[must_use]
    pub fn with_context(mut self, ctx: CodecContext) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Encode a dataset.
    ///
    /// The dataset is fully validated before the first byte is written. An I/O
    /// failure after that point leaves a partial file the caller must discard.
    pub fn write_dataset(self, dataset: &DtaDataset) -> Result<()> {
        let ctx = match self.ctx {
            Some(ctx) => ctx,
            None => CodecContext::detect()?,
        };
        let order = FileOrder::new(ctx, self.options.byte_order.unwrap_or(ctx.host_order()));
        let (header, descriptors) = plan(dataset, &self.options, order.order)?;

        let mut out = PrimitiveWriter::new(self.writer, order);
        write_header(&mut out, &header)?;
        write_descriptors(&mut out, &descriptors, header.version)?;
        write_characteristics(&mut out)?;
        write_rows(&mut out, &dataset.columns, &descriptors, header.nobs)?;
        out.flush()?;

        debug!(
            nobs = header.nobs,
            nvar = header.nvar,
            byte_order = %order.order,
            "encoded dataset"
        );
        Ok(())
    }
}

impl DtaWriter<File> {
    /// Create a DTA file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }

    /// Create a DTA file with options.
    pub fn create_with_options(path: &Path, options: DtaWriterOptions) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_options(file, options))
    }
}

/// Write a dataset to a DTA file.
pub fn write_dta(path: &Path, dataset: &DtaDataset) -> Result<()> {
    DtaWriter::create(path)?.write_dataset(dataset)
}

/// Write a dataset to a DTA file with options.
pub fn write_dta_with_options(
    path: &Path,
    dataset: &DtaDataset,
    options: &DtaWriterOptions,
) -> Result<()> {
    DtaWriter::create_with_options(path, options.clone())?.write_dataset(dataset)
}

/// Validate a dataset and derive the header and descriptors to write.
fn plan(
    dataset: &DtaDataset,
    options: &DtaWriterOptions,
    byte_order: ByteOrder,
) -> Result<(FileHeader, Vec<VariableDescriptor>)> {
    dataset.validate()?;

    let nvar = u16::try_from(dataset.columns.len()).map_err(|_| {
        DtaError::invalid_input(format!(
            "{} variables exceed the format limit of {}",
            dataset.columns.len(),
            u16::MAX
        ))
    })?;
    let nobs = dataset.num_rows();
    if i32::try_from(nobs).is_err() {
        return Err(DtaError::invalid_input(format!(
            "{nobs} rows exceed the format limit of {}",
            i32::MAX
        )));
    }

    let descriptors = dataset
        .columns
        .iter()
        .map(VariableDescriptor::for_column)
        .collect::<Result<Vec<_>>>()?;

    let header = FileHeader {
        version: WRITE_VERSION,
        byte_order,
        nvar,
        nobs,
        data_label: data_label(dataset, options),
        timestamp: options.format_timestamp(),
    };
    Ok((header, descriptors))
}

/// Options label, else the dataset's own label, else the default.
fn data_label(dataset: &DtaDataset, options: &DtaWriterOptions) -> String {
    match &options.data_label {
        Some(label) => label.clone(),
        None if !dataset.label.is_empty() => dataset.label.clone(),
        None => DEFAULT_DATA_LABEL.to_string(),
    }
}
