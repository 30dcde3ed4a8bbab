//! DTA file reader.
//!
//! Decoding runs four phases in order, each starting where the previous one
//! left the stream: header, variable descriptors, characteristics, data.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::endian::{CodecContext, FileOrder};
use crate::error::{DtaError, Result};
use crate::header::{read_characteristics, read_descriptors, read_header};
use crate::primitive::PrimitiveReader;
use crate::rows::read_rows;
use crate::types::{DtaColumn, DtaDataset};

/// DTA file reader.
///
/// Reads version 5 or version 6 files in either byte order.
pub struct DtaReader<R: Read> {
    reader: BufReader<R>,
    ctx: Option<CodecContext>,
}

impl<R: Read> DtaReader<R> {
    /// Create a new DTA reader. The host context is detected on first use.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            ctx: None,
        }
    }

    /// Create a new DTA reader with an already detected context.
    pub fn with_context(reader: R, ctx: CodecContext) -> Self {
        Self {
            reader: BufReader::new(reader),
            ctx: Some(ctx),
        }
    }

    /// Decode the whole file.
    ///
    /// # Errors
    ///
    /// Fails on the first contract violation; no partial dataset is returned.
    pub fn read_dataset(self) -> Result<DtaDataset> {
        let ctx = match self.ctx {
            Some(ctx) => ctx,
            None => CodecContext::detect()?,
        };
        let mut input = PrimitiveReader::new(self.reader, FileOrder::new(ctx, ctx.host_order()));

        let header = read_header(&mut input, ctx)?;
        let descriptors = read_descriptors(&mut input, usize::from(header.nvar), header.version)?;
        read_characteristics(&mut input)?;
        let data = read_rows(&mut input, &descriptors, header.nobs)?;

        let columns = descriptors
            .into_iter()
            .zip(data)
            .map(|(desc, data)| DtaColumn {
                name: desc.name,
                format: non_empty(desc.format),
                label: non_empty(desc.label),
                data,
            })
            .collect();

        debug!(nobs = header.nobs, nvar = header.nvar, "decoded dataset");

        Ok(DtaDataset {
            label: header.data_label,
            timestamp: header.timestamp,
            version: header.version,
            byte_order: Some(header.byte_order),
            columns,
        })
    }
}

impl DtaReader<File> {
    /// Open a DTA file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DtaError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DtaError::Io(e)
            }
        })?;
        Ok(Self::new(file))
    }
}

/// Read a DTA file from a path.
pub fn read_dta(path: &Path) -> Result<DtaDataset> {
    DtaReader::open(path)?.read_dataset()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
