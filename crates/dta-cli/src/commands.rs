use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use stata_dta::{
    ByteOrder, ColumnData, DtaDataset, DtaWriterOptions, read_dta, str_until_nul,
    write_dta_with_options,
};

use crate::cli::{CsvArgs, HeadArgs, InfoArgs, RewriteArgs};
use crate::summary::{print_head, print_info};

pub fn run_info(args: &InfoArgs) -> Result<()> {
    let dataset = load(&args.file)?;
    print_info(&args.file, &dataset);
    Ok(())
}

pub fn run_head(args: &HeadArgs) -> Result<()> {
    let dataset = load(&args.file)?;
    print_head(&dataset, args.rows);
    Ok(())
}

pub fn run_csv(args: &CsvArgs) -> Result<()> {
    let dataset = load(&args.file)?;
    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_csv(&dataset, file)?;
            info!(path = %path.display(), rows = dataset.num_rows(), "wrote CSV");
        }
        None => write_csv(&dataset, io::stdout().lock())?,
    }
    Ok(())
}

/// Decode `input` and encode it again as version 6. Returns the row count.
pub fn run_rewrite(args: &RewriteArgs) -> Result<usize> {
    let dataset = load(&args.input)?;
    let options = rewrite_options(args);
    write_dta_with_options(&args.output, &dataset, &options)
        .with_context(|| format!("write {}", args.output.display()))?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        rows = dataset.num_rows(),
        "rewrote dataset"
    );
    Ok(dataset.num_rows())
}

fn rewrite_options(args: &RewriteArgs) -> DtaWriterOptions {
    let mut options = DtaWriterOptions::new();
    if let Some(label) = &args.label {
        options = options.with_data_label(label.clone());
    }
    if args.big_endian {
        options = options.with_byte_order(ByteOrder::Big);
    } else if args.little_endian {
        options = options.with_byte_order(ByteOrder::Little);
    }
    options
}

/// Write the data block as CSV with a header row of variable names.
///
/// Missing numeric cells become empty fields; string cells are cut at the
/// first NUL.
pub fn write_csv<W: Write>(dataset: &DtaDataset, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(dataset.columns.iter().map(|c| c.name.as_bytes()))
        .context("write CSV header")?;

    let mut record: Vec<Vec<u8>> = Vec::with_capacity(dataset.num_columns());
    for row in 0..dataset.num_rows() {
        record.clear();
        for column in &dataset.columns {
            record.push(csv_field(&column.data, row));
        }
        csv.write_record(&record).context("write CSV row")?;
    }
    csv.flush().context("flush CSV output")?;
    Ok(())
}

fn csv_field(data: &ColumnData, row: usize) -> Vec<u8> {
    match data {
        ColumnData::Str { values, .. } => values
            .get(row)
            .map(|v| str_until_nul(v).to_vec())
            .unwrap_or_default(),
        _ => match data.get(row) {
            Some(value) if !value.is_missing() => value.to_string().into_bytes(),
            _ => Vec::new(),
        },
    }
}

fn load(path: &Path) -> Result<DtaDataset> {
    read_dta(path).with_context(|| format!("read {}", path.display()))
}
