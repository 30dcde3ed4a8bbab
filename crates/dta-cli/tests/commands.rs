//! Integration tests for the `dta` subcommands.

use std::path::Path;

use dta_cli::cli::{CsvArgs, InfoArgs, RewriteArgs};
use dta_cli::commands::{run_csv, run_info, run_rewrite};
use stata_dta::{
    ByteOrder, ColumnData, DtaColumn, DtaDataset, DtaWriterOptions, read_dta,
    write_dta_with_options,
};
use tempfile::tempdir;

fn write_sample(path: &Path) {
    let ds = DtaDataset::with_columns(vec![
        DtaColumn::int16("wave", vec![Some(1), Some(2), None]),
        DtaColumn::float64("hh.inc", vec![Some(1200.5), None, Some(980.0)]),
        DtaColumn::string("region", vec!["north", "east", "west"]),
    ]);
    let options = DtaWriterOptions::new()
        .with_data_label("panel extract")
        .with_byte_order(ByteOrder::Little);
    write_dta_with_options(path, &ds, &options).unwrap();
}

fn rewrite_args(input: &Path, output: &Path) -> RewriteArgs {
    RewriteArgs {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        label: None,
        big_endian: false,
        little_endian: false,
    }
}

#[test]
fn test_rewrite_keeps_label_and_data() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.dta");
    let output = dir.path().join("out.dta");
    write_sample(&input);

    let rows = run_rewrite(&rewrite_args(&input, &output)).unwrap();
    assert_eq!(rows, 3);

    let back = read_dta(&output).unwrap();
    assert_eq!(back.label, "panel extract");
    assert_eq!(back.columns[0].data, ColumnData::Int16(vec![Some(1), Some(2), None]));
    assert_eq!(back.columns[1].name, "hh.inc");
}

#[test]
fn test_rewrite_big_endian_with_label() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.dta");
    let output = dir.path().join("out.dta");
    write_sample(&input);

    let args = RewriteArgs {
        label: Some("converted".to_string()),
        big_endian: true,
        ..rewrite_args(&input, &output)
    };
    run_rewrite(&args).unwrap();

    let back = read_dta(&output).unwrap();
    assert_eq!(back.byte_order, Some(ByteOrder::Big));
    assert_eq!(back.label, "converted");
    assert_eq!(
        back.columns[1].data,
        ColumnData::Float64(vec![Some(1200.5), None, Some(980.0)])
    );
}

#[test]
fn test_csv_export_to_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.dta");
    let output = dir.path().join("out.csv");
    write_sample(&input);

    run_csv(&CsvArgs {
        file: input,
        output: Some(output.clone()),
    })
    .unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "wave,hh.inc,region");
    assert_eq!(lines[1], "1,1200.5,north");
    assert_eq!(lines[2], "2,,east");
    assert_eq!(lines[3], ",980,west");
}

#[test]
fn test_info_reports_missing_file() {
    let dir = tempdir().unwrap();
    let err = run_info(&InfoArgs {
        file: dir.path().join("absent.dta"),
    })
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("absent.dta"), "{message}");
    assert!(message.contains("file not found"), "{message}");
}
