//! Table rendering for `dta info` and `dta head`.

use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use stata_dta::{DtaColumn, DtaDataset, DtaValue};

pub fn print_info(path: &Path, dataset: &DtaDataset) {
    println!("File: {}", path.display());
    println!("Version: {}", dataset.version);
    if let Some(order) = dataset.byte_order {
        println!("Byte order: {order}");
    }
    println!("Label: {}", dataset.label);
    println!("Timestamp: {}", dataset.timestamp);
    println!("Variables: {}", dataset.num_columns());
    println!("Observations: {}", dataset.num_rows());
    println!("{}", variables_table(dataset));
}

pub fn print_head(dataset: &DtaDataset, rows: usize) {
    println!("{}", head_table(dataset, rows));
}

/// One row per variable: name, storage type, format, label, missing count.
pub fn variables_table(dataset: &DtaDataset) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Format"),
        header_cell("Label"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    for (index, column) in dataset.columns.iter().enumerate() {
        let missing = missing_count(column);
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&column.name).add_attribute(Attribute::Bold),
            Cell::new(column.dtype()),
            optional_cell(column.format.as_deref()),
            optional_cell(column.label.as_deref()),
            if missing > 0 {
                Cell::new(missing).fg(Color::Yellow)
            } else {
                dim_cell(missing)
            },
        ]);
    }
    table
}

/// The first `rows` observations, one column per variable.
pub fn head_table(dataset: &DtaDataset, rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        dataset
            .columns
            .iter()
            .map(|c| header_cell(&c.name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for (index, column) in dataset.columns.iter().enumerate() {
        if !column.dtype().is_string() {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }

    for row in (0..rows.min(dataset.num_rows())).filter_map(|i| dataset.row(i)) {
        table.add_row(row.iter().map(value_cell).collect::<Vec<_>>());
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn missing_count(column: &DtaColumn) -> usize {
    (0..column.len())
        .filter(|&row| column.data.get(row).is_some_and(|v| v.is_missing()))
        .count()
}

fn value_cell(value: &DtaValue) -> Cell {
    if value.is_missing() {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
