//! Integration tests for encoding a dataset and decoding it back.

use std::io::Cursor;

use proptest::prelude::*;
use stata_dta::{
    ByteOrder, CodecContext, ColumnData, DtaColumn, DtaDataset, DtaReader, DtaType, DtaValue,
    DtaVersion, DtaWriter, DtaWriterOptions, str_until_nul,
};

/// Helper to write and read back a dataset.
fn roundtrip(dataset: &DtaDataset, options: DtaWriterOptions) -> DtaDataset {
    let mut buffer = Vec::new();
    {
        let writer = DtaWriter::with_options(Cursor::new(&mut buffer), options);
        writer.write_dataset(dataset).unwrap();
    }
    DtaReader::new(Cursor::new(&buffer)).read_dataset().unwrap()
}

fn host_order() -> ByteOrder {
    CodecContext::detect().unwrap().host_order()
}

#[test]
fn test_all_types_roundtrip() {
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::byte("flag", vec![Some(0), Some(126), None]),
        DtaColumn::int16("year", vec![Some(1998), Some(-32768), None]),
        DtaColumn::int32("pop", vec![Some(-5), None, Some(2_000_000)]),
        DtaColumn::float32("ratio", vec![Some(0.5), Some(-1.25), None]),
        DtaColumn::float64("income", vec![None, Some(31_500.75), Some(-0.0)]),
        DtaColumn::string("region", vec!["north", "", "south-east"]),
    ]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());

    assert_eq!(read_back.version, DtaVersion::V6);
    assert_eq!(read_back.byte_order, Some(host_order()));
    assert_eq!(read_back.label, "Written by stata-dta.");
    assert_eq!(read_back.timestamp, "");
    assert_eq!(read_back.num_rows(), 3);
    assert_eq!(read_back.num_columns(), 6);

    for (before, after) in dataset.columns.iter().take(5).zip(&read_back.columns) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.data, after.data);
        assert_eq!(after.format.as_deref(), Some("%9.0g"));
        assert_eq!(after.label.as_deref(), Some(before.name.as_str()));
    }

    let region = &read_back.columns[5];
    assert_eq!(region.dtype(), DtaType::Str(10));
    assert_eq!(region.format.as_deref(), Some("%10s"));
    assert_eq!(
        read_back.row(0).unwrap()[5].as_str().as_deref(),
        Some("north")
    );
    assert_eq!(read_back.row(1).unwrap()[5].as_str().as_deref(), Some(""));
}

#[test]
fn test_string_width_is_recomputed() {
    // Declared width 30, but no value is longer than 7 bytes.
    let dataset = DtaDataset::with_columns(vec![DtaColumn::new(
        "city",
        ColumnData::Str {
            width: 30,
            values: vec![b"Bergen".to_vec(), b"Tromso\0junk".to_vec(), b"Alesund".to_vec()],
        },
    )]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());
    let ColumnData::Str { width, values } = &read_back.columns[0].data else {
        panic!("expected a string column");
    };
    assert_eq!(*width, 7);
    assert_eq!(values[0], b"Bergen\0");
    assert_eq!(values[1], b"Tromso\0");
    assert_eq!(values[2], b"Alesund");
}

#[test]
fn test_sentinel_values_read_back_missing() {
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::byte("b", vec![Some(127)]),
        DtaColumn::int16("i", vec![Some(i16::MAX)]),
        DtaColumn::int32("l", vec![Some(i32::MAX)]),
        DtaColumn::float32("f", vec![Some(2f32.powi(127))]),
        DtaColumn::float64("d", vec![Some(2f64.powi(1023))]),
    ]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());
    let row = read_back.row(0).unwrap();
    assert!(row.iter().all(DtaValue::is_missing), "{row:?}");
}

#[test]
fn test_non_finite_written_as_missing() {
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::float64("x", vec![Some(f64::NAN), Some(f64::INFINITY), Some(1.0)]),
        DtaColumn::float32("y", vec![Some(f32::NEG_INFINITY), Some(2.0), None]),
    ]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());
    assert_eq!(
        read_back.columns[0].data,
        ColumnData::Float64(vec![None, None, Some(1.0)])
    );
    assert_eq!(
        read_back.columns[1].data,
        ColumnData::Float32(vec![None, Some(2.0), None])
    );
}

#[test]
fn test_name_mangling() {
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::int32("hh.size", vec![Some(4)]),
        DtaColumn::int32("household_income", vec![Some(1)]),
        DtaColumn::int32("a_b.c", vec![Some(2)]),
    ]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());
    let names: Vec<_> = read_back.columns.iter().map(|c| c.name.as_str()).collect();
    // Dots survive; truncation to 8 bytes and pre-existing underscores do not.
    assert_eq!(names, ["hh.size", "househol", "a.b.c"]);
    // The full name is kept as the variable label.
    assert_eq!(
        read_back.columns[1].label.as_deref(),
        Some("household_income")
    );
}

#[test]
fn test_cross_endian_roundtrip() {
    let foreign = host_order().opposite();
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::int16("n", vec![Some(258), None]),
        DtaColumn::int32("l", vec![Some(-16_909_061), Some(7)]),
        DtaColumn::float64("x", vec![Some(1.0), Some(-2.5)]),
    ]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::new().with_byte_order(foreign));
    assert_eq!(read_back.byte_order, Some(foreign));
    assert_eq!(read_back.columns[0].data, dataset.columns[0].data);
    assert_eq!(read_back.columns[1].data, dataset.columns[1].data);
    assert_eq!(read_back.columns[2].data, dataset.columns[2].data);
}

#[test]
fn test_empty_dataset_roundtrip() {
    let read_back = roundtrip(&DtaDataset::new(), DtaWriterOptions::default());
    assert_eq!(read_back.num_columns(), 0);
    assert_eq!(read_back.num_rows(), 0);
}

#[test]
fn test_zero_rows_roundtrip() {
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::float64("x", vec![]),
        DtaColumn::string("s", Vec::<&str>::new()),
    ]);

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());
    assert_eq!(read_back.num_columns(), 2);
    assert_eq!(read_back.num_rows(), 0);
    assert_eq!(read_back.columns[1].dtype(), DtaType::Str(0));
}

#[test]
fn test_custom_label_and_timestamp() {
    let stamp = chrono_stamp();
    let options = DtaWriterOptions::new()
        .with_data_label("Household survey, wave 2")
        .with_timestamp(stamp);
    let dataset = DtaDataset::with_columns(vec![DtaColumn::byte("k", vec![Some(1)])]);

    let read_back = roundtrip(&dataset, options);
    assert_eq!(read_back.label, "Household survey, wave 2");
    assert_eq!(read_back.timestamp, "05 Jun 2023 09:07");
}

#[test]
fn test_dataset_label_written_column_attributes_synthesized() {
    let dataset = DtaDataset::with_columns(vec![
        DtaColumn::int32("x", vec![Some(1)])
            .with_label("X label")
            .with_format("%5.0f"),
    ])
    .with_label("My survey");

    let read_back = roundtrip(&dataset, DtaWriterOptions::default());
    assert_eq!(read_back.label, "My survey");
    // Variable label and format come from the name and the storage type.
    assert_eq!(read_back.columns[0].label.as_deref(), Some("x"));
    assert_eq!(read_back.columns[0].format.as_deref(), Some("%9.0g"));

    let read_back = roundtrip(&dataset, DtaWriterOptions::new().with_data_label("Wave 3"));
    assert_eq!(read_back.label, "Wave 3");
}

fn chrono_stamp() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2023, 6, 5)
        .and_then(|d| d.and_hms_opt(9, 7, 0))
        .unwrap()
}

fn dataset_strategy() -> impl Strategy<Value = DtaDataset> {
    (0usize..24).prop_flat_map(|rows| {
        (
            prop::collection::vec(prop::option::of(i32::MIN..i32::MAX), rows),
            prop::collection::vec(
                prop::option::of(
                    prop::num::f64::NORMAL.prop_filter("sentinel", |x| *x != 2f64.powi(1023)),
                ),
                rows,
            ),
            prop::collection::vec("[a-zA-Z0-9 ]{0,16}", rows),
            prop::collection::vec(prop::option::of(0u8..127), rows),
        )
            .prop_map(|(ints, floats, strings, bytes)| {
                DtaDataset::with_columns(vec![
                    DtaColumn::int32("id", ints),
                    DtaColumn::float64("value", floats),
                    DtaColumn::string("note", strings),
                    DtaColumn::byte("code", bytes),
                ])
            })
    })
}

proptest! {
    #[test]
    fn prop_roundtrip_preserves_cells(dataset in dataset_strategy(), big in any::<bool>()) {
        let order = if big { ByteOrder::Big } else { ByteOrder::Little };
        let read_back = roundtrip(&dataset, DtaWriterOptions::new().with_byte_order(order));

        prop_assert_eq!(read_back.num_rows(), dataset.num_rows());
        prop_assert_eq!(&read_back.columns[0].data, &dataset.columns[0].data);
        prop_assert_eq!(&read_back.columns[1].data, &dataset.columns[1].data);
        prop_assert_eq!(&read_back.columns[3].data, &dataset.columns[3].data);

        let (ColumnData::Str { values: before, .. }, ColumnData::Str { values: after, .. }) =
            (&dataset.columns[2].data, &read_back.columns[2].data)
        else {
            panic!("expected string columns");
        };
        for (a, b) in before.iter().zip(after) {
            prop_assert_eq!(str_until_nul(a), str_until_nul(b));
        }
    }
}
