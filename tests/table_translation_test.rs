use metta_translate::config::TranslatorConfig;
use metta_translate::sexpr::{parse_str, to_text};
use metta_translate::table::{
    self, decode_header_row, encode_header_row, TableEncoding, TableError, TableMatrix,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn customers() -> TableMatrix {
    [
        ["Index", "Name", "Phone", "Website"],
        ["1", "Alice Johnson", "384.555.0192x123", "http://www.alicejservices.com/"],
        ["2", "Michael Smith", "(512)987-6543x56789", "http://www.msmithtech.net/"],
        ["3", "Emily Davis", "+1-310-555-6789", "http://www.emilydavisconsulting.org/"],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect()
}

#[test]
fn test_header_row_shape() {
    let m = customers();
    let text = to_text(&encode_header_row(&m).unwrap());
    let decoded = decode_header_row(&parse_str(&text).unwrap()).unwrap();
    assert_eq!(decoded, m);
}

#[test]
fn test_row_example() {
    let m: TableMatrix = vec![
        vec!["Index".into(), "Name".into()],
        vec!["1".into(), "Alice".into()],
        vec!["2".into(), "Bob".into()],
    ];
    let text = to_text(&table::encode(&m, TableEncoding::Row).unwrap());
    assert_eq!(
        text,
        "(0 (\"Index\" \"Name\"))\n(1 (\"1\" \"Alice\"))\n(2 (\"2\" \"Bob\"))\n"
    );
}

#[test]
fn test_every_encoding_through_text() {
    let m = customers();
    for encoding in TableEncoding::ALL {
        let text = to_text(&table::encode(&m, encoding).unwrap());
        let decoded = table::decode(&parse_str(&text).unwrap(), encoding).unwrap();
        assert_eq!(decoded, m, "{encoding:?}");
    }
}

#[test]
fn test_struct_rows_are_unordered() {
    let text = "((\"Index\" \"2\") (\"Name\" \"Bob\"))\n((\"Index\" \"1\") (\"Name\" \"Alice\"))\n";
    let decoded = table::decode(&parse_str(text).unwrap(), TableEncoding::Struct).unwrap();
    let mut rows = decoded[1..].to_vec();
    rows.sort();
    assert_eq!(
        rows,
        vec![
            vec!["1".to_string(), "Alice".to_string()],
            vec!["2".to_string(), "Bob".to_string()],
        ]
    );
}

#[test]
fn test_ragged_matrix_produces_nothing() {
    let mut m = customers();
    m[2].pop();
    for encoding in TableEncoding::ALL {
        match table::encode(&m, encoding) {
            Err(TableError::RaggedMatrix { row, expected, found }) => {
                assert_eq!((row, expected, found), (2, 4, 3), "{encoding:?}");
            }
            other => panic!("{encoding:?}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_encoding_from_config() {
    let config = TranslatorConfig::from_yaml_str("table:\n  encoding: function\n").unwrap();
    assert_eq!(config.table.encoding, TableEncoding::Function);
    let lines = table::encode(&customers(), config.table.encoding).unwrap();
    assert_eq!(lines[1].to_string(), r#"(= (value ("Name" 0)) "Alice Johnson")"#);
}

fn matrices() -> impl Strategy<Value = TableMatrix> {
    (1usize..5, 1usize..6).prop_flat_map(|(width, height)| {
        prop::collection::vec(
            prop::collection::vec("[ -~]{0,8}", width..=width),
            height..=height,
        )
    })
}

proptest! {
    #[test]
    fn prop_positional_encodings_round_trip(m in matrices()) {
        for encoding in [TableEncoding::Row, TableEncoding::HeaderRow, TableEncoding::Column, TableEncoding::Cell] {
            let text = to_text(&table::encode(&m, encoding).unwrap());
            let decoded = table::decode(&parse_str(&text).unwrap(), encoding).unwrap();
            prop_assert_eq!(&decoded, &m);
        }
    }
}
