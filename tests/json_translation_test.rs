use metta_translate::config::{JsonConfig, RecordErrorPolicy};
use metta_translate::json::{
    decode_document, decode_records, encode_document, encode_records, encode_records_with_policy,
    records_from_jsonl, HostValue, PathError, Scalar,
};
use metta_translate::sexpr::{parse_str, to_text};
use pretty_assertions::assert_eq;
use serde_json::json;

fn host(value: serde_json::Value) -> HostValue {
    value.into()
}

#[test]
fn test_record_set_text_round_trip() {
    let records = vec![
        host(json!({
            "id": "t-001",
            "title": "Write report",
            "assignees": ["amy", "raj"],
            "matrix": [[1, 2], [3, 4]],
            "meta": {"done": false, "due": null, "weight": 0.5}
        })),
        host(json!({
            "id": "t-002",
            "steps": [{"name": "draft"}, {"name": "review", "by": ["amy"]}]
        })),
    ];

    let text = to_text(&encode_records(&records, "json").unwrap());
    let decoded = decode_records(&parse_str(&text).unwrap(), "json").unwrap();

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[&0], records[0]);
    assert_eq!(decoded[&1], records[1]);
}

#[test]
fn test_record_lines() {
    let records = vec![host(json!({"outer": {"foo": {"a": 1}}, "tags": [["x", "y"]]}))];
    let text = to_text(&encode_records(&records, "json").unwrap());
    assert_eq!(
        text,
        "(json 0 (outer (foo (a 1))))\n(json 0 (tags 0 0 \"x\"))\n(json 0 (tags 0 1 \"y\"))\n"
    );
}

#[test]
fn test_document_lines() {
    let value = host(json!({"outer": {"foo": {"a": 1}}}));
    let lines = encode_document(&value).unwrap();
    assert_eq!(to_text(&lines), "(outer (foo (a 1)))\n");
    assert_eq!(decode_document(&lines).unwrap(), value);
}

#[test]
fn test_numeric_strings_decode_as_numbers() {
    let value = host(json!({"zip": "12345", "code": "00100"}));
    let decoded = decode_document(&encode_document(&value).unwrap()).unwrap();

    assert_eq!(decoded.get("zip"), Some(&host(json!(12345))));
    // Leading zeros are not a number, so the string survives
    assert_eq!(
        decoded.get("code"),
        Some(&HostValue::Scalar(Scalar::String("00100".to_string())))
    );
}

#[test]
fn test_escaped_text_round_trip() {
    let value = host(json!({"quote": "she said \"hi\" \\ left", "line": "a\nb"}));
    let text = to_text(&encode_document(&value).unwrap());
    let decoded = decode_document(&parse_str(&text).unwrap()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_depth_exceeded_names_record_and_key() {
    let records = vec![
        host(json!({"ok": [1]})),
        host(json!({"deep": [[[[["too deep"]]]]]})),
    ];
    let err = encode_records(&records, "json").unwrap_err();
    match err {
        PathError::DepthExceeded { record, key, depth } => {
            assert_eq!(record, 1);
            assert_eq!(key, "deep");
            assert_eq!(depth, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_skip_policy_keeps_good_records() {
    let records = vec![
        host(json!({"a": 1})),
        host(json!([1, 2])),
        host(json!({"b": 2})),
    ];
    let config = JsonConfig {
        on_record_error: RecordErrorPolicy::Skip,
        ..JsonConfig::default()
    };
    let text = to_text(&encode_records_with_policy(&records, &config).unwrap());
    assert_eq!(text, "(json 0 (a 1))\n(json 2 (b 2))\n");

    let strict = JsonConfig::default();
    assert!(matches!(
        encode_records_with_policy(&records, &strict),
        Err(PathError::NotARecord { record: 1 })
    ));
}

#[test]
fn test_malformed_lines_are_rejected() {
    for text in [
        "(json 0 ((a) 1))",
        "(json x (a 1))",
        "(other 0 (a 1))",
        "(json 0 (a 1))\n(json 0 (a 2))",
    ] {
        let exprs = parse_str(text).unwrap();
        assert!(
            matches!(
                decode_records(&exprs, "json"),
                Err(PathError::MalformedPath { .. })
            ),
            "{text}"
        );
    }
}

#[test]
fn test_jsonl_ingestion() {
    let records = records_from_jsonl("{\"a\": 1}\n\n{\"a\": [true, \"x\"]}\n").unwrap();
    let text = to_text(&encode_records(&records, "rec").unwrap());
    assert_eq!(
        text,
        "(rec 0 (a 1))\n(rec 1 (a 0 true))\n(rec 1 (a 1 \"x\"))\n"
    );
}

#[test]
fn test_empty_containers_round_trip() {
    let records = vec![
        host(json!({"a": [[], [1]]})),
        host(json!({"a": [{}, {"b": 1}]})),
        host(json!({})),
    ];
    let text = to_text(&encode_records(&records, "json").unwrap());
    assert_eq!(
        text,
        "(json 0 (a 0 []))\n(json 0 (a 1 0 1))\n(json 1 (a 0 {}))\n(json 1 (a 1 (b 1)))\n(json 2 {})\n"
    );

    let decoded = decode_records(&parse_str(&text).unwrap(), "json").unwrap();
    assert_eq!(decoded.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(&decoded[&i], record);
    }
}

#[test]
fn test_unrepresentable_numeric_string_round_trip() {
    let value = host(json!({"x": "1e400"}));
    let text = to_text(&encode_document(&value).unwrap());
    assert_eq!(text, "(x \"1e400\")\n");
    assert_eq!(decode_document(&parse_str(&text).unwrap()).unwrap(), value);
}
