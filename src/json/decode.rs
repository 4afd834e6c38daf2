//! Record reassembly (path-addressed lines → nested value)
//!
//! Lines may arrive in any order. Each leaf is re-inserted at the location its
//! path names, creating intermediate mappings and sequences on demand. The
//! `{}` and `[]` leaves stand for empty containers, and a bare `{}` body is a
//! record with no entries.

use super::{malformed, HostValue, Path, PathResult, EMPTY_MAPPING};
use crate::sexpr::SExpr;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Accumulator node for one record under reconstruction
#[derive(Debug, Default)]
enum Slot {
    #[default]
    Vacant,
    Leaf(HostValue),
    Map(IndexMap<String, Slot>),
    Seq(BTreeMap<usize, Slot>),
}

impl Slot {
    fn as_map(&mut self, record: Option<usize>, path: &Path) -> PathResult<&mut IndexMap<String, Slot>> {
        if let Slot::Vacant = self {
            *self = Slot::Map(IndexMap::new());
        }
        match self {
            Slot::Map(entries) => Ok(entries),
            _ => Err(malformed(
                record,
                format!("`{}` needs a mapping where another value already sits", path),
            )),
        }
    }

    fn as_seq(&mut self, record: Option<usize>, path: &Path) -> PathResult<&mut BTreeMap<usize, Slot>> {
        if let Slot::Vacant = self {
            *self = Slot::Seq(BTreeMap::new());
        }
        match self {
            Slot::Seq(items) => Ok(items),
            _ => Err(malformed(
                record,
                format!("`{}` needs a sequence where another value already sits", path),
            )),
        }
    }

    fn into_value(self, record: Option<usize>, at: &str) -> PathResult<HostValue> {
        match self {
            Slot::Vacant => Err(malformed(record, format!("`{}` has no value", at))),
            Slot::Leaf(leaf) => Ok(leaf),
            Slot::Map(entries) => {
                let mut mapping = IndexMap::with_capacity(entries.len());
                for (key, slot) in entries {
                    let child = if at.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", at, key)
                    };
                    mapping.insert(key, slot.into_value(record, &child)?);
                }
                Ok(HostValue::Mapping(mapping))
            }
            Slot::Seq(items) => {
                let mut sequence = Vec::with_capacity(items.len());
                for (expected, (index, slot)) in items.into_iter().enumerate() {
                    if index != expected {
                        return Err(malformed(
                            record,
                            format!("`{}` is missing sequence index {}", at, expected),
                        ));
                    }
                    sequence.push(slot.into_value(record, &format!("{}[{}]", at, index))?);
                }
                Ok(HostValue::Sequence(sequence))
            }
        }
    }
}

/// One record under reconstruction
#[derive(Debug, Default)]
struct Assembler {
    root: Slot,
}

impl Assembler {
    fn insert(&mut self, path: &Path, leaf: HostValue, record: Option<usize>) -> PathResult<()> {
        let mut slot = &mut self.root;
        for step in path.steps() {
            slot = slot
                .as_map(record, path)?
                .entry(step.key().to_string())
                .or_default();
            for &index in step.indices() {
                slot = slot.as_seq(record, path)?.entry(index).or_default();
            }
        }

        match slot {
            Slot::Vacant => {
                *slot = Slot::Leaf(leaf);
                Ok(())
            }
            _ => Err(malformed(record, format!("`{}` is assigned more than once", path))),
        }
    }

    fn insert_wrapped(&mut self, body: &SExpr, record: Option<usize>) -> PathResult<()> {
        if body.as_symbol() == Some(EMPTY_MAPPING) {
            if !matches!(self.root, Slot::Vacant) {
                return Err(malformed(record, "an empty record also has entries"));
            }
            self.root = Slot::Leaf(HostValue::Mapping(IndexMap::new()));
            return Ok(());
        }
        let (path, leaf) = Path::from_wrapped(body, record)?;
        let leaf = HostValue::from_leaf_atom(leaf, record)?;
        self.insert(&path, leaf, record)
    }

    fn finish(self, record: Option<usize>) -> PathResult<HostValue> {
        match self.root {
            Slot::Vacant => Ok(HostValue::Mapping(IndexMap::new())),
            root => root.into_value(record, ""),
        }
    }
}

/// Reassemble a single document written without record markers
pub fn decode_document(exprs: &[SExpr]) -> PathResult<HostValue> {
    let mut assembler = Assembler::default();
    for expr in exprs {
        assembler.insert_wrapped(expr, None)?;
    }
    assembler.finish(None)
}

/// Reassemble a record set, one mapping per distinct record index
///
/// Every line must have the form `(marker i body)`.
pub fn decode_records(exprs: &[SExpr], marker: &str) -> PathResult<BTreeMap<usize, HostValue>> {
    let mut records: BTreeMap<usize, Assembler> = BTreeMap::new();

    for expr in exprs {
        let (record, body) = match expr.as_list() {
            Some([head, index, body]) if head.as_name() == Some(marker) => {
                let record = index.as_index().ok_or_else(|| {
                    malformed(None, format!("`{}` is not a record index", index))
                })?;
                (record, body)
            }
            _ => {
                return Err(malformed(
                    None,
                    format!("expected `({} <index> <body>)`, found {}", marker, expr),
                ))
            }
        };
        records
            .entry(record)
            .or_default()
            .insert_wrapped(body, Some(record))?;
    }

    let decoded = records
        .into_iter()
        .map(|(record, assembler)| -> PathResult<_> { Ok((record, assembler.finish(Some(record))?)) })
        .collect::<PathResult<BTreeMap<_, _>>>()?;
    debug!("Reassembled records {:?}", decoded.keys().collect::<Vec<_>>());
    info!("Decoded {} lines into {} records", exprs.len(), decoded.len());
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{encode_document, encode_records, PathError};
    use crate::sexpr::parse_str;
    use serde_json::{json, Value};

    fn host(value: Value) -> HostValue {
        value.into()
    }

    #[test]
    fn test_decode_document_any_order() {
        let exprs = parse_str("(outer (bar (y 5)))\n(outer (foo (a 1)))\n(outer (bar (x 4)))").unwrap();
        let value = Value::from(decode_document(&exprs).unwrap());
        assert_eq!(value, json!({"outer": {"bar": {"y": 5, "x": 4}, "foo": {"a": 1}}}));
    }

    #[test]
    fn test_round_trip_nested_sequences() {
        let original = host(json!({
            "name": "Sheryl",
            "tags": [["x", "y"], ["z"]],
            "outer": [[{"a": [[["a", "b"]]], "b": [["x"]]}]],
            "flags": [true, false, null],
            "score": 2.5
        }));
        let lines = encode_document(&original).unwrap();
        assert_eq!(decode_document(&lines).unwrap(), original);
    }

    #[test]
    fn test_decode_records_groups_by_index() {
        let records = vec![host(json!({"a": 1})), host(json!({"a": 2, "b": {"c": "d"}}))];
        let lines = encode_records(&records, "json").unwrap();
        let decoded = decode_records(&lines, "json").unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[&0], records[0]);
        assert_eq!(decoded[&1], records[1]);
    }

    #[test]
    fn test_numeric_strings_come_back_as_numbers() {
        let lines = encode_document(&host(json!({"zip": "02134"}))).unwrap();
        // 02134 is not a JSON number, so it stays a string
        assert_eq!(Value::from(decode_document(&lines).unwrap()), json!({"zip": "02134"}));

        let lines = encode_document(&host(json!({"id": "42"}))).unwrap();
        assert_eq!(Value::from(decode_document(&lines).unwrap()), json!({"id": 42}));
    }

    #[test]
    fn test_leaf_and_mapping_conflict() {
        let exprs = parse_str("(a 1)\n(a (b 2))").unwrap();
        let err = decode_document(&exprs).unwrap_err();
        assert!(matches!(err, PathError::MalformedPath { .. }));
    }

    #[test]
    fn test_duplicate_leaf_is_rejected() {
        let exprs = parse_str("(json 0 (a 1))\n(json 0 (a 2))").unwrap();
        let err = decode_records(&exprs, "json").unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }

    #[test]
    fn test_sequence_gap_is_rejected() {
        let exprs = parse_str("(a 0 \"x\")\n(a 2 \"z\")").unwrap();
        let err = decode_document(&exprs).unwrap_err();
        assert!(err.to_string().contains("missing sequence index 1"));
    }

    #[test]
    fn test_round_trip_empty_containers() {
        for original in [
            json!({"a": [[], [1]]}),
            json!({"a": [{}, {"b": 1}]}),
            json!({"a": {}, "b": [], "c": [[[[]]]]}),
        ] {
            let lines = encode_document(&host(original.clone())).unwrap();
            assert_eq!(Value::from(decode_document(&lines).unwrap()), original);
        }
    }

    #[test]
    fn test_empty_record_round_trip() {
        let records = vec![host(json!({"a": 1})), host(json!({})), host(json!({"b": []}))];
        let decoded = decode_records(&encode_records(&records, "json").unwrap(), "json").unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[&1], records[1]);
        assert_eq!(decoded[&2], records[2]);
    }

    #[test]
    fn test_empty_marker_conflicts() {
        for text in ["(a {})\n(a (b 1))", "(json 0 (a 1))\n(json 0 {})", "(a 0 [])\n(a 0 0 1)"] {
            let exprs = parse_str(text).unwrap();
            let result = if text.starts_with("(json") {
                decode_records(&exprs, "json").map(|_| ())
            } else {
                decode_document(&exprs).map(|_| ())
            };
            assert!(matches!(result, Err(PathError::MalformedPath { .. })), "{text}");
        }
    }

    #[test]
    fn test_wrong_marker_is_rejected() {
        let exprs = parse_str("(csv 0 (a 1))").unwrap();
        assert!(decode_records(&exprs, "json").is_err());
    }

    #[test]
    fn test_list_head_is_rejected() {
        let exprs = parse_str("(json 0 ((a) 1))").unwrap();
        let err = decode_records(&exprs, "json").unwrap_err();
        assert!(matches!(err, PathError::MalformedPath { record: Some(0), .. }));
    }
}
