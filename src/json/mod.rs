//! Nested host values ⇄ path-addressed s-expressions
//!
//! A JSON-like record is flattened into one line per leaf. Each line
//! wraps the leaf in the chain of keys that leads to it, e.g.
//!
//! ```text
//! {"outer": {"foo": {"a": 1}}, "tags": [["x", "y"]]}
//!
//! (outer (foo (a 1)))
//! (tags 0 0 "x")
//! (tags 0 1 "y")
//! ```
//!
//! Sequences never get a wrapper of their own. The indices walked through
//! nested sequences are folded into the next key instead (`(tags 0 1 ...)`).
//! In a record set every line is additionally prefixed with the record marker
//! and index: `(json 3 (outer (foo (a 1))))`.
//!
//! Empty containers are leaves too, written as the bare atoms `{}` and `[]`
//! (`{"a": [[], [1]]}` becomes `(a 0 [])` and `(a 1 0 1)`).

mod decode;
mod encode;
mod path;

pub use decode::{decode_document, decode_records};
pub use encode::{
    encode_document, encode_record, encode_records, encode_records_with_policy, FlatLeaf,
    PathFlattener,
};
pub use path::{Path, Step, MAX_SEQUENCE_DEPTH};

use crate::sexpr::{is_numeric_text, SExpr};
use indexmap::IndexMap;
use serde_json::{Number, Value};
use thiserror::Error;

/// Path codec errors
#[derive(Error, Debug)]
pub enum PathError {
    /// More nested sequences inside one key than the codec supports
    #[error("record {record}: key `{key}` nests sequences {depth} levels deep (at most {max} supported)", max = MAX_SEQUENCE_DEPTH)]
    DepthExceeded {
        record: usize,
        key: String,
        depth: usize,
    },

    /// Decoded structure does not describe a valid path
    #[error("malformed path{}: {reason}", describe_record(.record))]
    MalformedPath {
        record: Option<usize>,
        reason: String,
    },

    /// Records must be mappings
    #[error("record {record} is not a mapping")]
    NotARecord { record: usize },

    /// Input is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PathResult<T> = Result<T, PathError>;

fn describe_record(record: &Option<usize>) -> String {
    match record {
        Some(i) => format!(" in record {}", i),
        None => String::new(),
    }
}

pub(crate) fn malformed(record: Option<usize>, reason: impl Into<String>) -> PathError {
    PathError::MalformedPath {
        record,
        reason: reason.into(),
    }
}

/// Leaf atom of an empty mapping
pub const EMPTY_MAPPING: &str = "{}";

/// Leaf atom of an empty sequence
pub const EMPTY_SEQUENCE: &str = "[]";

/// Scalar leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Encode as a leaf atom
    ///
    /// Numeric-looking strings are written bare, exactly like numbers, and
    /// come back as numbers. Strings like `1e400` that no JSON number can
    /// hold stay quoted.
    pub fn to_atom(&self) -> SExpr {
        match self {
            Scalar::String(s) if reads_as_number(s) => SExpr::Number(s.clone()),
            Scalar::String(s) => SExpr::Str(s.clone()),
            Scalar::Number(n) => SExpr::number(n),
            Scalar::Bool(b) => SExpr::symbol(if *b { "true" } else { "false" }),
            Scalar::Null => SExpr::symbol("null"),
        }
    }

    /// Decode a leaf atom
    pub fn from_atom(atom: &SExpr, record: Option<usize>) -> PathResult<Self> {
        match atom {
            SExpr::Str(s) => Ok(Scalar::String(s.clone())),
            SExpr::Number(n) => serde_json::from_str::<Number>(n)
                .map(Scalar::Number)
                .map_err(|_| malformed(record, format!("`{}` is not a representable number", n))),
            SExpr::Symbol(s) => match s.as_str() {
                "true" => Ok(Scalar::Bool(true)),
                "false" => Ok(Scalar::Bool(false)),
                "null" => Ok(Scalar::Null),
                other => Err(malformed(
                    record,
                    format!("bare symbol `{}` is not a scalar leaf", other),
                )),
            },
            SExpr::List(_) => Err(malformed(record, "expected a scalar leaf, found a list")),
        }
    }
}

fn reads_as_number(text: &str) -> bool {
    is_numeric_text(text) && serde_json::from_str::<Number>(text).is_ok()
}

/// Nested host value (decoded JSON document)
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Scalar(Scalar),
    Sequence(Vec<HostValue>),
    Mapping(IndexMap<String, HostValue>),
}

impl HostValue {
    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> PathResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(value.into())
    }

    /// Get the entries if this is a mapping
    pub fn as_mapping(&self) -> Option<&IndexMap<String, HostValue>> {
        match self {
            HostValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key if this is a mapping
    pub fn get(&self, key: &str) -> Option<&HostValue> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Scalars and empty containers end a path
    pub fn is_leaf(&self) -> bool {
        match self {
            HostValue::Scalar(_) => true,
            HostValue::Sequence(items) => items.is_empty(),
            HostValue::Mapping(entries) => entries.is_empty(),
        }
    }

    /// Encode a leaf atom
    ///
    /// Containers always encode as their empty marker, so this is only
    /// meaningful where [`HostValue::is_leaf`] holds.
    pub fn to_leaf_atom(&self) -> SExpr {
        match self {
            HostValue::Scalar(scalar) => scalar.to_atom(),
            HostValue::Sequence(_) => SExpr::symbol(EMPTY_SEQUENCE),
            HostValue::Mapping(_) => SExpr::symbol(EMPTY_MAPPING),
        }
    }

    /// Decode a leaf atom, including the empty container markers
    pub fn from_leaf_atom(atom: &SExpr, record: Option<usize>) -> PathResult<Self> {
        match atom.as_symbol() {
            Some(EMPTY_MAPPING) => Ok(HostValue::Mapping(IndexMap::new())),
            Some(EMPTY_SEQUENCE) => Ok(HostValue::Sequence(Vec::new())),
            _ => Scalar::from_atom(atom, record).map(HostValue::Scalar),
        }
    }
}

impl From<Value> for HostValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => HostValue::Scalar(Scalar::Null),
            Value::Bool(b) => HostValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => HostValue::Scalar(Scalar::Number(n)),
            Value::String(s) => HostValue::Scalar(Scalar::String(s)),
            Value::Array(items) => HostValue::Sequence(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => HostValue::Mapping(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<HostValue> for Value {
    fn from(value: HostValue) -> Self {
        match value {
            HostValue::Scalar(Scalar::Null) => Value::Null,
            HostValue::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            HostValue::Scalar(Scalar::Number(n)) => Value::Number(n),
            HostValue::Scalar(Scalar::String(s)) => Value::String(s),
            HostValue::Sequence(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            HostValue::Mapping(entries) => {
                Value::Object(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Parse JSON Lines input, one record per non-blank line
pub fn records_from_jsonl(text: &str) -> PathResult<Vec<HostValue>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(HostValue::from_json_str)
        .collect()
}
