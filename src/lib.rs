//! MeTTa translation layer
//!
//! Translates heterogeneous host data into the canonical s-expression text
//! read by a MeTTa atom space, and reconstructs the original shape from it.
//!
//! # Translators
//!
//! - [`json`]: nested records flattened into path-addressed atoms
//! - [`rdf`]: RDF terms and N3 documents with quoted graphs
//! - [`table`]: string matrices in eight line layouts
//!
//! All of them build on the [`sexpr`] value type and its escaping rules.
//! Every call is synchronous and owns its state, so independent documents
//! can be translated on separate threads without coordination.
//!
//! ## Example Usage
//!
//! ```rust
//! use metta_translate::json::{decode_records, encode_records, HostValue};
//! use metta_translate::sexpr::{parse_str, to_text};
//!
//! let record = HostValue::from_json_str(r#"{"outer": {"foo": {"a": 1}}}"#).unwrap();
//! let lines = encode_records(&[record.clone()], "json").unwrap();
//! let text = to_text(&lines);
//! assert_eq!(text, "(json 0 (outer (foo (a 1))))\n");
//!
//! let decoded = decode_records(&parse_str(&text).unwrap(), "json").unwrap();
//! assert_eq!(decoded[&0], record);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod json;
pub mod rdf;
pub mod sexpr;
pub mod table;

// Re-export main types for convenience
pub use config::{
    ConfigError, ConfigResult, GraphConfig, GraphEncoding, JsonConfig, RecordErrorPolicy,
    TableConfig, TranslatorConfig,
};

pub use json::{HostValue, Path, PathError, PathFlattener, PathResult, Scalar, Step};

pub use rdf::{
    Document, GraphDecoder, GraphEncoder, GraphError, GraphId, GraphResult, NamespaceTable,
    QuotedGraph, RdfFormat, RdfParser, RdfSerializer, RdfTerm, TermCodec, TermError, Triple,
};

pub use sexpr::{parse_str, to_text, write_lines, SExpr, SExprError, SExprResult};

pub use table::{TableEncoding, TableError, TableMatrix, TableResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
