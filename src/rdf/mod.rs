//! RDF and N3 graphs ⇄ s-expressions
//!
//! This module implements:
//! - RDF terms, triples and N3 documents with quoted graphs
//! - Namespace tables with a relocatable local namespace
//! - The term codec (`(uriref …)`, `(bnode …)`, `((literal …) …)`, …)
//! - The quoted-graph translator, in quoted and flat line layouts
//! - Turtle / N-Triples ingestion and output
//!
//! # Example
//!
//! ```rust
//! use metta_translate::rdf::{Document, GraphDecoder, GraphEncoder, RdfTerm, Triple};
//!
//! let mut doc = Document::default();
//! let formula = doc.new_quoted_graph();
//! doc.graph_mut(formula).insert(Triple::new(
//!     RdfTerm::iri("ex:a").unwrap(),
//!     RdfTerm::iri("ex:p").unwrap(),
//!     RdfTerm::iri("ex:c").unwrap(),
//! ));
//! doc.asserted_mut().insert(Triple::new(
//!     RdfTerm::iri("ex:Let").unwrap(),
//!     RdfTerm::iri("ex:param1").unwrap(),
//!     RdfTerm::QuotedGraphRef(formula),
//! ));
//!
//! let lines = GraphEncoder::default().encode(&doc).unwrap();
//! assert_eq!(
//!     lines[0].to_string(),
//!     "((Graph 0) ((uriref ex:Let) (uriref ex:param1) (Graph 1)))"
//! );
//! assert_eq!(GraphDecoder::default().decode(&lines).unwrap(), doc);
//! ```

mod identity;
mod namespace;
mod serialization;
mod term;
mod translator;
mod types;

pub use types::{
    BlankNode, Document, GraphId, Literal, NamedNode, QuotedGraph, RdfError, RdfResult, RdfTerm,
    Triple, Variable,
};

pub use namespace::{LocalNamespace, NamespaceTable, PrefixError, PrefixResult, LOCAL_LABEL};

pub use term::{graph_atom, parse_graph_atom, TermCodec, TermError, TermResult};

pub use identity::{GraphIdAllocator, GraphIdentities, GraphState};

pub use translator::{GraphDecoder, GraphEncoder, GraphError, GraphResult};

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult,
};
