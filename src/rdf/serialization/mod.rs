//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL)
//! - N-Triples (NT)
//!
//! Both formats describe plain RDF, so only the asserted graph of a
//! [`Document`](super::Document) is read or written here.

mod turtle;

pub use turtle::{RdfParser, RdfSerializer};

use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Syntax error reported by the parser
    #[error("Parse error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    /// Parsed term rejected by the data model
    #[error("Parse error: {0}")]
    Parse(String),

    /// Base IRI is not an absolute IRI
    #[error("Invalid base IRI: {0}")]
    InvalidBase(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Term the target format cannot express
    #[error("Unsupported term in {format:?}: {term}")]
    Unsupported { format: RdfFormat, term: String },
}

pub type SerializeResult<T> = Result<T, SerializeError>;
