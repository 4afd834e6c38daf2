//! RDF namespace and prefix management
//!
//! Besides ordinary prefixes, a table may carry one local namespace bound to
//! the document being translated. IRIs under the local base are written
//! relative to the document's short name so the output stays valid when the
//! document moves.

use indexmap::IndexMap;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Not a compact IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Label reserved for the local namespace
pub const LOCAL_LABEL: &str = "local";

/// The namespace of the document itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNamespace {
    /// Short name written in place of the base, e.g. `check_list.n3`
    pub name: String,
    /// Absolute base the short name stands for, ending in `#`
    pub base: Option<String>,
}

impl LocalNamespace {
    /// Derive the local namespace from a document identifier
    ///
    /// `file:///data/check_list.n3` becomes name `check_list.n3` with base
    /// `file:///data/check_list.n3#`.
    pub fn from_document_id(document_id: &str) -> Self {
        let trimmed = document_id.trim_end_matches('#');
        let name = trimmed
            .rsplit('/')
            .next()
            .unwrap_or(trimmed)
            .to_string();
        Self {
            name,
            base: Some(format!("{}#", trimmed)),
        }
    }
}

/// Prefix → IRI mappings plus the optional local namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    prefixes: IndexMap<String, String>,
    local: Option<LocalNamespace>,
}

impl NamespaceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with common RDF/RDFS/OWL prefixes
    pub fn with_common_prefixes() -> Self {
        let mut table = Self::new();
        table.add_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        table.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        table.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        table.add_prefix("owl", "http://www.w3.org/2002/07/owl#");
        table.add_prefix("log", "http://www.w3.org/2000/10/swap/log#");
        table
    }

    /// Bind the local namespace to a document identifier
    pub fn with_local(mut self, document_id: &str) -> Self {
        self.local = Some(LocalNamespace::from_document_id(document_id));
        self
    }

    /// Add a prefix; the local label is handled by [`set_local`](Self::set_local)
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    pub fn set_local(&mut self, local: LocalNamespace) {
        self.local = Some(local);
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        match compact_iri.split_once(':') {
            Some((prefix, local)) => Ok(format!("{}{}", self.get_iri(prefix)?, local)),
            None => Err(PrefixError::InvalidIri(compact_iri.to_string())),
        }
    }

    /// Registered prefixes in insertion order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, iri)| (p.as_str(), iri.as_str()))
    }

    pub fn local(&self) -> Option<&LocalNamespace> {
        self.local.as_ref()
    }

    /// Split an IRI under the local base into (short name, fragment)
    ///
    /// Returns `None` when there is no local base, the IRI lies outside it,
    /// or the fragment would be empty.
    pub fn split_local<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        let local = self.local.as_ref()?;
        let fragment = iri.strip_prefix(local.base.as_deref()?)?;
        if fragment.is_empty() {
            None
        } else {
            Some((local.name.as_str(), fragment))
        }
    }

    /// Resolve a local short name back to its base
    pub fn local_base(&self, name: &str) -> Option<&str> {
        self.local
            .as_ref()
            .filter(|local| local.name == name)
            .and_then(|local| local.base.as_deref())
    }

    /// Check if a name is the local short name
    pub fn is_local_name(&self, name: &str) -> bool {
        self.local.as_ref().is_some_and(|local| local.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.local.is_none()
    }
}
