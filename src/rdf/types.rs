//! RDF type definitions
//!
//! Wrapper types around the oxrdf primitives, plus the N3 extensions that
//! oxrdf does not model: variables in any position and quoted graphs used as
//! terms.

use super::namespace::NamespaceTable;
use indexmap::{IndexMap, IndexSet};
use oxrdf::{
    BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode,
    Variable as OxVariable,
};
use std::fmt;
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid blank node
    #[error("Invalid blank node: {0}")]
    InvalidBlankNode(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Invalid variable name
    #[error("Invalid variable: {0}")]
    InvalidVariable(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Named node (IRI)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    /// Create a new named node from an IRI string
    pub fn new(iri: &str) -> RdfResult<Self> {
        OxNamedNode::new(iri)
            .map(Self)
            .map_err(|e| RdfError::InvalidIri(format!("{} ({})", iri, e)))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn inner(&self) -> &OxNamedNode {
        &self.0
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl From<OxNamedNode> for NamedNode {
    fn from(node: OxNamedNode) -> Self {
        Self(node)
    }
}

/// Blank node (anonymous node)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    /// Create a new blank node with a unique identifier
    pub fn new() -> Self {
        Self(OxBlankNode::default())
    }

    /// Create a blank node from a label
    pub fn from_label(label: &str) -> RdfResult<Self> {
        OxBlankNode::new(label)
            .map(Self)
            .map_err(|e| RdfError::InvalidBlankNode(format!("{} ({})", label, e)))
    }

    /// Get the blank node label
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for BlankNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.as_str())
    }
}

/// RDF literal value
///
/// A literal carries either a language tag or a datatype. Plain literals
/// report `xsd:string` as their datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// Create a simple literal (plain string)
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Create a literal with language tag
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    /// Create a typed literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Get the datatype IRI (`rdf:langString` for tagged literals)
    pub fn datatype_iri(&self) -> &str {
        self.0.datatype().as_str()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OxLiteral> for Literal {
    fn from(lit: OxLiteral) -> Self {
        Self(lit)
    }
}

/// Universally quantified N3 variable (`?x`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(OxVariable);

impl Variable {
    pub fn new(name: &str) -> RdfResult<Self> {
        OxVariable::new(name)
            .map(Self)
            .map_err(|e| RdfError::InvalidVariable(format!("{} ({})", name, e)))
    }

    /// Get the variable name without the leading `?`
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.as_str())
    }
}

/// Identifier of a graph inside one document
///
/// `GraphId::TOP` is the asserted graph; every other id names a quoted graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(pub u64);

impl GraphId {
    /// The asserted (top-level) graph
    pub const TOP: GraphId = GraphId(0);

    pub fn is_top(&self) -> bool {
        *self == Self::TOP
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RDF term in any triple position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfTerm {
    Iri(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
    /// A quoted graph of the same document, used as a node
    QuotedGraphRef(GraphId),
}

impl RdfTerm {
    /// Build an IRI term
    pub fn iri(iri: &str) -> RdfResult<Self> {
        NamedNode::new(iri).map(RdfTerm::Iri)
    }

    /// Get the referenced graph if this term is a quoted graph
    pub fn graph_ref(&self) -> Option<GraphId> {
        match self {
            RdfTerm::QuotedGraphRef(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfTerm::Iri(n) => write!(f, "{}", n),
            RdfTerm::BlankNode(b) => write!(f, "{}", b),
            RdfTerm::Literal(l) => write!(f, "{}", l),
            RdfTerm::Variable(v) => write!(f, "{}", v),
            RdfTerm::QuotedGraphRef(id) => write!(f, "{{graph {}}}", id),
        }
    }
}

impl From<NamedNode> for RdfTerm {
    fn from(node: NamedNode) -> Self {
        RdfTerm::Iri(node)
    }
}

impl From<BlankNode> for RdfTerm {
    fn from(node: BlankNode) -> Self {
        RdfTerm::BlankNode(node)
    }
}

impl From<Literal> for RdfTerm {
    fn from(lit: Literal) -> Self {
        RdfTerm::Literal(lit)
    }
}

impl From<Variable> for RdfTerm {
    fn from(var: Variable) -> Self {
        RdfTerm::Variable(var)
    }
}

/// RDF triple (subject-predicate-object)
///
/// N3 puts no positional restrictions on terms, so all three are [`RdfTerm`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Iterate over the three terms in order
    pub fn terms(&self) -> [&RdfTerm; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Rewrite every quoted-graph reference through `f`
    pub fn map_graph_refs(&self, f: impl Fn(GraphId) -> GraphId) -> Triple {
        let map = |term: &RdfTerm| match term {
            RdfTerm::QuotedGraphRef(id) => RdfTerm::QuotedGraphRef(f(*id)),
            other => other.clone(),
        };
        Triple::new(map(&self.subject), map(&self.predicate), map(&self.object))
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// One graph of a document: a set of triples under a [`GraphId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedGraph {
    id: GraphId,
    triples: IndexSet<Triple>,
}

impl QuotedGraph {
    pub fn new(id: GraphId) -> Self {
        Self {
            id,
            triples: IndexSet::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Add a triple, returning false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Quoted graphs referenced by this graph's triples, in triple order
    pub fn references(&self) -> impl Iterator<Item = GraphId> + '_ {
        self.triples
            .iter()
            .flat_map(|t| t.terms())
            .filter_map(RdfTerm::graph_ref)
    }
}

/// A parsed N3 document: the asserted graph, its quoted graphs and namespaces
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    graphs: IndexMap<GraphId, QuotedGraph>,
    namespaces: NamespaceTable,
}

impl Document {
    /// Create a document holding an empty asserted graph
    pub fn new(namespaces: NamespaceTable) -> Self {
        let mut graphs = IndexMap::new();
        graphs.insert(GraphId::TOP, QuotedGraph::new(GraphId::TOP));
        Self { graphs, namespaces }
    }

    /// Get the asserted graph
    pub fn asserted(&self) -> &QuotedGraph {
        &self.graphs[&GraphId::TOP]
    }

    pub fn asserted_mut(&mut self) -> &mut QuotedGraph {
        self.graph_mut(GraphId::TOP)
    }

    pub fn graph(&self, id: GraphId) -> Option<&QuotedGraph> {
        self.graphs.get(&id)
    }

    /// Get a graph, creating it empty if needed
    pub fn graph_mut(&mut self, id: GraphId) -> &mut QuotedGraph {
        self.graphs
            .entry(id)
            .or_insert_with(|| QuotedGraph::new(id))
    }

    /// Add a fresh, empty quoted graph and return its id
    pub fn new_quoted_graph(&mut self) -> GraphId {
        let next = self.graphs.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        let id = GraphId(next);
        self.graphs.insert(id, QuotedGraph::new(id));
        id
    }

    /// Insert or replace a whole graph
    pub fn insert_graph(&mut self, graph: QuotedGraph) {
        self.graphs.insert(graph.id(), graph);
    }

    /// Iterate over all graphs, asserted graph first
    pub fn graphs(&self) -> impl Iterator<Item = &QuotedGraph> {
        self.graphs.values()
    }

    /// Number of triples across all graphs
    pub fn triple_count(&self) -> usize {
        self.graphs.values().map(QuotedGraph::len).sum()
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(NamespaceTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_node() {
        let node = NamedNode::new("http://example.org/alice").unwrap();
        assert_eq!(node.as_str(), "http://example.org/alice");
        assert_eq!(node.to_string(), "<http://example.org/alice>");
        assert!(NamedNode::new("not an iri").is_err());
    }

    #[test]
    fn test_blank_node() {
        let labeled = BlankNode::from_label("b0").unwrap();
        assert_eq!(labeled.to_string(), "_:b0");
        assert_ne!(BlankNode::new(), BlankNode::new());
    }

    #[test]
    fn test_literal_datatypes() {
        let plain = Literal::new_simple_literal("Alice");
        assert_eq!(plain.datatype_iri(), "http://www.w3.org/2001/XMLSchema#string");
        assert_eq!(plain.language(), None);

        let tagged = Literal::new_language_tagged_literal("Bonjour", "fr").unwrap();
        assert_eq!(tagged.language(), Some("fr"));
        assert_eq!(
            tagged.datatype_iri(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString"
        );

        let int = NamedNode::new("http://www.w3.org/2001/XMLSchema#integer").unwrap();
        let typed = Literal::new_typed_literal("42", int);
        assert_eq!(typed.datatype_iri(), "http://www.w3.org/2001/XMLSchema#integer");
    }

    #[test]
    fn test_variable() {
        let var = Variable::new("t2").unwrap();
        assert_eq!(var.as_str(), "t2");
        assert_eq!(var.to_string(), "?t2");
    }

    #[test]
    fn test_graph_references() {
        let mut doc = Document::default();
        let quoted = doc.new_quoted_graph();
        assert_eq!(quoted, GraphId(1));

        let p = RdfTerm::iri("http://example.org/p").unwrap();
        doc.asserted_mut().insert(Triple::new(
            RdfTerm::QuotedGraphRef(quoted),
            p.clone(),
            RdfTerm::QuotedGraphRef(quoted),
        ));
        let refs: Vec<_> = doc.asserted().references().collect();
        assert_eq!(refs, vec![quoted, quoted]);
        assert!(doc.graph(quoted).unwrap().is_empty());
        assert_eq!(doc.triple_count(), 1);
    }

    #[test]
    fn test_duplicate_triples_collapse() {
        let mut graph = QuotedGraph::new(GraphId::TOP);
        let triple = Triple::new(
            RdfTerm::iri("http://example.org/a").unwrap(),
            RdfTerm::iri("http://example.org/b").unwrap(),
            Literal::new_simple_literal("c").into(),
        );
        assert!(graph.insert(triple.clone()));
        assert!(!graph.insert(triple));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_map_graph_refs() {
        let triple = Triple::new(
            RdfTerm::QuotedGraphRef(GraphId(5)),
            RdfTerm::iri("http://example.org/p").unwrap(),
            RdfTerm::QuotedGraphRef(GraphId(7)),
        );
        let mapped = triple.map_graph_refs(|id| GraphId(id.0 - 4));
        assert_eq!(mapped.subject, RdfTerm::QuotedGraphRef(GraphId(1)));
        assert_eq!(mapped.object, RdfTerm::QuotedGraphRef(GraphId(3)));
    }
}
