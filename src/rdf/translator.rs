//! Quoted-graph translator (Document ⇄ graph lines)
//!
//! ```text
//! ((Graph 0) ((uriref ex:Let) (uriref ex:param1) (Graph 1)))
//! ((Graph 1) ((uriref ex:a) (uriref ex:p) (uriref ex:c)))
//! (Namespace ("ex" "http://example.org/"))
//! ```
//!
//! A quoted graph used as a term is written as `(Graph id)` at the point of
//! reference and its triples follow on lines of their own. Ids are numbered
//! in order of first reference, so they do not depend on how the source
//! document labelled its formulas. An empty quoted graph is written as a bare
//! `((Graph id))` definition line.

use super::identity::GraphIdentities;
use super::namespace::{LocalNamespace, NamespaceTable, LOCAL_LABEL};
use super::term::{graph_atom, parse_graph_atom, TermCodec, TermError};
use super::types::{Document, GraphId, QuotedGraph, RdfTerm, Triple};
use crate::config::{GraphConfig, GraphEncoding};
use crate::sexpr::SExpr;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Graph translation errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// A `(Graph id)` term names a graph with no definition
    #[error("Graph {graph} is referenced from graph {referenced_from} but never defined")]
    DanglingGraphReference {
        graph: GraphId,
        referenced_from: GraphId,
    },

    /// A graph contains itself, directly or transitively
    #[error("Graph {graph} is part of a reference cycle")]
    CyclicGraphReference { graph: GraphId },

    /// The flat encoding has no way to write quoted graphs
    #[error("Quoted graph {graph} cannot be written in the flat encoding")]
    QuotedGraphInFlatEncoding { graph: GraphId },

    /// Line is neither a statement nor a namespace
    #[error("Malformed statement on line {line}: {reason}")]
    MalformedStatement { line: usize, reason: String },

    /// A term inside a statement failed to decode
    #[error("Term error in graph {graph}: {source}")]
    Term {
        graph: GraphId,
        #[source]
        source: TermError,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;

const NAMESPACE: &str = "Namespace";

/// Walk the reference structure from the asserted graph, rejecting dangling
/// references and cycles
///
/// Returns every graph the walk reached, the asserted graph included.
fn check_references(document: &Document) -> GraphResult<HashSet<GraphId>> {
    let refs_of = |graph: &QuotedGraph| graph.references().collect::<Vec<_>>().into_iter();

    let mut on_path = HashSet::from([GraphId::TOP]);
    let mut done = HashSet::new();
    let mut stack = vec![(GraphId::TOP, refs_of(document.asserted()))];

    while let Some((current, refs)) = stack.last_mut() {
        let current = *current;
        match refs.next() {
            Some(next) => {
                if on_path.contains(&next) {
                    return Err(GraphError::CyclicGraphReference { graph: next });
                }
                if done.contains(&next) {
                    continue;
                }
                let graph = document
                    .graph(next)
                    .ok_or(GraphError::DanglingGraphReference {
                        graph: next,
                        referenced_from: current,
                    })?;
                on_path.insert(next);
                stack.push((next, refs_of(graph)));
            }
            None => {
                stack.pop();
                on_path.remove(&current);
                done.insert(current);
            }
        }
    }
    Ok(done)
}

struct Flattened {
    lines: Vec<SExpr>,
    identities: GraphIdentities,
}

fn flatten(document: &Document) -> GraphResult<Flattened> {
    check_references(document)?;

    let codec = TermCodec::new(document.namespaces());
    let mut identities = GraphIdentities::new();
    let mut queue = VecDeque::from([(GraphId::TOP, GraphId::TOP)]);
    let mut lines = Vec::new();

    while let Some((source, emitted)) = queue.pop_front() {
        let graph = document
            .graph(source)
            .ok_or(GraphError::DanglingGraphReference {
                graph: source,
                referenced_from: GraphId::TOP,
            })?;
        let label = graph_atom(emitted);

        if graph.is_empty() && !source.is_top() {
            lines.push(SExpr::list(vec![label.clone()]));
        }

        let mut encode_term = |term: &RdfTerm| match term.graph_ref() {
            Some(referenced) => {
                let (id, fresh) = identities.resolve(referenced);
                if fresh {
                    queue.push_back((referenced, id));
                }
                graph_atom(id)
            }
            None => codec.encode(term),
        };
        for triple in graph.triples() {
            let statement = Vec::from(triple.terms().map(&mut encode_term));
            lines.push(SExpr::list(vec![label.clone(), SExpr::list(statement)]));
        }

        identities.mark_flattened(source);
        debug!(
            "Flattened graph {} as graph {} ({} triples)",
            source,
            emitted,
            graph.len()
        );
    }

    let unreachable = document
        .graphs()
        .filter(|graph| identities.state(graph.id()).is_none())
        .count();
    if unreachable > 0 {
        warn!(
            "Skipped {} quoted graphs not reachable from the asserted graph",
            unreachable
        );
    }

    Ok(Flattened { lines, identities })
}

fn encode_flat(document: &Document) -> GraphResult<Vec<SExpr>> {
    let codec = TermCodec::new(document.namespaces());
    document
        .asserted()
        .triples()
        .map(|triple| -> GraphResult<SExpr> {
            let terms = triple
                .terms()
                .into_iter()
                .map(|term| match term.graph_ref() {
                    Some(graph) => Err(GraphError::QuotedGraphInFlatEncoding { graph }),
                    None => Ok(codec.encode(term)),
                })
                .collect::<GraphResult<Vec<_>>>()?;
            Ok(SExpr::list(terms))
        })
        .collect()
}

fn namespace_atom(label: &str, uri: &str) -> SExpr {
    SExpr::list(vec![
        SExpr::symbol(NAMESPACE),
        SExpr::list(vec![SExpr::string(label), SExpr::string(uri)]),
    ])
}

/// `(Namespace (label uri))` lines; the local entry carries the short name
fn namespace_atoms(namespaces: &NamespaceTable) -> Vec<SExpr> {
    let mut atoms: Vec<SExpr> = namespaces
        .prefixes()
        .filter(|(label, _)| *label != LOCAL_LABEL)
        .map(|(label, uri)| namespace_atom(label, uri))
        .collect();
    if let Some(local) = namespaces.local() {
        atoms.push(namespace_atom(LOCAL_LABEL, &local.name));
    }
    atoms
}

fn parse_namespace_atom(expr: &SExpr) -> Option<(&str, &str)> {
    match expr.as_list()? {
        [_, binding] => match binding.as_list()? {
            [label, uri] => label.as_name().zip(uri.as_name()),
            _ => None,
        },
        _ => None,
    }
}

/// `((Graph id) (s p o))` or `((Graph id))`
fn parse_graph_line(expr: &SExpr) -> Option<(GraphId, Option<[&SExpr; 3]>)> {
    match expr.as_list()? {
        [label] => Some((parse_graph_atom(label)?, None)),
        [label, body] => {
            let graph = parse_graph_atom(label)?;
            match body.as_list()? {
                [s, p, o] => Some((graph, Some([s, p, o]))),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Writes documents as graph lines
pub struct GraphEncoder {
    config: GraphConfig,
}

impl GraphEncoder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Encode a document, namespace lines last
    pub fn encode(&self, document: &Document) -> GraphResult<Vec<SExpr>> {
        let mut lines = match self.config.encoding {
            GraphEncoding::Quoted => flatten(document)?.lines,
            GraphEncoding::Flat => encode_flat(document)?,
        };
        let statements = lines.len();
        if self.config.translate_namespaces {
            lines.extend(namespace_atoms(document.namespaces()));
        }
        info!(
            "Encoded {} triples into {} statement lines and {} namespace lines",
            document.triple_count(),
            statements,
            lines.len() - statements
        );
        Ok(lines)
    }
}

impl Default for GraphEncoder {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

struct Statement<'a> {
    line: usize,
    graph: GraphId,
    terms: [&'a SExpr; 3],
}

/// Reads graph lines back into a document
pub struct GraphDecoder {
    config: GraphConfig,
    document_id: Option<String>,
}

impl GraphDecoder {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            document_id: None,
        }
    }

    /// Resolve local names against this document identifier
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Decode graph lines in any order
    ///
    /// All graph ids are collected before any term is resolved, so a graph
    /// may be referenced before its definition lines appear.
    pub fn decode(&self, exprs: &[SExpr]) -> GraphResult<Document> {
        let mut statements = Vec::new();
        let mut defined = IndexSet::from([GraphId::TOP]);
        let mut namespaces = NamespaceTable::new();
        let mut local_name = None;

        for (i, expr) in exprs.iter().enumerate() {
            let line = i + 1;
            let malformed = |reason: String| GraphError::MalformedStatement { line, reason };

            if expr.has_head(NAMESPACE) {
                let (label, uri) = parse_namespace_atom(expr)
                    .ok_or_else(|| malformed(format!("expected `(Namespace (label uri))`, found {}", expr)))?;
                if label == LOCAL_LABEL {
                    local_name = Some(uri.to_string());
                } else {
                    namespaces.add_prefix(label, uri);
                }
                continue;
            }

            match self.config.encoding {
                GraphEncoding::Quoted => {
                    let (graph, terms) = parse_graph_line(expr).ok_or_else(|| {
                        malformed(format!("expected `((Graph id) (s p o))`, found {}", expr))
                    })?;
                    defined.insert(graph);
                    if let Some(terms) = terms {
                        statements.push(Statement { line, graph, terms });
                    }
                }
                GraphEncoding::Flat => match expr.as_list() {
                    Some([s, p, o]) => statements.push(Statement {
                        line,
                        graph: GraphId::TOP,
                        terms: [s, p, o],
                    }),
                    _ => return Err(malformed(format!("expected `(s p o)`, found {}", expr))),
                },
            }
        }

        let derived = self
            .document_id
            .as_deref()
            .map(LocalNamespace::from_document_id);
        match (local_name, derived) {
            (Some(name), derived) => namespaces.set_local(LocalNamespace {
                name,
                base: derived.and_then(|local| local.base),
            }),
            (None, Some(derived)) => namespaces.set_local(derived),
            (None, None) => {}
        }

        let mut graphs: IndexMap<GraphId, QuotedGraph> = defined
            .iter()
            .map(|id| (*id, QuotedGraph::new(*id)))
            .collect();
        {
            let codec = TermCodec::new(&namespaces);
            for statement in &statements {
                let graph = statement.graph;
                let decode = |expr: &SExpr| -> GraphResult<RdfTerm> {
                    let term = codec
                        .decode(expr)
                        .map_err(|source| GraphError::Term { graph, source })?;
                    match (term.graph_ref(), self.config.encoding) {
                        (Some(referenced), GraphEncoding::Flat) => {
                            Err(GraphError::QuotedGraphInFlatEncoding { graph: referenced })
                        }
                        (Some(referenced), GraphEncoding::Quoted) if referenced.is_top() => {
                            Err(GraphError::CyclicGraphReference { graph: referenced })
                        }
                        (Some(referenced), GraphEncoding::Quoted) if !defined.contains(&referenced) => {
                            Err(GraphError::DanglingGraphReference {
                                graph: referenced,
                                referenced_from: graph,
                            })
                        }
                        _ => Ok(term),
                    }
                };
                let [s, p, o] = statement.terms;
                let triple = Triple::new(decode(s)?, decode(p)?, decode(o)?);
                if let Some(target) = graphs.get_mut(&graph) {
                    if !target.insert(triple) {
                        debug!("Duplicate statement on line {} ignored", statement.line);
                    }
                }
            }
        }

        let mut document = Document::new(namespaces);
        for graph in graphs.into_values() {
            document.insert_graph(graph);
        }
        let reachable = check_references(&document)?;
        let unreachable: Vec<GraphId> = defined
            .iter()
            .filter(|id| !reachable.contains(id))
            .copied()
            .collect();
        if !unreachable.is_empty() {
            warn!(
                "Decoded {} quoted graphs not reachable from the asserted graph: {:?}",
                unreachable.len(),
                unreachable
            );
        }

        info!(
            "Decoded {} lines into {} graphs with {} triples",
            exprs.len(),
            defined.len(),
            document.triple_count()
        );
        Ok(document)
    }
}

impl Default for GraphDecoder {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl Document {
    /// Renumber quoted graphs in order of first reference
    ///
    /// Two documents with the same shape compare equal after canonicalizing,
    /// whatever ids their quoted graphs carried before. Graphs not reachable
    /// from the asserted graph are dropped.
    pub fn canonicalize(&self) -> GraphResult<Document> {
        let flattened = flatten(self)?;
        let mapping: HashMap<GraphId, GraphId> = flattened.identities.assignments().collect();

        let mut canonical = Document::new(self.namespaces().clone());
        for (source, emitted) in flattened.identities.assignments() {
            let Some(graph) = self.graph(source) else {
                continue;
            };
            let mut renumbered = QuotedGraph::new(emitted);
            for triple in graph.triples() {
                renumbered.insert(triple.map_graph_refs(|id| mapping.get(&id).copied().unwrap_or(id)));
            }
            canonical.insert_graph(renumbered);
        }
        Ok(canonical)
    }
}
