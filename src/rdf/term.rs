//! RDF term codec
//!
//! | term | atom |
//! |---|---|
//! | IRI | `(uriref u)`, or `(uriref (name fragment))` under the local base |
//! | blank node | `(bnode "b")` |
//! | variable | `(variable v)` |
//! | literal | `((literal (datatype)) "text")` |
//! | tagged literal | `((literal (rdf:langString lang)) "text")` |
//! | quoted graph | `(Graph id)` |
//!
//! The datatype is always written out, `xsd:string` included.

use super::namespace::NamespaceTable;
use super::types::{BlankNode, GraphId, Literal, NamedNode, RdfError, RdfTerm, Variable};
use crate::sexpr::SExpr;
use oxrdf::vocab::{rdf, xsd};
use thiserror::Error;

/// Term codec errors
#[derive(Error, Debug)]
pub enum TermError {
    /// Head symbol names no known term kind
    #[error("Unknown term kind: {head}")]
    UnknownTermKind { head: String },

    /// Known term kind with the wrong shape
    #[error("Malformed term: {reason}")]
    MalformedTerm { reason: String },

    /// `(uriref (name fragment))` names the local namespace but no base is known
    #[error("Local name `{name}` has no base IRI")]
    UnresolvedLocalName { name: String },

    /// Term content is not valid RDF
    #[error(transparent)]
    Invalid(#[from] RdfError),
}

pub type TermResult<T> = Result<T, TermError>;

pub(crate) const URIREF: &str = "uriref";
pub(crate) const BNODE: &str = "bnode";
pub(crate) const VARIABLE: &str = "variable";
pub(crate) const LITERAL: &str = "literal";
pub(crate) const GRAPH: &str = "Graph";

fn malformed(reason: impl Into<String>) -> TermError {
    TermError::MalformedTerm {
        reason: reason.into(),
    }
}

/// `(Graph id)`
pub fn graph_atom(id: GraphId) -> SExpr {
    SExpr::list(vec![SExpr::symbol(GRAPH), SExpr::number(id)])
}

/// Read the id out of a `(Graph id)` atom
pub fn parse_graph_atom(expr: &SExpr) -> Option<GraphId> {
    match expr.as_list()? {
        [head, id] if head.as_symbol() == Some(GRAPH) => id.as_index().map(|i| GraphId(i as u64)),
        _ => None,
    }
}

/// Bidirectional term ⇄ atom translation against one namespace table
pub struct TermCodec<'a> {
    namespaces: &'a NamespaceTable,
}

impl<'a> TermCodec<'a> {
    pub fn new(namespaces: &'a NamespaceTable) -> Self {
        Self { namespaces }
    }

    /// Encode a term as an atom
    pub fn encode(&self, term: &RdfTerm) -> SExpr {
        match term {
            RdfTerm::Iri(node) => {
                let body = match self.namespaces.split_local(node.as_str()) {
                    Some((name, fragment)) => {
                        SExpr::list(vec![SExpr::symbol(name), SExpr::symbol(fragment)])
                    }
                    None => SExpr::symbol(node.as_str()),
                };
                SExpr::list(vec![SExpr::symbol(URIREF), body])
            }
            RdfTerm::BlankNode(node) => {
                SExpr::list(vec![SExpr::symbol(BNODE), SExpr::string(node.as_str())])
            }
            RdfTerm::Variable(var) => {
                SExpr::list(vec![SExpr::symbol(VARIABLE), SExpr::symbol(var.as_str())])
            }
            RdfTerm::Literal(lit) => {
                let mut type_info = vec![SExpr::symbol(lit.datatype_iri())];
                if let Some(lang) = lit.language() {
                    type_info.push(SExpr::symbol(lang));
                }
                SExpr::list(vec![
                    SExpr::list(vec![SExpr::symbol(LITERAL), SExpr::list(type_info)]),
                    SExpr::string(lit.value()),
                ])
            }
            RdfTerm::QuotedGraphRef(id) => graph_atom(*id),
        }
    }

    /// Decode an atom into a term
    pub fn decode(&self, expr: &SExpr) -> TermResult<RdfTerm> {
        let items = expr
            .as_list()
            .ok_or_else(|| malformed(format!("expected a term, found {}", expr)))?;
        let (head, args) = items
            .split_first()
            .ok_or_else(|| malformed("empty list where a term was expected"))?;

        if let SExpr::List(_) = head {
            return self.decode_literal(head, args);
        }

        let kind = head.as_name().unwrap_or_default();
        match (kind, args) {
            (URIREF, [body]) => self.decode_iri(body),
            (BNODE, [label]) => {
                let label = label
                    .as_name()
                    .ok_or_else(|| malformed(format!("blank node label {}", label)))?;
                Ok(BlankNode::from_label(label)?.into())
            }
            (VARIABLE, [name]) => {
                let name = name
                    .as_name()
                    .ok_or_else(|| malformed(format!("variable name {}", name)))?;
                Ok(Variable::new(name)?.into())
            }
            (GRAPH, [id]) => id
                .as_index()
                .map(|i| RdfTerm::QuotedGraphRef(GraphId(i as u64)))
                .ok_or_else(|| malformed(format!("graph id {}", id))),
            (URIREF | BNODE | VARIABLE | GRAPH, _) => Err(malformed(format!(
                "`{}` takes exactly one argument, found {}",
                kind,
                args.len()
            ))),
            _ => Err(TermError::UnknownTermKind {
                head: head.to_string(),
            }),
        }
    }

    fn decode_iri(&self, body: &SExpr) -> TermResult<RdfTerm> {
        let iri = match body {
            SExpr::List(parts) => match parts.as_slice() {
                [name] => name
                    .as_name()
                    .map(str::to_string)
                    .ok_or_else(|| malformed(format!("IRI {}", body)))?,
                [name, fragment] => {
                    let (name, fragment) = name
                        .as_name()
                        .zip(fragment.as_name())
                        .ok_or_else(|| malformed(format!("IRI {}", body)))?;
                    match self.namespaces.local_base(name) {
                        Some(base) => format!("{}{}", base, fragment),
                        None if self.namespaces.is_local_name(name) => {
                            return Err(TermError::UnresolvedLocalName {
                                name: name.to_string(),
                            })
                        }
                        None => format!("{}#{}", name, fragment),
                    }
                }
                _ => return Err(malformed(format!("IRI {}", body))),
            },
            atom => atom
                .as_name()
                .map(str::to_string)
                .ok_or_else(|| malformed(format!("IRI {}", body)))?,
        };
        Ok(NamedNode::new(&iri)?.into())
    }

    fn decode_literal(&self, head: &SExpr, args: &[SExpr]) -> TermResult<RdfTerm> {
        let type_info = match head.as_list() {
            Some([kind, type_info]) if kind.as_symbol() == Some(LITERAL) => type_info,
            _ => {
                return Err(TermError::UnknownTermKind {
                    head: head.to_string(),
                })
            }
        };
        let text = match args {
            [text] => text
                .as_name()
                .ok_or_else(|| malformed(format!("literal text {}", text)))?,
            _ => return Err(malformed(format!("literal needs one text value, found {}", args.len()))),
        };
        let datatype_and_lang = type_info.as_list().map(|items| {
            items
                .iter()
                .map(SExpr::as_name)
                .collect::<Option<Vec<_>>>()
        });

        let literal = match datatype_and_lang {
            Some(Some(parts)) => match parts.as_slice() {
                [dt] if *dt == xsd::STRING.as_str() => Literal::new_simple_literal(text),
                [dt, lang] if *dt == rdf::LANG_STRING.as_str() => {
                    Literal::new_language_tagged_literal(text, *lang)?
                }
                [dt] if *dt == rdf::LANG_STRING.as_str() => {
                    return Err(malformed("language-tagged literal without a language"))
                }
                [dt] => Literal::new_typed_literal(text, NamedNode::new(dt)?),
                _ => return Err(malformed(format!("literal type {}", type_info))),
            },
            _ => return Err(malformed(format!("literal type {}", type_info))),
        };
        Ok(literal.into())
    }
}
