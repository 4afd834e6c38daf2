//! Turtle and N-Triples implementation

use super::{ParseError, ParseResult, RdfFormat, SerializeError, SerializeResult};
use crate::rdf::{
    BlankNode, Document, Literal, NamedNode, NamespaceTable, QuotedGraph, RdfError, RdfTerm,
    Triple,
};
use oxiri::Iri;
use oxrdf::vocab::xsd;
use rio_api::formatter::TriplesFormatter;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use tracing::info;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse into a document whose asserted graph holds every triple
    ///
    /// With a base IRI, relative IRIs resolve against it and the document's
    /// local namespace is bound to it. Turtle `@prefix` declarations land in
    /// the namespace table, sorted by label.
    pub fn parse(input: &str, format: RdfFormat, base: Option<&str>) -> ParseResult<Document> {
        let namespaces = match base {
            Some(base) => NamespaceTable::new().with_local(base),
            None => NamespaceTable::new(),
        };
        let mut document = Document::new(namespaces);

        let graph = document.asserted_mut();
        let mut on_triple = |t: model::Triple<'_>| -> ParseResult<()> {
            graph.insert(convert_triple(t)?);
            Ok(())
        };
        let prefixes = match format {
            RdfFormat::Turtle => {
                let base_iri = base
                    .map(|b| Iri::parse(b.to_string()))
                    .transpose()
                    .map_err(|e| ParseError::InvalidBase(e.to_string()))?;
                let mut parser = TurtleParser::new(input.as_bytes(), base_iri);
                parser.parse_all(&mut on_triple)?;
                let mut prefixes: Vec<(String, String)> = parser
                    .prefixes()
                    .iter()
                    .map(|(label, iri)| (label.clone(), iri.clone()))
                    .collect();
                prefixes.sort();
                prefixes
            }
            RdfFormat::NTriples => {
                NTriplesParser::new(input.as_bytes()).parse_all(&mut on_triple)?;
                Vec::new()
            }
        };

        let prefix_count = prefixes.len();
        for (label, iri) in prefixes {
            document.namespaces_mut().add_prefix(label, iri);
        }

        info!(
            "Parsed {} triples and {} prefixes ({:?})",
            document.asserted().len(),
            prefix_count,
            format
        );
        Ok(document)
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize one graph
    ///
    /// Variables, quoted graphs and literals outside the object position
    /// have no Turtle or N-Triples form and are rejected.
    pub fn serialize(graph: &QuotedGraph, format: RdfFormat) -> SerializeResult<String> {
        let mut output = Vec::new();
        match format {
            RdfFormat::Turtle => {
                let mut formatter = TurtleFormatter::new(&mut output);
                for triple in graph.triples() {
                    write_triple(&mut formatter, triple, format)?;
                }
                formatter.finish()?;
            }
            RdfFormat::NTriples => {
                let mut formatter = NTriplesFormatter::new(&mut output);
                for triple in graph.triples() {
                    write_triple(&mut formatter, triple, format)?;
                }
            }
        }

        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

fn write_triple<F>(formatter: &mut F, triple: &Triple, format: RdfFormat) -> SerializeResult<()>
where
    F: TriplesFormatter<Error = std::io::Error>,
{
    let rio_triple = model::Triple {
        subject: rio_subject(&triple.subject, format)?,
        predicate: rio_named(&triple.predicate, format)?,
        object: rio_object(&triple.object, format)?,
    };
    formatter.format(&rio_triple)?;
    Ok(())
}

fn unsupported(term: &RdfTerm, format: RdfFormat) -> SerializeError {
    SerializeError::Unsupported {
        format,
        term: term.to_string(),
    }
}

fn rio_named(term: &RdfTerm, format: RdfFormat) -> SerializeResult<model::NamedNode<'_>> {
    match term {
        RdfTerm::Iri(n) => Ok(model::NamedNode { iri: n.as_str() }),
        other => Err(unsupported(other, format)),
    }
}

fn rio_subject(term: &RdfTerm, format: RdfFormat) -> SerializeResult<model::Subject<'_>> {
    match term {
        RdfTerm::Iri(n) => Ok(model::Subject::NamedNode(model::NamedNode { iri: n.as_str() })),
        RdfTerm::BlankNode(b) => Ok(model::Subject::BlankNode(model::BlankNode { id: b.as_str() })),
        other => Err(unsupported(other, format)),
    }
}

fn rio_object(term: &RdfTerm, format: RdfFormat) -> SerializeResult<model::Term<'_>> {
    match term {
        RdfTerm::Iri(n) => Ok(model::Term::NamedNode(model::NamedNode { iri: n.as_str() })),
        RdfTerm::BlankNode(b) => Ok(model::Term::BlankNode(model::BlankNode { id: b.as_str() })),
        RdfTerm::Literal(l) => {
            let literal = match l.language() {
                Some(language) => model::Literal::LanguageTaggedString {
                    value: l.value(),
                    language,
                },
                None if l.datatype_iri() == xsd::STRING.as_str() => {
                    model::Literal::Simple { value: l.value() }
                }
                None => model::Literal::Typed {
                    value: l.value(),
                    datatype: model::NamedNode {
                        iri: l.datatype_iri(),
                    },
                },
            };
            Ok(model::Term::Literal(literal))
        }
        other => Err(unsupported(other, format)),
    }
}

fn invalid(e: RdfError) -> ParseError {
    ParseError::Parse(e.to_string())
}

fn convert_triple(t: model::Triple<'_>) -> ParseResult<Triple> {
    Ok(Triple::new(
        convert_subject(t.subject)?,
        convert_named(t.predicate)?,
        convert_object(t.object)?,
    ))
}

fn convert_named(n: model::NamedNode<'_>) -> ParseResult<RdfTerm> {
    NamedNode::new(n.iri).map(RdfTerm::Iri).map_err(invalid)
}

fn convert_blank(b: model::BlankNode<'_>) -> ParseResult<RdfTerm> {
    BlankNode::from_label(b.id)
        .map(RdfTerm::BlankNode)
        .map_err(invalid)
}

fn convert_subject(s: model::Subject<'_>) -> ParseResult<RdfTerm> {
    match s {
        model::Subject::NamedNode(n) => convert_named(n),
        model::Subject::BlankNode(b) => convert_blank(b),
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_object(o: model::Term<'_>) -> ParseResult<RdfTerm> {
    match o {
        model::Term::NamedNode(n) => convert_named(n),
        model::Term::BlankNode(b) => convert_blank(b),
        model::Term::Literal(model::Literal::Simple { value }) => {
            Ok(Literal::new_simple_literal(value).into())
        }
        model::Term::Literal(model::Literal::LanguageTaggedString { value, language }) => {
            Ok(Literal::new_language_tagged_literal(value, language)
                .map_err(invalid)?
                .into())
        }
        model::Term::Literal(model::Literal::Typed { value, datatype }) => {
            let dt = NamedNode::new(datatype.iri).map_err(invalid)?;
            Ok(Literal::new_typed_literal(value, dt).into())
        }
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}
