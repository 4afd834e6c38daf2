//! S-expression reader using Pest

use super::escape::{is_numeric_text, unescape};
use super::{SExpr, SExprError, SExprResult};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "sexpr/sexpr.pest"]
struct SExprParser;

/// Parse canonical text into its top-level expressions
///
/// Bare tokens that follow the JSON number grammar become [`SExpr::Number`],
/// every other bare token becomes [`SExpr::Symbol`].
pub fn parse_str(input: &str) -> SExprResult<Vec<SExpr>> {
    let mut pairs = SExprParser::parse(Rule::document, input)
        .map_err(|e| SExprError::Parse(e.to_string()))?;

    let Some(document) = pairs.next() else {
        return Ok(Vec::new());
    };

    document
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(build)
        .collect()
}

fn build(pair: Pair<Rule>) -> SExprResult<SExpr> {
    match pair.as_rule() {
        Rule::list => {
            let items = pair.into_inner().map(build).collect::<SExprResult<Vec<_>>>()?;
            Ok(SExpr::List(items))
        }
        Rule::string => {
            let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(SExpr::Str(unescape(raw)?))
        }
        Rule::atom => {
            let text = pair.as_str();
            if is_numeric_text(text) {
                Ok(SExpr::Number(text.to_string()))
            } else {
                Ok(SExpr::Symbol(text.to_string()))
            }
        }
        rule => Err(SExprError::Parse(format!("unexpected token {:?}", rule))),
    }
}
