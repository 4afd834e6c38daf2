//! Canonical s-expression values
//!
//! Every translator in this crate produces and consumes [`SExpr`] trees. The
//! text form carries one top-level atom per line; strings are quoted with the
//! rules in [`escape`](self::escape) and everything else is written bare.

mod escape;
mod reader;

pub use escape::{escape, is_numeric_text, quote, unescape};
pub use reader::parse_str;

use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// S-expression errors
#[derive(Error, Debug)]
pub enum SExprError {
    /// Input is not well-formed s-expression text
    #[error("Parse error: {0}")]
    Parse(String),

    /// A string ends with an unpaired backslash
    #[error("Dangling escape at end of string: {0:?}")]
    DanglingEscape(String),
}

pub type SExprResult<T> = Result<T, SExprError>;

/// Symbolic expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SExpr {
    /// Bare symbol
    Symbol(String),
    /// Quoted, escaped string
    Str(String),
    /// Bare numeric token, kept in its lexical form
    Number(String),
    /// Parenthesized list
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn symbol(text: impl Into<String>) -> Self {
        SExpr::Symbol(text.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        SExpr::Str(text.into())
    }

    pub fn number(value: impl fmt::Display) -> Self {
        SExpr::Number(value.to_string())
    }

    pub fn list(items: Vec<SExpr>) -> Self {
        SExpr::List(items)
    }

    /// Get the text of a bare symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SExpr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get the text of any non-list atom
    ///
    /// Keys, IRIs and labels are accepted whether they were written bare,
    /// quoted, or happen to look like a number.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            SExpr::Symbol(s) | SExpr::Str(s) | SExpr::Number(s) => Some(s),
            SExpr::List(_) => None,
        }
    }

    /// Get a non-negative integer token
    pub fn as_index(&self) -> Option<usize> {
        match self {
            SExpr::Number(n) => n.parse().ok(),
            _ => None,
        }
    }

    /// Get the items of a list
    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this list starts with the given symbol
    pub fn has_head(&self, head: &str) -> bool {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(SExpr::as_symbol)
            .is_some_and(|s| s == head)
    }
}

/// Symbols that would not read back as the same single bare token
fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text.starts_with(';')
        || text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"'))
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Symbol(s) if needs_quoting(s) => write!(f, "{}", quote(s)),
            SExpr::Symbol(s) | SExpr::Number(s) => write!(f, "{}", s),
            SExpr::Str(s) => write!(f, "{}", quote(s)),
            SExpr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Write one expression per line to a sink
pub fn write_lines<'a, W, I>(sink: &mut W, exprs: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a SExpr>,
{
    for expr in exprs {
        writeln!(sink, "{}", expr)?;
    }
    Ok(())
}

/// Render expressions as newline-terminated canonical text
pub fn to_text(exprs: &[SExpr]) -> String {
    let mut out = String::new();
    for expr in exprs {
        out.push_str(&expr.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_canonical_spacing() {
        let expr = SExpr::list(vec![
            SExpr::number(0),
            SExpr::list(vec![SExpr::string("Index"), SExpr::string("Name")]),
        ]);
        assert_eq!(expr.to_string(), "(0 (\"Index\" \"Name\"))");
    }

    #[test]
    fn test_unsafe_symbols_are_quoted() {
        assert_eq!(SExpr::symbol("Customer Id").to_string(), "\"Customer Id\"");
        assert_eq!(SExpr::symbol("a(b)").to_string(), "\"a(b)\"");
        assert_eq!(SExpr::symbol("").to_string(), "\"\"");
        assert_eq!(SExpr::symbol("plain-key").to_string(), "plain-key");
    }

    #[test]
    fn test_text_reads_back() {
        let exprs = vec![
            SExpr::list(vec![SExpr::symbol("a"), SExpr::string("say \"hi\"")]),
            SExpr::list(vec![SExpr::symbol("b"), SExpr::number(2.5)]),
        ];
        let text = to_text(&exprs);
        assert_eq!(text, "(a \"say \\\"hi\\\"\")\n(b 2.5)\n");
        assert_eq!(parse_str(&text).unwrap(), exprs);
    }

    #[test]
    fn test_write_lines() {
        let exprs = vec![SExpr::list(vec![SExpr::symbol("x")])];
        let mut out = Vec::new();
        write_lines(&mut out, &exprs).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(x)\n");
    }

    #[test]
    fn test_accessors() {
        let expr = SExpr::list(vec![SExpr::symbol("Graph"), SExpr::number(3)]);
        assert!(expr.has_head("Graph"));
        assert_eq!(expr.as_list().unwrap()[1].as_index(), Some(3));
        assert_eq!(SExpr::string("k").as_name(), Some("k"));
        assert_eq!(SExpr::string("k").as_symbol(), None);
    }
}
