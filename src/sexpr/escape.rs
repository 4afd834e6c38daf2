//! String quoting rules
//!
//! Text leaves and literal values are wrapped in double quotes. Backslash and
//! double quote are each escaped with one preceding backslash; every other
//! character, control characters included, is written as-is.

use super::{SExprError, SExprResult};
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?$")
        .expect("numeric pattern is a valid regex")
});

/// Escape backslashes and double quotes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape and wrap in double quotes
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Invert [`escape`]: a backslash always stands for the character after it
pub fn unescape(text: &str) -> SExprResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err(SExprError::DanglingEscape(text.to_string())),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Whether a bare token reads as a number (JSON number grammar)
pub fn is_numeric_text(text: &str) -> bool {
    NUMERIC.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape(r"C:\tmp"), r"C:\\tmp");
        assert_eq!(quote("plain"), "\"plain\"");
    }

    #[test]
    fn test_control_characters_pass_through() {
        assert_eq!(escape("a\nb\tc"), "a\nb\tc");
    }

    #[test]
    fn test_unescape_takes_next_char_literally() {
        assert_eq!(unescape(r#"\"x\\"#).unwrap(), r#""x\"#);
        assert_eq!(unescape(r"\n").unwrap(), "n");
    }

    #[test]
    fn test_unescape_rejects_trailing_backslash() {
        assert!(matches!(unescape("abc\\"), Err(SExprError::DanglingEscape(_))));
    }

    #[test]
    fn test_numeric_text() {
        for s in ["0", "42", "-7", "3.25", "1e10", "-2.5E-3"] {
            assert!(is_numeric_text(s), "{s} should be numeric");
        }
        for s in ["", "01", "1.", ".5", "+1", "12a", "384.555.0192x123", "NaN"] {
            assert!(!is_numeric_text(s), "{s} should not be numeric");
        }
    }

    proptest! {
        #[test]
        fn prop_unescape_inverts_escape(s in ".*") {
            prop_assert_eq!(unescape(&escape(&s)).unwrap(), s);
        }
    }
}
