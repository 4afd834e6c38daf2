//! Tabular data ⇄ s-expressions
//!
//! A [`TableMatrix`] is a list of rows of string cells. Whether row 0 is a
//! header is decided by the caller through the chosen [`TableEncoding`]:
//!
//! ```text
//! Index,Name          Row          (0 ("Index" "Name"))  (1 ("1" "Alice"))
//! 1,Alice             HeaderRow    (header ("Index" "Name"))  (0 ("1" "Alice"))
//!                     Column       (0 ("Index" "1"))  (1 ("Name" "Alice"))
//!                     ColumnHeader ("Index" ("1"))  ("Name" ("Alice"))
//!                     Struct       (("Index" "1") ("Name" "Alice"))
//!                     Field        (0 "Index" "1")  (0 "Name" "Alice")
//!                     Function     (= (value ("Index" 0)) "1")
//!                     Cell         (= (value (0 0)) "Index")
//! ```

mod decode;
mod encode;

pub use decode::{
    decode_cell, decode_column, decode_column_header, decode_field, decode_function,
    decode_header_row, decode_row, decode_struct,
};
pub use encode::{
    encode_cell, encode_column, encode_column_header, encode_field, encode_function,
    encode_header_row, encode_row, encode_struct,
};

use crate::sexpr::SExpr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Rows of string cells
pub type TableMatrix = Vec<Vec<String>>;

/// Table errors
#[derive(Error, Debug)]
pub enum TableError {
    /// Rows differ in length
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Encoding needs a header row but the table has none
    #[error("Table has no header row")]
    MissingHeader,

    /// Line does not have the shape the encoding prescribes
    #[error("Malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

pub type TableResult<T> = Result<T, TableError>;

/// Tabular line layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableEncoding {
    /// `(i (cells))` for every row, header included
    Row,
    /// `(header (cells))` then `(i (cells))` for data rows
    #[default]
    HeaderRow,
    /// `(j (cells))` for every column
    Column,
    /// `("h" (cells))` for every column
    ColumnHeader,
    /// `(("h" "v") …)` per data row, without row index
    Struct,
    /// `(i "h" "v")` per data cell
    Field,
    /// `(= (value ("h" i)) "v")` per data cell
    Function,
    /// `(= (value (r c)) "v")` per cell, header included
    Cell,
}

impl TableEncoding {
    pub const ALL: [TableEncoding; 8] = [
        TableEncoding::Row,
        TableEncoding::HeaderRow,
        TableEncoding::Column,
        TableEncoding::ColumnHeader,
        TableEncoding::Struct,
        TableEncoding::Field,
        TableEncoding::Function,
        TableEncoding::Cell,
    ];

    /// Check if row 0 is treated as a header
    pub fn uses_header(&self) -> bool {
        !matches!(
            self,
            TableEncoding::Row | TableEncoding::Column | TableEncoding::Cell
        )
    }
}

/// Reject ragged input, returning the common row width
pub fn check_rectangular(matrix: &[Vec<String>]) -> TableResult<usize> {
    let expected = matrix.first().map_or(0, Vec::len);
    for (row, cells) in matrix.iter().enumerate() {
        if cells.len() != expected {
            return Err(TableError::RaggedMatrix {
                row,
                expected,
                found: cells.len(),
            });
        }
    }
    Ok(expected)
}

/// Encode a table with the chosen layout
pub fn encode(matrix: &[Vec<String>], encoding: TableEncoding) -> TableResult<Vec<SExpr>> {
    let lines = match encoding {
        TableEncoding::Row => encode_row(matrix)?,
        TableEncoding::HeaderRow => encode_header_row(matrix)?,
        TableEncoding::Column => encode_column(matrix)?,
        TableEncoding::ColumnHeader => encode_column_header(matrix)?,
        TableEncoding::Struct => encode_struct(matrix)?,
        TableEncoding::Field => encode_field(matrix)?,
        TableEncoding::Function => encode_function(matrix)?,
        TableEncoding::Cell => encode_cell(matrix)?,
    };
    info!(
        "Encoded {} rows into {} lines ({:?})",
        matrix.len(),
        lines.len(),
        encoding
    );
    Ok(lines)
}

/// Decode lines written with the chosen layout
pub fn decode(exprs: &[SExpr], encoding: TableEncoding) -> TableResult<TableMatrix> {
    let matrix = match encoding {
        TableEncoding::Row => decode_row(exprs)?,
        TableEncoding::HeaderRow => decode_header_row(exprs)?,
        TableEncoding::Column => decode_column(exprs)?,
        TableEncoding::ColumnHeader => decode_column_header(exprs)?,
        TableEncoding::Struct => decode_struct(exprs)?,
        TableEncoding::Field => decode_field(exprs)?,
        TableEncoding::Function => decode_function(exprs)?,
        TableEncoding::Cell => decode_cell(exprs)?,
    };
    info!(
        "Decoded {} lines into {} rows ({:?})",
        exprs.len(),
        matrix.len(),
        encoding
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn matrix(rows: &[&[&str]]) -> TableMatrix {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_ragged_rejected_before_output() {
        let ragged = matrix(&[&["Index", "Name"], &["1"]]);
        for encoding in TableEncoding::ALL {
            let err = encode(&ragged, encoding).unwrap_err();
            assert!(
                matches!(err, TableError::RaggedMatrix { row: 1, expected: 2, found: 1 }),
                "{encoding:?}"
            );
        }
    }

    #[test]
    fn test_every_encoding_round_trips() {
        let m = matrix(&[
            &["Index", "Name", "Phone", "Website"],
            &["1", "Alice Johnson", "384.555.0192x123", "http://www.alicejservices.com/"],
            &["2", "Michael Smith", "(512)987-6543x56789", "http://www.msmithtech.net/"],
            &["3", "Emily Davis", "+1-310-555-6789", "http://www.emilydavisconsulting.org/"],
        ]);
        for encoding in TableEncoding::ALL {
            let lines = encode(&m, encoding).unwrap();
            assert_eq!(decode(&lines, encoding).unwrap(), m, "{encoding:?}");
        }
    }

    #[test]
    fn test_header_encodings_need_a_header() {
        for encoding in TableEncoding::ALL.into_iter().filter(TableEncoding::uses_header) {
            assert!(
                matches!(encode(&[], encoding), Err(TableError::MissingHeader)),
                "{encoding:?}"
            );
        }
        for encoding in [TableEncoding::Row, TableEncoding::Column, TableEncoding::Cell] {
            assert!(encode(&[], encoding).unwrap().is_empty());
        }
    }

    #[test]
    fn test_encoding_names() {
        let text = serde_yaml::to_string(&TableEncoding::ColumnHeader).unwrap();
        assert_eq!(text.trim(), "column_header");
    }
}
