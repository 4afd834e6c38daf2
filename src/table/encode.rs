//! Table encoders
//!
//! Every encoder checks the matrix shape before it builds a single line.

use super::{check_rectangular, TableError, TableResult};
use crate::sexpr::SExpr;

const HEADER: &str = "header";
const EQUALS: &str = "=";
const VALUE: &str = "value";

fn quoted_cells<'a>(cells: impl IntoIterator<Item = &'a String>) -> SExpr {
    SExpr::list(cells.into_iter().map(|c| SExpr::string(c.as_str())).collect())
}

fn split_header(matrix: &[Vec<String>]) -> TableResult<(&[String], &[Vec<String>])> {
    check_rectangular(matrix)?;
    let (header, rows) = matrix.split_first().ok_or(TableError::MissingHeader)?;
    Ok((header, rows))
}

/// `(= (value address) "v")`
fn equality(address: SExpr, value: &str) -> SExpr {
    SExpr::list(vec![
        SExpr::symbol(EQUALS),
        SExpr::list(vec![SExpr::symbol(VALUE), address]),
        SExpr::string(value),
    ])
}

/// `(i ("c0" "c1" …))` for every row, row 0 included
pub fn encode_row(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    check_rectangular(matrix)?;
    Ok(matrix
        .iter()
        .enumerate()
        .map(|(i, row)| SExpr::list(vec![SExpr::number(i), quoted_cells(row)]))
        .collect())
}

/// `(header (…))` followed by data rows indexed from 0
pub fn encode_header_row(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    let (header, rows) = split_header(matrix)?;
    let mut lines = Vec::with_capacity(matrix.len());
    lines.push(SExpr::list(vec![SExpr::symbol(HEADER), quoted_cells(header)]));
    lines.extend(
        rows.iter()
            .enumerate()
            .map(|(i, row)| SExpr::list(vec![SExpr::number(i), quoted_cells(row)])),
    );
    Ok(lines)
}

/// `(j ("c0j" "c1j" …))` for every column, the transpose of [`encode_row`]
pub fn encode_column(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    let width = check_rectangular(matrix)?;
    Ok((0..width)
        .map(|j| {
            SExpr::list(vec![
                SExpr::number(j),
                quoted_cells(matrix.iter().map(|row| &row[j])),
            ])
        })
        .collect())
}

/// `("h" ("v1" "v2" …))` for every column
pub fn encode_column_header(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    let (header, rows) = split_header(matrix)?;
    Ok(header
        .iter()
        .enumerate()
        .map(|(j, name)| {
            SExpr::list(vec![
                SExpr::string(name.as_str()),
                quoted_cells(rows.iter().map(|row| &row[j])),
            ])
        })
        .collect())
}

/// `(("h0" "v0") ("h1" "v1") …)` per data row
///
/// No row index is written; readers must not rely on line order.
pub fn encode_struct(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    let (header, rows) = split_header(matrix)?;
    Ok(rows
        .iter()
        .map(|row| {
            SExpr::list(
                header
                    .iter()
                    .zip(row)
                    .map(|(name, value)| quoted_cells([name, value]))
                    .collect(),
            )
        })
        .collect())
}

/// `(i "h" "v")` per data cell
pub fn encode_field(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    let (header, rows) = split_header(matrix)?;
    let mut lines = Vec::with_capacity(rows.len() * header.len());
    for (i, row) in rows.iter().enumerate() {
        for (name, value) in header.iter().zip(row) {
            lines.push(SExpr::list(vec![
                SExpr::number(i),
                SExpr::string(name.as_str()),
                SExpr::string(value.as_str()),
            ]));
        }
    }
    Ok(lines)
}

/// `(= (value ("h" i)) "v")` per data cell
pub fn encode_function(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    let (header, rows) = split_header(matrix)?;
    let mut lines = Vec::with_capacity(rows.len() * header.len());
    for (i, row) in rows.iter().enumerate() {
        for (name, value) in header.iter().zip(row) {
            let address = SExpr::list(vec![SExpr::string(name.as_str()), SExpr::number(i)]);
            lines.push(equality(address, value));
        }
    }
    Ok(lines)
}

/// `(= (value (r c)) "v")` per cell, the header being row 0
pub fn encode_cell(matrix: &[Vec<String>]) -> TableResult<Vec<SExpr>> {
    check_rectangular(matrix)?;
    let mut lines = Vec::new();
    for (r, row) in matrix.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let address = SExpr::list(vec![SExpr::number(r), SExpr::number(c)]);
            lines.push(equality(address, value));
        }
    }
    Ok(lines)
}
