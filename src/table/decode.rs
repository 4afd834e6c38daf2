//! Table decoders

use super::{check_rectangular, TableError, TableMatrix, TableResult};
use crate::sexpr::SExpr;
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;

const HEADER: &str = "header";
const EQUALS: &str = "=";
const VALUE: &str = "value";

fn malformed(line: usize, reason: impl Into<String>) -> TableError {
    TableError::MalformedRow {
        line,
        reason: reason.into(),
    }
}

/// Lines paired with their 1-based number
fn numbered(exprs: &[SExpr]) -> impl Iterator<Item = (usize, &SExpr)> {
    exprs.iter().enumerate().map(|(i, e)| (i + 1, e))
}

fn items(expr: &SExpr, count: usize, line: usize) -> TableResult<&[SExpr]> {
    match expr.as_list() {
        Some(items) if items.len() == count => Ok(items),
        _ => Err(malformed(line, format!("expected a list of {count} items"))),
    }
}

fn cell(expr: &SExpr, line: usize) -> TableResult<String> {
    expr.as_name()
        .map(str::to_string)
        .ok_or_else(|| malformed(line, "cell is not an atom"))
}

fn cells(expr: &SExpr, line: usize) -> TableResult<Vec<String>> {
    expr.as_list()
        .ok_or_else(|| malformed(line, "expected a list of cells"))?
        .iter()
        .map(|c| cell(c, line))
        .collect()
}

fn index(expr: &SExpr, line: usize) -> TableResult<usize> {
    expr.as_index()
        .ok_or_else(|| malformed(line, format!("expected an index, found {expr}")))
}

/// Indexed entries collected out of order, checked for gaps on the way out
struct Indexed<T> {
    entries: BTreeMap<usize, (usize, T)>,
}

impl<T> Indexed<T> {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    fn insert(&mut self, index: usize, line: usize, value: T) -> TableResult<()> {
        if self.entries.insert(index, (line, value)).is_some() {
            return Err(malformed(line, format!("index {index} appears more than once")));
        }
        Ok(())
    }

    fn get_or_insert_with(&mut self, index: usize, line: usize, f: impl FnOnce() -> T) -> &mut T {
        &mut self.entries.entry(index).or_insert_with(|| (line, f())).1
    }

    /// Values in index order; indices must run 0, 1, 2, …
    fn into_vec(self) -> TableResult<Vec<T>> {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(expected, (index, (line, value)))| {
                if index == expected {
                    Ok(value)
                } else {
                    Err(malformed(
                        line,
                        format!("index {index} found where {expected} was expected"),
                    ))
                }
            })
            .collect()
    }
}

fn rectangular(matrix: TableMatrix) -> TableResult<TableMatrix> {
    check_rectangular(&matrix)?;
    Ok(matrix)
}

fn transpose(columns: Vec<Vec<String>>) -> TableResult<TableMatrix> {
    let height = columns.first().map_or(0, Vec::len);
    for (j, column) in columns.iter().enumerate() {
        if column.len() != height {
            return Err(TableError::RaggedMatrix {
                row: j,
                expected: height,
                found: column.len(),
            });
        }
    }
    Ok((0..height)
        .map(|i| columns.iter().map(|column| column[i].clone()).collect())
        .collect())
}

/// Cells addressed by header name and data-row index
struct Labeled {
    header: IndexSet<String>,
    rows: Indexed<IndexMap<String, String>>,
}

impl Labeled {
    fn new() -> Self {
        Self {
            header: IndexSet::new(),
            rows: Indexed::new(),
        }
    }

    fn insert(&mut self, row: usize, name: String, value: String, line: usize) -> TableResult<()> {
        self.header.insert(name.clone());
        let cells = self.rows.get_or_insert_with(row, line, IndexMap::new);
        if cells.contains_key(&name) {
            return Err(malformed(
                line,
                format!("cell ({row}, {name:?}) appears more than once"),
            ));
        }
        cells.insert(name, value);
        Ok(())
    }

    fn finish(self) -> TableResult<TableMatrix> {
        if self.header.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let header = self.header;
        let mut matrix = vec![header.iter().cloned().collect::<Vec<_>>()];
        for (i, mut cells) in self.rows.into_vec()?.into_iter().enumerate() {
            let found = cells.len();
            let row = header
                .iter()
                .map(|name| cells.swap_remove(name))
                .collect::<Option<Vec<_>>>()
                .ok_or(TableError::RaggedMatrix {
                    row: i + 1,
                    expected: header.len(),
                    found,
                })?;
            matrix.push(row);
        }
        Ok(matrix)
    }
}

/// Split `(= (value address) "v")`
fn equality(expr: &SExpr, line: usize) -> TableResult<(&[SExpr], String)> {
    let parts = items(expr, 3, line)?;
    if !expr.has_head(EQUALS) {
        return Err(malformed(line, "expected an (= (value …) …) atom"));
    }
    let call = items(&parts[1], 2, line)?;
    if !parts[1].has_head(VALUE) {
        return Err(malformed(line, "expected a (value …) call"));
    }
    Ok((items(&call[1], 2, line)?, cell(&parts[2], line)?))
}

/// Read [`encode_row`](super::encode_row) lines
pub fn decode_row(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut rows = Indexed::new();
    for (line, expr) in numbered(exprs) {
        let parts = items(expr, 2, line)?;
        rows.insert(index(&parts[0], line)?, line, cells(&parts[1], line)?)?;
    }
    rectangular(rows.into_vec()?)
}

/// Read [`encode_header_row`](super::encode_header_row) lines
pub fn decode_header_row(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut header = None;
    let mut rows = Indexed::new();
    for (line, expr) in numbered(exprs) {
        let parts = items(expr, 2, line)?;
        let row = cells(&parts[1], line)?;
        if parts[0].as_symbol() == Some(HEADER) {
            if header.replace(row).is_some() {
                return Err(malformed(line, "header appears more than once"));
            }
        } else {
            rows.insert(index(&parts[0], line)?, line, row)?;
        }
    }
    let header = header.ok_or(TableError::MissingHeader)?;
    let mut matrix = vec![header];
    matrix.extend(rows.into_vec()?);
    rectangular(matrix)
}

/// Read [`encode_column`](super::encode_column) lines
pub fn decode_column(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut columns = Indexed::new();
    for (line, expr) in numbered(exprs) {
        let parts = items(expr, 2, line)?;
        columns.insert(index(&parts[0], line)?, line, cells(&parts[1], line)?)?;
    }
    transpose(columns.into_vec()?)
}

/// Read [`encode_column_header`](super::encode_column_header) lines
///
/// Columns are taken in line order.
pub fn decode_column_header(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    if exprs.is_empty() {
        return Err(TableError::MissingHeader);
    }
    let mut names = IndexSet::new();
    let mut columns = Vec::with_capacity(exprs.len());
    for (line, expr) in numbered(exprs) {
        let parts = items(expr, 2, line)?;
        let name = cell(&parts[0], line)?;
        let mut column = cells(&parts[1], line)?;
        if !names.insert(name.clone()) {
            return Err(malformed(line, format!("column {name:?} appears more than once")));
        }
        column.insert(0, name);
        columns.push(column);
    }
    transpose(columns)
}

/// Read [`encode_struct`](super::encode_struct) lines
///
/// Rows come back in line order; the header is taken from the first line.
pub fn decode_struct(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut header: Option<Vec<String>> = None;
    let mut matrix = Vec::with_capacity(exprs.len() + 1);
    for (line, expr) in numbered(exprs) {
        let pairs = expr
            .as_list()
            .ok_or_else(|| malformed(line, "expected a list of (column value) pairs"))?;
        let mut names = Vec::with_capacity(pairs.len());
        let mut row = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let pair = items(pair, 2, line)?;
            names.push(cell(&pair[0], line)?);
            row.push(cell(&pair[1], line)?);
        }
        if header.is_none() {
            matrix.push(names.clone());
            header = Some(names);
        } else if header.as_ref() != Some(&names) {
            return Err(malformed(line, "columns differ from the first row"));
        }
        matrix.push(row);
    }
    if header.is_none() {
        return Err(TableError::MissingHeader);
    }
    Ok(matrix)
}

/// Read [`encode_field`](super::encode_field) lines
pub fn decode_field(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut labeled = Labeled::new();
    for (line, expr) in numbered(exprs) {
        let parts = items(expr, 3, line)?;
        labeled.insert(
            index(&parts[0], line)?,
            cell(&parts[1], line)?,
            cell(&parts[2], line)?,
            line,
        )?;
    }
    labeled.finish()
}

/// Read [`encode_function`](super::encode_function) lines
pub fn decode_function(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut labeled = Labeled::new();
    for (line, expr) in numbered(exprs) {
        let (address, value) = equality(expr, line)?;
        labeled.insert(
            index(&address[1], line)?,
            cell(&address[0], line)?,
            value,
            line,
        )?;
    }
    labeled.finish()
}

/// Read [`encode_cell`](super::encode_cell) lines
pub fn decode_cell(exprs: &[SExpr]) -> TableResult<TableMatrix> {
    let mut rows: Indexed<Indexed<String>> = Indexed::new();
    for (line, expr) in numbered(exprs) {
        let (address, value) = equality(expr, line)?;
        let (r, c) = (index(&address[0], line)?, index(&address[1], line)?);
        rows.get_or_insert_with(r, line, Indexed::new)
            .insert(c, line, value)?;
    }
    let matrix = rows
        .into_vec()?
        .into_iter()
        .map(Indexed::into_vec)
        .collect::<TableResult<TableMatrix>>()?;
    rectangular(matrix)
}
