//! Paths locating one scalar leaf inside a nested value

use super::{malformed, PathResult};
use crate::sexpr::SExpr;
use std::fmt;

/// Deepest run of plain sequences allowed directly under one key
pub const MAX_SEQUENCE_DEPTH: usize = 4;

/// One container traversal step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Descend into a mapping entry
    Key(String),
    /// Descend into a mapping entry, then through nested sequences at these indices
    IndexedKey(String, Vec<usize>),
}

impl Step {
    /// Get the mapping key of this step
    pub fn key(&self) -> &str {
        match self {
            Step::Key(k) | Step::IndexedKey(k, _) => k,
        }
    }

    /// Get the sequence indices (empty for a plain key)
    pub fn indices(&self) -> &[usize] {
        match self {
            Step::Key(_) => &[],
            Step::IndexedKey(_, indices) => indices,
        }
    }

    /// Wrap an inner expression: `(k inner)` or `(k i0 i1 … inner)`
    fn wrap(&self, inner: SExpr) -> SExpr {
        let mut items = Vec::with_capacity(self.indices().len() + 2);
        items.push(SExpr::symbol(self.key()));
        items.extend(self.indices().iter().map(SExpr::number));
        items.push(inner);
        SExpr::List(items)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        for i in self.indices() {
            write!(f, "[{}]", i)?;
        }
        Ok(())
    }
}

/// Ordered traversal steps from a record root to a leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<Step>);

impl Path {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend by one step
    pub fn child(&self, step: Step) -> Path {
        let mut steps = self.0.clone();
        steps.push(step);
        Path(steps)
    }

    /// Wrap a leaf atom in this path, innermost step first
    pub fn wrap(&self, leaf: SExpr) -> SExpr {
        self.0.iter().rev().fold(leaf, |inner, step| step.wrap(inner))
    }

    /// Recover the path and leaf from a wrapped expression
    ///
    /// Walks from the outside in. Every list must open with a key, may carry
    /// sequence indices, and ends with the next wrapper or the leaf.
    pub fn from_wrapped(expr: &SExpr, record: Option<usize>) -> PathResult<(Path, &SExpr)> {
        let mut steps = Vec::new();
        let mut current = expr;

        while let SExpr::List(items) = current {
            let (head, rest) = items
                .split_first()
                .ok_or_else(|| malformed(record, "empty list where a key was expected"))?;
            let key = head
                .as_name()
                .ok_or_else(|| malformed(record, format!("expected a key, found {}", head)))?;
            let (inner, index_atoms) = rest
                .split_last()
                .ok_or_else(|| malformed(record, format!("key `{}` has no value", key)))?;

            if index_atoms.len() > MAX_SEQUENCE_DEPTH {
                return Err(malformed(
                    record,
                    format!("key `{}` carries {} indices", key, index_atoms.len()),
                ));
            }
            let indices = index_atoms
                .iter()
                .map(|atom| {
                    atom.as_index().ok_or_else(|| {
                        malformed(record, format!("`{}` is not a sequence index under `{}`", atom, key))
                    })
                })
                .collect::<PathResult<Vec<_>>>()?;

            steps.push(if indices.is_empty() {
                Step::Key(key.to_string())
            } else {
                Step::IndexedKey(key.to_string(), indices)
            });
            current = inner;
        }

        if steps.is_empty() {
            return Err(malformed(record, format!("leaf {} has no key", current)));
        }
        Ok((Path(steps), current))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
