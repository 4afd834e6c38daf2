//! Record flattening (nested value → path-addressed lines)

use super::{HostValue, Path, PathError, PathResult, Step, EMPTY_MAPPING, MAX_SEQUENCE_DEPTH};
use crate::config::{JsonConfig, RecordErrorPolicy};
use crate::sexpr::SExpr;
use std::iter::Enumerate;
use std::slice::Iter as SliceIter;
use tracing::{debug, info, warn};

/// One leaf together with the path that reaches it
#[derive(Debug, Clone, PartialEq)]
pub struct FlatLeaf<'a> {
    /// Index of the record the leaf belongs to
    pub record: usize,
    /// Steps from the record root to the leaf
    pub path: Path,
    /// A scalar or an empty container
    pub leaf: &'a HostValue,
}

impl FlatLeaf<'_> {
    /// Wrapped leaf without a record marker
    pub fn to_sexpr(&self) -> SExpr {
        self.path.wrap(self.leaf.to_leaf_atom())
    }
}

enum Frame<'a> {
    Mapping {
        entries: indexmap::map::Iter<'a, String, HostValue>,
        path: Path,
    },
    Sequence {
        key: &'a str,
        items: Enumerate<SliceIter<'a, HostValue>>,
        path: Path,
        indices: Vec<usize>,
    },
}

/// Lazy depth-first walk over the leaves of one record
///
/// Leaves come out in mapping insertion order, then ascending index order.
/// After a [`PathError::DepthExceeded`] the iterator is exhausted.
pub struct PathFlattener<'a> {
    record: usize,
    stack: Vec<Frame<'a>>,
    failed: bool,
}

impl<'a> PathFlattener<'a> {
    /// Start a walk over a record, which must be a mapping
    pub fn new(record: usize, value: &'a HostValue) -> PathResult<Self> {
        match value {
            HostValue::Mapping(entries) => Ok(Self {
                record,
                stack: vec![Frame::Mapping {
                    entries: entries.iter(),
                    path: Path::default(),
                }],
                failed: false,
            }),
            _ => Err(PathError::NotARecord { record }),
        }
    }
}

fn step_for(key: &str, indices: Vec<usize>) -> Step {
    if indices.is_empty() {
        Step::Key(key.to_string())
    } else {
        Step::IndexedKey(key.to_string(), indices)
    }
}

impl<'a> Iterator for PathFlattener<'a> {
    type Item = PathResult<FlatLeaf<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let (key, value, path, indices) = match self.stack.last_mut()? {
                Frame::Mapping { entries, path } => match entries.next() {
                    Some((key, value)) => (key.as_str(), value, path.clone(), Vec::new()),
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
                Frame::Sequence {
                    key,
                    items,
                    path,
                    indices,
                } => match items.next() {
                    Some((i, value)) => {
                        let mut at = indices.clone();
                        at.push(i);
                        (*key, value, path.clone(), at)
                    }
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
            };

            if let HostValue::Sequence(_) = value {
                if indices.len() >= MAX_SEQUENCE_DEPTH {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(PathError::DepthExceeded {
                        record: self.record,
                        key: key.to_string(),
                        depth: indices.len() + 1,
                    }));
                }
            }

            match value {
                HostValue::Mapping(entries) if !entries.is_empty() => {
                    self.stack.push(Frame::Mapping {
                        entries: entries.iter(),
                        path: path.child(step_for(key, indices)),
                    });
                }
                HostValue::Sequence(items) if !items.is_empty() => {
                    self.stack.push(Frame::Sequence {
                        key,
                        items: items.iter().enumerate(),
                        path,
                        indices,
                    });
                }
                leaf => {
                    return Some(Ok(FlatLeaf {
                        record: self.record,
                        path: path.child(step_for(key, indices)),
                        leaf,
                    }));
                }
            }
        }
    }
}

/// Encode a single document without a record marker
///
/// Produces lines like `(outer (foo (a 1)))`.
pub fn encode_document(value: &HostValue) -> PathResult<Vec<SExpr>> {
    PathFlattener::new(0, value)?
        .map(|leaf| leaf.map(|leaf| leaf.to_sexpr()))
        .collect()
}

/// Encode one record of a record set: `(marker i <wrapped leaf>)` per leaf
///
/// An empty record still gets a line, `(marker i {})`, so the record
/// survives a round trip.
pub fn encode_record(record: usize, value: &HostValue, marker: &str) -> PathResult<Vec<SExpr>> {
    let line = |body: SExpr| {
        SExpr::list(vec![SExpr::symbol(marker), SExpr::number(record), body])
    };
    let lines: Vec<SExpr> = PathFlattener::new(record, value)?
        .map(|leaf| leaf.map(|leaf| line(leaf.to_sexpr())))
        .collect::<PathResult<_>>()?;
    if lines.is_empty() {
        return Ok(vec![line(SExpr::symbol(EMPTY_MAPPING))]);
    }
    Ok(lines)
}

/// Encode a record set, stopping at the first failing record
pub fn encode_records(records: &[HostValue], marker: &str) -> PathResult<Vec<SExpr>> {
    let mut lines = Vec::new();
    for (i, record) in records.iter().enumerate() {
        lines.extend(encode_record(i, record, marker)?);
    }
    info!("Encoded {} records into {} lines", records.len(), lines.len());
    Ok(lines)
}

/// Encode a record set, applying the configured error policy per record
///
/// With [`RecordErrorPolicy::Skip`] a failing record contributes no lines and
/// is logged; the remaining records are still encoded.
pub fn encode_records_with_policy(
    records: &[HostValue],
    config: &JsonConfig,
) -> PathResult<Vec<SExpr>> {
    if config.on_record_error == RecordErrorPolicy::Abort {
        return encode_records(records, &config.record_marker);
    }

    let mut lines = Vec::new();
    let mut skipped = 0;
    for (i, record) in records.iter().enumerate() {
        match encode_record(i, record, &config.record_marker) {
            Ok(record_lines) => {
                debug!("Record {} produced {} lines", i, record_lines.len());
                lines.extend(record_lines);
            }
            Err(e) => {
                warn!("Skipping record {}: {}", i, e);
                skipped += 1;
            }
        }
    }
    info!(
        "Encoded {} of {} records into {} lines ({} skipped)",
        records.len() - skipped,
        records.len(),
        lines.len(),
        skipped
    );
    Ok(lines)
}
