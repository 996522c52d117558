//! Combining per-assembly coverage into one table.
//!
//! Each assembly contributes one column. Tables are combined with an
//! outer join on the row key, so the rows of the result are the union
//! of every assembly's keys, and an assembly that never mentions a key
//! gets the default value (zero) in that row. Columns are kept in the
//! order assemblies were joined.

use std::hash::Hash;

use bstr::BString;
use fnv::FnvHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::gaf::{AlignmentRecords, EdgeUsage, NodeCoverage};
use crate::gfa::NodeRecord;

/// A key that occurred twice in the same column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey<K> {
    pub key: K,
    pub assembly: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow<K, M, V> {
    pub key: K,
    /// Row metadata, taken from the first assembly that has the key
    pub meta: M,
    pub values: Vec<V>,
}

/// An accumulator for outer joins of per-assembly columns.
#[derive(Debug, Clone)]
pub struct OuterJoin<K, M, V> {
    assemblies: Vec<String>,
    rows: Vec<JoinedRow<K, M, V>>,
    index: FnvHashMap<K, usize>,
}

impl<K, M, V> Default for OuterJoin<K, M, V> {
    fn default() -> Self {
        OuterJoin {
            assemblies: Vec::new(),
            rows: Vec::new(),
            index: FnvHashMap::default(),
        }
    }
}

impl<K, M, V> OuterJoin<K, M, V>
where
    K: Hash + Eq + Clone,
    V: Clone + Default,
{
    pub fn new() -> Self {
        Default::default()
    }

    /// An empty table with the given columns, to be filled row by
    /// row with `push_row`.
    pub fn with_assemblies(assemblies: Vec<String>) -> Self {
        OuterJoin {
            assemblies,
            ..Default::default()
        }
    }

    pub fn assemblies(&self) -> &[String] {
        &self.assemblies
    }

    pub fn rows(&self) -> &[JoinedRow<K, M, V>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&JoinedRow<K, M, V>> {
        self.index.get(key).map(|&ix| &self.rows[ix])
    }

    /// Add a column for `assembly` and outer join its values on the
    /// row keys. Existing rows without a value in the new column, and
    /// new rows in every earlier column, are filled with the default
    /// value. A key that occurs twice in the column is an error.
    pub fn join<I>(
        self,
        assembly: &str,
        column: I,
    ) -> std::result::Result<Self, DuplicateKey<K>>
    where
        I: IntoIterator<Item = (K, M, V)>,
    {
        let mut duplicate = None;
        let joined = self.join_with(assembly, column, |key, _, _| {
            if duplicate.is_none() {
                duplicate = Some(key.clone());
            }
        });
        match duplicate {
            Some(key) => Err(DuplicateKey {
                key,
                assembly: assembly.to_string(),
            }),
            None => Ok(joined),
        }
    }

    /// Like `join`, but a key that occurs again in the same column is
    /// folded into the value already there with `merge`.
    pub fn join_with<I, F>(mut self, assembly: &str, column: I, mut merge: F) -> Self
    where
        I: IntoIterator<Item = (K, M, V)>,
        F: FnMut(&K, &mut V, V),
    {
        let col = self.assemblies.len();
        self.assemblies.push(assembly.to_string());
        for row in self.rows.iter_mut() {
            row.values.push(V::default());
        }

        // rows at or past `filled.len()` were created by this column
        let mut filled = vec![false; self.rows.len()];

        for (key, meta, value) in column {
            match self.index.get(&key) {
                Some(&ix) if ix < filled.len() && !filled[ix] => {
                    filled[ix] = true;
                    self.rows[ix].values[col] = value;
                }
                Some(&ix) => merge(&key, &mut self.rows[ix].values[col], value),
                None => {
                    let mut values = vec![V::default(); col + 1];
                    values[col] = value;
                    self.index.insert(key.clone(), self.rows.len());
                    self.rows.push(JoinedRow { key, meta, values });
                }
            }
        }

        self
    }

    /// Append a complete row, as when reading a joined table back
    /// from disk.
    pub fn push_row(
        &mut self,
        key: K,
        meta: M,
        values: Vec<V>,
    ) -> std::result::Result<(), DuplicateKey<K>> {
        if self.index.contains_key(&key) {
            return Err(DuplicateKey {
                key,
                assembly: String::new(),
            });
        }
        self.index.insert(key.clone(), self.rows.len());
        self.rows.push(JoinedRow { key, meta, values });
        Ok(())
    }
}

/// Node coverage of every assembly, with the segment fields of the
/// first assembly that reported each node.
pub type CoverageTable = OuterJoin<BString, NodeRecord, f64>;

/// Usage flags (0 or 1) of every edge, keyed by (parent, child).
pub type EdgeUsageTable = OuterJoin<(BString, BString), (), u8>;

fn node_column(
    nodes: Vec<NodeCoverage>,
) -> impl Iterator<Item = (BString, NodeRecord, f64)> {
    nodes.into_iter().map(|n| (n.node.id.clone(), n.node, n.coverage))
}

fn edge_column(
    edges: Vec<EdgeUsage>,
) -> impl Iterator<Item = ((BString, BString), (), u8)> {
    edges
        .into_iter()
        .map(|e| ((e.parent, e.child), (), u8::from(e.used)))
}

/// Fold per-assembly node coverage into a single table, in order.
pub fn combine_node_coverage<I>(per_assembly: I) -> Result<CoverageTable>
where
    I: IntoIterator<Item = (String, Vec<NodeCoverage>)>,
{
    per_assembly
        .into_iter()
        .try_fold(CoverageTable::new(), |acc, (asm, nodes)| {
            acc.join(&asm, node_column(nodes)).map_err(|dup| {
                Error::DuplicateNode {
                    node: dup.key.to_string(),
                    origin: format!("the alignment of {}", dup.assembly),
                }
            })
        })
}

/// Fold per-assembly edge usage into a single table, in order.
///
/// Distinct links of one assembly can share a (parent, child) key,
/// e.g. `a+ b+` and `b+ a-`; such an edge is used if any of them is.
pub fn combine_edge_usage<I>(per_assembly: I) -> EdgeUsageTable
where
    I: IntoIterator<Item = (String, Vec<EdgeUsage>)>,
{
    per_assembly
        .into_iter()
        .fold(EdgeUsageTable::new(), |acc, (asm, edges)| {
            acc.join_with(&asm, edge_column(edges), |_, used, again| *used |= again)
        })
}

/// Split parsed alignment files into their combined node and edge
/// tables.
pub fn combine(
    records: Vec<(String, AlignmentRecords)>,
) -> Result<(CoverageTable, EdgeUsageTable)> {
    let mut nodes = Vec::with_capacity(records.len());
    let mut edges = Vec::with_capacity(records.len());
    for (asm, recs) in records {
        nodes.push((asm.clone(), recs.nodes));
        edges.push((asm, recs.edges));
    }

    let coverage = combine_node_coverage(nodes)?;
    let usage = combine_edge_usage(edges);
    debug!(
        "Combined coverage of {} nodes and {} edges",
        coverage.len(),
        usage.len()
    );
    Ok((coverage, usage))
}
