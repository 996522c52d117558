//! Binary presence/absence of every assembly on every node.

use bstr::{BStr, BString, ByteSlice};
use fnv::FnvHashMap;
use tracing::debug;

use crate::coverage::CoverageTable;
use crate::error::{Error, Result};
use crate::gfa::NodeRecord;

/// Any positive coverage is presence; zero and the negative values
/// minigraph uses for missing data are absence.
#[inline]
pub fn binarize(coverage: f64) -> bool {
    coverage > 0.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRow {
    pub node_id: BString,
    pub present: Vec<bool>,
}

impl PresenceRow {
    /// Number of assemblies present on the node.
    pub fn count(&self) -> usize {
        self.present.iter().filter(|&&p| p).count()
    }
}

/// One row per node, one column per assembly, in the order the
/// assemblies were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMatrix {
    assemblies: Vec<String>,
    rows: Vec<PresenceRow>,
    index: FnvHashMap<BString, usize>,
}

impl PresenceMatrix {
    pub fn new(assemblies: Vec<String>) -> Self {
        PresenceMatrix {
            assemblies,
            rows: Vec::new(),
            index: FnvHashMap::default(),
        }
    }

    /// Binarize a combined coverage table.
    pub fn from_coverage(table: &CoverageTable) -> Self {
        let mut matrix = Self::new(table.assemblies().to_vec());
        for row in table.rows() {
            let present = row.values.iter().copied().map(binarize).collect();
            matrix.index.insert(row.key.clone(), matrix.rows.len());
            matrix.rows.push(PresenceRow {
                node_id: row.key.clone(),
                present,
            });
        }
        matrix
    }

    pub fn push_row(&mut self, node_id: BString, present: Vec<bool>) -> Result<()> {
        if present.len() != self.assemblies.len() {
            return Err(Error::ColumnMismatch {
                what: format!("Presence row of node {}", node_id),
                expected: self.assemblies.len(),
                found: present.len(),
            });
        }
        if self.index.contains_key(&node_id) {
            return Err(Error::DuplicateNode {
                node: node_id.to_string(),
                origin: "the presence matrix".to_string(),
            });
        }
        self.index.insert(node_id.clone(), self.rows.len());
        self.rows.push(PresenceRow { node_id, present });
        Ok(())
    }

    pub fn assemblies(&self) -> &[String] {
        &self.assemblies
    }

    /// The number of assemblies, i.e. the highest possible presence
    /// count.
    pub fn total(&self) -> usize {
        self.assemblies.len()
    }

    pub fn rows(&self) -> &[PresenceRow] {
        &self.rows
    }

    pub fn get(&self, node_id: &[u8]) -> Option<&PresenceRow> {
        self.index
            .get(&BString::from(node_id))
            .map(|&ix| &self.rows[ix])
    }

    /// Mark each node as present in the assembly that contributed it
    /// to the graph.
    ///
    /// The rank of a node is an index into the assembly list, so rank
    /// 0 is the first assembly. The rank comes from the graph itself,
    /// and overrides any alignment gap: a node is always present in
    /// its own assembly, even if that assembly's alignment didn't
    /// cover it, or never mentioned it at all. This can only turn
    /// absences into presences. Ranks past the last assembly, and
    /// nodes missing from the matrix, are ignored.
    ///
    /// Returns the number of entries that were changed.
    pub fn backfill_ranks<'a, I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = &'a NodeRecord>,
    {
        let total = self.total();
        let mut changed = 0;
        for node in nodes {
            if node.rank >= total {
                continue;
            }
            if let Some(&ix) = self.index.get(&node.id) {
                let cell = &mut self.rows[ix].present[node.rank];
                if !*cell {
                    *cell = true;
                    changed += 1;
                }
            }
        }
        debug!("Rank back-fill set {} absent entries to present", changed);
        changed
    }

    /// The assemblies present on each node.
    pub fn annotations(&self) -> impl Iterator<Item = PresenceAnnotation<'_>> {
        self.rows.iter().map(move |row| PresenceAnnotation {
            node_id: row.node_id.as_bstr(),
            assemblies: row
                .present
                .iter()
                .zip(self.assemblies.iter())
                .filter(|(&p, _)| p)
                .map(|(_, asm)| asm.as_str())
                .collect(),
        })
    }
}

/// The assemblies present on a node, in matrix column order. A node
/// with no assembly present has an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceAnnotation<'a> {
    pub node_id: &'a BStr,
    pub assemblies: Vec<&'a str>,
}

impl PresenceAnnotation<'_> {
    /// The comma-separated assembly list.
    pub fn label(&self) -> String {
        self.assemblies.join(",")
    }
}

/// Node annotation row: id and label, tab-separated.
impl std::fmt::Display for PresenceAnnotation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.node_id, self.label())
    }
}
