//! Core, dispensable and private genome.
//!
//! A node present in every assembly is core, one present in exactly
//! one assembly is private, and anything in between is dispensable.
//! Nodes no assembly is present on belong to none of the three.

use bstr::{BStr, ByteSlice};
use fnv::FnvHashMap;
use tracing::{debug, info};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gfa::NodeRecord;
use crate::matrix::PresenceMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Category {
    Core,
    Dispensable,
    Private,
}

impl Category {
    /// Category of a node present in `count` of `total` assemblies.
    ///
    /// When there's a single assembly, a node present in it counts as
    /// core rather than private, so that the categories never overlap.
    pub fn classify(count: usize, total: usize) -> Option<Self> {
        if count == 0 || count > total {
            None
        } else if count == total {
            Some(Category::Core)
        } else if count == 1 {
            Some(Category::Private)
        } else {
            Some(Category::Dispensable)
        }
    }
}

/// Summed segment lengths and node counts of each category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct CategorySummary {
    pub core_length: u64,
    pub dispensable_length: u64,
    pub private_length: u64,
    pub core_nodes: usize,
    pub dispensable_nodes: usize,
    pub private_nodes: usize,
}

impl CategorySummary {
    pub fn add(&mut self, category: Category, length: usize) {
        let length = length as u64;
        match category {
            Category::Core => {
                self.core_length += length;
                self.core_nodes += 1;
            }
            Category::Dispensable => {
                self.dispensable_length += length;
                self.dispensable_nodes += 1;
            }
            Category::Private => {
                self.private_length += length;
                self.private_nodes += 1;
            }
        }
    }

    /// Categorize every node of the presence matrix, looking up
    /// segment lengths in the graph's node table.
    ///
    /// Every node of the matrix must have exactly one entry in
    /// `nodes`; a missing length is an error rather than a zero, as
    /// that would understate its category.
    pub fn from_matrix(matrix: &PresenceMatrix, nodes: &[NodeRecord]) -> Result<Self> {
        let mut lengths: FnvHashMap<&BStr, usize> = FnvHashMap::default();
        for node in nodes {
            if lengths.insert(node.id.as_bstr(), node.length).is_some() {
                return Err(Error::DuplicateNode {
                    node: node.id.to_string(),
                    origin: "the node length table".to_string(),
                });
            }
        }

        let total = matrix.total();
        let mut summary = CategorySummary::default();
        let mut unobserved = 0;

        for row in matrix.rows() {
            let length = *lengths
                .get(row.node_id.as_bstr())
                .ok_or_else(|| Error::DanglingNode(row.node_id.to_string()))?;

            match Category::classify(row.count(), total) {
                Some(category) => summary.add(category, length),
                None => unobserved += 1,
            }
        }

        debug!("{} nodes are not present in any assembly", unobserved);
        info!(
            "{} core, {} dispensable, {} private nodes over {} assemblies",
            summary.core_nodes, summary.dispensable_nodes, summary.private_nodes, total
        );
        Ok(summary)
    }

    pub fn total_length(&self) -> u64 {
        self.core_length + self.dispensable_length + self.private_length
    }

    pub fn total_nodes(&self) -> usize {
        self.core_nodes + self.dispensable_nodes + self.private_nodes
    }

    #[cfg(feature = "serde1")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
