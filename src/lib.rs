//! Presence/absence matrices for pangenome graphs.
//!
//! `rgaf` reads an rGFA graph and the minigraph `--cov` GAF output of each
//! assembly mapped against it, merges the per-assembly node coverage into a
//! single table, turns it into a binary presence matrix and classifies every
//! segment as core, dispensable or private.
//!
//! The stages mirror the command line tool:
//!
//! - [`gfa::GraphFeatures`]: segment lengths, rGFA stable coordinates and
//!   ranks, plus the raw links of the graph.
//! - [`gaf::AlignmentRecords`]: node coverage and edge usage of one assembly.
//! - [`coverage`]: outer-join of the per-assembly records.
//! - [`matrix::PresenceMatrix`]: binarization, rank back-fill and labels.
//! - [`categorize::CategorySummary`]: core/dispensable/private totals.

pub mod categorize;
pub mod cli;
pub mod coverage;
pub mod error;
pub mod gaf;
pub mod gfa;
pub mod matrix;
pub mod mmap;
pub mod optfields;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::{Error, Result};
