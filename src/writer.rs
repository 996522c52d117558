//! The tables `rgaf` writes between and at the end of its stages.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use bstr::BString;

use crate::categorize::CategorySummary;
use crate::coverage::{CoverageTable, EdgeUsageTable};
use crate::gfa::NodeRecord;
use crate::matrix::PresenceMatrix;

pub fn create<P: AsRef<Path>>(path: P) -> io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}

/// Node length table; no header, one tab-separated row per segment.
pub fn write_node_lengths<W: Write>(nodes: &[NodeRecord], mut out: W) -> io::Result<()> {
    for node in nodes {
        writeln!(out, "{}", node)?;
    }
    out.flush()
}

/// The `L` lines of the graph, as they were.
pub fn write_links<W: Write>(links: &[BString], mut out: W) -> io::Result<()> {
    for link in links {
        out.write_all(link)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn write_header<W: Write>(
    out: &mut W,
    delim: &str,
    columns: &[&str],
    assemblies: &[String],
) -> io::Result<()> {
    let mut header: Vec<&str> = columns.to_vec();
    header.extend(assemblies.iter().map(|s| s.as_str()));
    writeln!(out, "{}", header.join(delim))
}

pub const COVERAGE_COLUMNS: [&str; 5] =
    ["nodeid", "nodelen", "start_chromo", "start_pos", "rrank"];

/// Combined coverage table, space-separated with a header: the
/// segment fields, then the raw coverage of each assembly, or 0 where
/// the assembly didn't report the node.
pub fn write_coverage<W: Write>(table: &CoverageTable, mut out: W) -> io::Result<()> {
    write_header(&mut out, " ", &COVERAGE_COLUMNS, table.assemblies())?;
    for row in table.rows() {
        let node = &row.meta;
        write!(
            out,
            "{} {} {} {} {}",
            row.key, node.length, node.chromosome, node.position, node.rank
        )?;
        for value in row.values.iter() {
            write!(out, " {}", value)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Combined edge usage table, space-separated with a header.
pub fn write_edge_usage<W: Write>(table: &EdgeUsageTable, mut out: W) -> io::Result<()> {
    write_header(&mut out, " ", &["parent_node", "child_node"], table.assemblies())?;
    for row in table.rows() {
        let (parent, child) = &row.key;
        write!(out, "{} {}", parent, child)?;
        for value in row.values.iter() {
            write!(out, " {}", value)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Node annotation table: each node with the comma-separated list of
/// assemblies present on it.
pub fn write_annotations<W: Write>(matrix: &PresenceMatrix, mut out: W) -> io::Result<()> {
    writeln!(out, "nodeid\tcolnode")?;
    for annotation in matrix.annotations() {
        writeln!(out, "{}", annotation)?;
    }
    out.flush()
}

/// Binary node matrix, tab-separated with a header.
pub fn write_presence_matrix<W: Write>(matrix: &PresenceMatrix, mut out: W) -> io::Result<()> {
    write_header(&mut out, "\t", &["nodeid"], matrix.assemblies())?;
    for row in matrix.rows() {
        write!(out, "{}", row.node_id)?;
        for &present in row.present.iter() {
            write!(out, "\t{}", u8::from(present))?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Category table: length sums on the first row, node counts on the
/// second.
pub fn write_categories<W: Write>(summary: &CategorySummary, mut out: W) -> io::Result<()> {
    writeln!(out, "core\tdispensable\tprivate")?;
    writeln!(
        out,
        "{}\t{}\t{}",
        summary.core_length, summary.dispensable_length, summary.private_length
    )?;
    writeln!(
        out,
        "{}\t{}\t{}",
        summary.core_nodes, summary.dispensable_nodes, summary.private_nodes
    )?;
    out.flush()
}
