use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{create_outdir, output_path};
use crate::coverage::CoverageTable;
use crate::gfa::NodeRecord;
use crate::matrix::PresenceMatrix;
use crate::{reader, writer};

#[derive(Args)]
pub struct MtxArgs {
    /// Combined coverage table from the gaf stage
    #[arg(short, long)]
    pub coverage: PathBuf,

    /// Node length table from the gfa stage
    #[arg(short = 'n', long)]
    pub lengths: PathBuf,

    /// Assemblies, in the column order of the coverage table
    #[arg(short, long, required = true, num_args = 1..)]
    pub assemblies: Vec<String>,

    /// Prefix of the output tables
    #[arg(short, long)]
    pub prefix: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,
}

pub fn run(args: MtxArgs) -> anyhow::Result<()> {
    let coverage = reader::read_coverage_path(&args.coverage, &args.assemblies)?;
    let nodes = reader::read_node_lengths_path(&args.lengths)?;
    let matrix = build(&coverage, &nodes);
    write_matrix(&matrix, &args.outdir, &args.prefix)
}

/// Binarize, then mark each node present in the assembly its rank
/// names.
pub(crate) fn build(coverage: &CoverageTable, nodes: &[NodeRecord]) -> PresenceMatrix {
    let mut matrix = PresenceMatrix::from_coverage(coverage);
    let changed = matrix.backfill_ranks(nodes);
    info!(
        "{} nodes over {} assemblies, {} set present by rank",
        matrix.rows().len(),
        matrix.total(),
        changed
    );
    matrix
}

pub(crate) fn write_matrix(
    matrix: &PresenceMatrix,
    dir: &Path,
    prefix: &str,
) -> anyhow::Result<()> {
    create_outdir(dir)?;

    let col_path = output_path(dir, prefix, "nodecol.tsv");
    writer::create(&col_path)
        .and_then(|out| writer::write_annotations(matrix, out))
        .with_context(|| format!("Failed to write {}", col_path.display()))?;

    let mat_path = output_path(dir, prefix, "nodemat.tsv");
    writer::create(&mat_path)
        .and_then(|out| writer::write_presence_matrix(matrix, out))
        .with_context(|| format!("Failed to write {}", mat_path.display()))?;
    Ok(())
}
