use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::categorize::CategorySummary;
use crate::cli::{create_outdir, output_path};
use crate::{reader, writer};

#[derive(Args)]
pub struct CatArgs {
    /// Binary node matrix from the mtx stage
    #[arg(short = 'm', long)]
    pub matrix: PathBuf,

    /// Node length table from the gfa stage
    #[arg(short, long)]
    pub lengths: PathBuf,

    /// Prefix of the output table
    #[arg(short, long)]
    pub prefix: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,
}

pub fn run(args: CatArgs) -> anyhow::Result<()> {
    let matrix = reader::read_presence_matrix_path(&args.matrix)?;
    let nodes = reader::read_node_lengths_path(&args.lengths)?;
    let summary = CategorySummary::from_matrix(&matrix, &nodes)?;
    write_summary(&summary, &args.outdir, &args.prefix)
}

pub(crate) fn write_summary(
    summary: &CategorySummary,
    dir: &Path,
    prefix: &str,
) -> anyhow::Result<()> {
    create_outdir(dir)?;

    let path = output_path(dir, prefix, "categorize.tsv");
    writer::create(&path)
        .and_then(|out| writer::write_categories(summary, out))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "Core {} bp, dispensable {} bp, private {} bp of {} bp in {} nodes",
        summary.core_length,
        summary.dispensable_length,
        summary.private_length,
        summary.total_length(),
        summary.total_nodes()
    );
    Ok(())
}
