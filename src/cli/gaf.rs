use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::cli::{create_outdir, output_path};
use crate::coverage::{self, CoverageTable, EdgeUsageTable};
use crate::gaf::load_assemblies;
use crate::writer;

#[derive(Args)]
pub struct GafArgs {
    /// Graph prefix; alignment files are named `{assembly}_{graph}.gaf`
    #[arg(short, long)]
    pub graph: String,

    /// Assemblies, in matrix column order. Rank 0 is the first.
    #[arg(short, long, required = true, num_args = 1..)]
    pub assemblies: Vec<String>,

    /// Directory of the alignment files
    #[arg(short = 'd', long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Output directory, created if missing
    #[arg(short, long, default_value = "coverage_use")]
    pub outdir: PathBuf,
}

pub fn run(args: GafArgs) -> anyhow::Result<()> {
    let (coverage, usage) = combine(&args.input_dir, &args.graph, &args.assemblies)?;
    write_tables(&coverage, &usage, &args.outdir, &args.graph)
}

/// Parse every alignment file, then combine. Nothing has been written
/// when this fails.
pub(crate) fn combine(
    dir: &Path,
    graph: &str,
    assemblies: &[String],
) -> anyhow::Result<(CoverageTable, EdgeUsageTable)> {
    let records = load_assemblies(dir, graph, assemblies)?;
    Ok(coverage::combine(records)?)
}

pub(crate) fn write_tables(
    coverage: &CoverageTable,
    usage: &EdgeUsageTable,
    dir: &Path,
    prefix: &str,
) -> anyhow::Result<()> {
    if coverage.is_empty() {
        warn!("No assembly reported any segment; are these minigraph --cov files?");
    }

    create_outdir(dir)?;

    let cov_path = output_path(dir, prefix, "coverage.tsv");
    writer::create(&cov_path)
        .and_then(|out| writer::write_coverage(coverage, out))
        .with_context(|| format!("Failed to write {}", cov_path.display()))?;

    let edge_path = output_path(dir, prefix, "edge_use.tsv");
    writer::create(&edge_path)
        .and_then(|out| writer::write_edge_usage(usage, out))
        .with_context(|| format!("Failed to write {}", edge_path.display()))?;

    info!(
        "Wrote coverage of {} nodes and {} edges to {}",
        coverage.len(),
        usage.len(),
        dir.display()
    );
    Ok(())
}
