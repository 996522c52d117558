use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::categorize::CategorySummary;
use crate::cli::{cat, gaf, gfa, mtx};
use crate::gfa::GraphFeatures;

#[derive(Args)]
pub struct RunArgs {
    /// rGFA graph; its file stem is the graph prefix of the alignment
    /// files
    #[arg(short, long)]
    pub graph: PathBuf,

    /// Assemblies, in matrix column order. Rank 0 is the first.
    #[arg(short, long, required = true, num_args = 1..)]
    pub assemblies: Vec<String>,

    /// Directory of the `{assembly}_{graph}.gaf` files
    #[arg(short = 'd', long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Output directory for every table, created if missing
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,

    /// Prefix of the output tables; defaults to the graph prefix
    #[arg(short, long)]
    pub prefix: Option<String>,
}

fn graph_prefix(args: &RunArgs) -> anyhow::Result<String> {
    args.graph
        .file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
        .with_context(|| format!("Can't take a graph prefix from {}", args.graph.display()))
}

/// Every input is read and every table computed before the first one
/// is written.
pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let graph = graph_prefix(&args)?;
    let prefix = args.prefix.clone().unwrap_or_else(|| graph.clone());

    let features = GraphFeatures::from_path(&args.graph)?;
    let (coverage, usage) = gaf::combine(&args.input_dir, &graph, &args.assemblies)?;
    let matrix = mtx::build(&coverage, &features.nodes);
    let summary = CategorySummary::from_matrix(&matrix, &features.nodes)?;

    gfa::write_features(&features, &args.outdir, &prefix)?;
    gaf::write_tables(&coverage, &usage, &args.outdir, &prefix)?;
    mtx::write_matrix(&matrix, &args.outdir, &prefix)?;
    cat::write_summary(&summary, &args.outdir, &prefix)?;

    info!("Done; tables are in {}", args.outdir.display());
    Ok(())
}
