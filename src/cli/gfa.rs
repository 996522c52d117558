use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{create_outdir, output_path};
use crate::gfa::GraphFeatures;
use crate::writer;

#[derive(Args)]
pub struct GfaArgs {
    /// rGFA graph, with SN, SO and SR tags on every segment
    #[arg(short, long)]
    pub graph: PathBuf,

    /// Prefix of the output tables
    #[arg(short, long, default_value = "graph")]
    pub prefix: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,
}

pub fn run(args: GfaArgs) -> anyhow::Result<()> {
    let features = GraphFeatures::from_path(&args.graph)?;
    write_features(&features, &args.outdir, &args.prefix)
}

pub(crate) fn write_features(
    features: &GraphFeatures,
    dir: &std::path::Path,
    prefix: &str,
) -> anyhow::Result<()> {
    create_outdir(dir)?;

    let len_path = output_path(dir, prefix, "len.tsv");
    writer::create(&len_path)
        .and_then(|out| writer::write_node_lengths(&features.nodes, out))
        .with_context(|| format!("Failed to write {}", len_path.display()))?;

    let link_path = output_path(dir, prefix, "link.tsv");
    writer::create(&link_path)
        .and_then(|out| writer::write_links(&features.links, out))
        .with_context(|| format!("Failed to write {}", link_path.display()))?;

    info!(
        "Wrote {} nodes to {} and {} links to {}",
        features.nodes.len(),
        len_path.display(),
        features.links.len(),
        link_path.display()
    );
    Ok(())
}
