//! Command-line interface for rgaf.
//!
//! Each stage of the pipeline is a subcommand that reads the tables the
//! previous stage wrote, so a stage can be rerun on its own:
//!
//! - **gfa**: node lengths and links of an rGFA graph
//! - **gaf**: combined node coverage and edge usage of every assembly
//! - **mtx**: binary presence matrix and node annotations
//! - **cat**: core, dispensable and private genome totals
//! - **run**: all of the above in one go
//!
//! ## Usage
//!
//! ```text
//! rgaf gfa -g asm5.gfa -p asm5
//! rgaf gaf -g asm5 -a nh232 ro18 -d gafs
//! rgaf mtx -c coverage_use/asm5_coverage.tsv -n asm5_len.tsv -a nh232 ro18 -p asm5
//! rgaf cat -m asm5_nodemat.tsv -l asm5_len.tsv -p asm5
//!
//! # or everything at once
//! rgaf run -g asm5.gfa -a nh232 ro18 -d gafs -o out
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

pub mod cat;
pub mod gaf;
pub mod gfa;
pub mod mtx;
pub mod run;

#[derive(Parser)]
#[command(name = "rgaf")]
#[command(version)]
#[command(about = "Presence/absence matrices and core/dispensable/private genome from rGFA graphs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Threads for parsing alignment files (0 uses every core)
    #[arg(short, long, global = true, default_value = "0")]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract node lengths and links from an rGFA graph
    Gfa(gfa::GfaArgs),

    /// Combine the minigraph --cov output of each assembly
    Gaf(gaf::GafArgs),

    /// Build the binary presence matrix from a coverage table
    Mtx(mtx::MtxArgs),

    /// Categorize nodes as core, dispensable or private
    Cat(cat::CatArgs),

    /// Run every stage from a graph and its alignment files
    Run(run::RunArgs),
}

/// Dispatch to the subcommand.
///
/// # Errors
///
/// Returns an error if an input is missing or malformed, or an output
/// can't be written. Nothing is written for a stage whose inputs fail.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Gfa(args) => gfa::run(args),
        Commands::Gaf(args) => gaf::run(args),
        Commands::Mtx(args) => mtx::run(args),
        Commands::Cat(args) => cat::run(args),
        Commands::Run(args) => run::run(args),
    }
}

/// `{dir}/{prefix}_{suffix}`
pub(crate) fn output_path<P: AsRef<Path>>(dir: P, prefix: &str, suffix: &str) -> PathBuf {
    dir.as_ref().join(format!("{}_{}", prefix, suffix))
}

/// Create the output directory and any missing parents.
pub(crate) fn create_outdir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))
}
