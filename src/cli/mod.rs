//! Command-line interface for tophits.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **report**: Merge partial hit tables, rank and threshold them, and print reports
//! - **merge**: Merge partial hit tables into one ranked table
//!
//! ## Usage
//!
//! ```text
//! # Human-readable report from three worker outputs
//! tophits report part1.tsv part2.tsv part3.tsv.gz -Z 2.4e6
//!
//! # Tighter thresholds, plus a parseable table with provenance trailer
//! tophits report parts/*.tsv -E 1e-3 --incE 1e-6 --tblout hits.tbl
//!
//! # Tabular report on stdout
//! tophits report parts/*.tsv --format tsv --query-name tRNA
//!
//! # Combine partial results for later
//! tophits merge parts/*.tsv -o merged.tsv.gz
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::debug;

use crate::parsing::parse_hits_file;
use crate::tophits::TopHits;

pub mod merge;
pub mod report;

#[derive(Parser)]
#[command(name = "tophits")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Merge, rank, threshold and report sequence search hits")]
#[command(
    long_about = "tophits collects the partial hit lists produced by parallel search workers into one ranked list.\n\nIt provides:\n- Deterministic ranking by E-value, target name and position\n- Reporting and inclusion thresholds by E-value or bit score\n- Human-readable hit tables, per-hit detail sections and a parseable tabular format"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank, threshold and report hits from one or more partial hit tables
    Report(report::ReportArgs),

    /// Merge partial hit tables into one ranked hit table
    Merge(merge::MergeArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Parse every file into its own hit list in parallel, then fold the lists
/// together on the calling thread.
///
/// # Errors
///
/// Returns an error naming the file if any input fails to parse, or if a
/// merge cannot allocate.
pub fn load_hits(files: &[PathBuf]) -> anyhow::Result<TopHits> {
    let parts = files
        .par_iter()
        .map(|path| {
            parse_hits_file(path)
                .with_context(|| format!("Failed to read hit table {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<TopHits>>>()?;

    let mut parts = parts.into_iter();
    let mut merged = match parts.next() {
        Some(first) => first,
        None => TopHits::new()?,
    };
    for mut part in parts {
        merged.merge(&mut part)?;
    }

    debug!("Loaded {} hits from {} files", merged.len(), files.len());
    Ok(merged)
}

/// The command line as invoked, for provenance records
pub(crate) fn command_line() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}
