use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use crate::cli::{load_hits, OutputFormat};
use crate::parsing::write_hits;
use crate::tophits::TopHits;
use crate::utils::validation::is_gzipped;

#[derive(Args)]
pub struct MergeArgs {
    /// Partial hit tables (TSV, optionally .gz)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output hit table; gzip-compressed if the name ends in .gz
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn run(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let th = load_ranked(&args.files)?;

    write_merged(&args.output, &th)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        "Merged {} hits from {} files into {}",
        th.len(),
        args.files.len(),
        args.output.display()
    );

    match format {
        OutputFormat::Text => {
            println!(
                "Merged {} hits from {} files into {}",
                th.len(),
                args.files.len(),
                args.output.display()
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "files": args.files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                "hits": th.len(),
                "output": args.output.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("files\thits\toutput");
            println!("{}\t{}\t{}", args.files.len(), th.len(), args.output.display());
        }
    }

    Ok(())
}

/// Load every partial table and rank the union by p-value
fn load_ranked(files: &[PathBuf]) -> anyhow::Result<TopHits> {
    let mut th = load_hits(files)?;
    // Unit database size: sort keys become -pvalue
    th.compute_evalues(1.0);
    th.sort();
    Ok(th)
}

fn write_merged(path: &Path, th: &TopHits) -> anyhow::Result<()> {
    let file = File::create(path)?;
    if is_gzipped(path) {
        let mut w = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_hits(&mut w, th)?;
        w.finish()?.flush()?;
    } else {
        let mut w = BufWriter::new(file);
        write_hits(&mut w, th)?;
        w.flush()?;
    }
    Ok(())
}
