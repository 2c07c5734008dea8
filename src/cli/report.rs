use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{command_line, load_hits, OutputFormat};
use crate::core::types::PipelineMode;
use crate::report::{
    write_hit_alignments, write_json, write_tabular_targets, write_targets,
    PlainAlignmentRenderer, QueryIdentity, ReportOptions, TabularTail,
};
use crate::tophits::{Cutoff, Thresholds, TopHits};
use crate::utils::validation::check_dbsize;

#[derive(Args)]
pub struct ReportArgs {
    /// Partial hit tables (TSV, optionally .gz)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Effective database size; E-value = p-value * Z
    #[arg(short = 'Z', long = "dbsize", default_value = "1.0")]
    pub dbsize: f64,

    /// Report hits with E-value <= this
    #[arg(short = 'E', long = "evalue", conflicts_with = "report_score")]
    pub report_evalue: Option<f64>,

    /// Report hits with bit score >= this
    #[arg(short = 'T', long = "score")]
    pub report_score: Option<f64>,

    /// Include reported hits with E-value <= this
    #[arg(long = "incE", conflicts_with = "include_score")]
    pub include_evalue: Option<f64>,

    /// Include reported hits with bit score >= this
    #[arg(long = "incT")]
    pub include_score: Option<f64>,

    /// Keep the reporting flags carried in the input (per-model bit score cutoffs)
    #[arg(long = "cut-ga")]
    pub cut_ga: bool,

    /// JSON file with reporting and inclusion thresholds
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Omit the detailed alignments
    #[arg(long)]
    pub noali: bool,

    /// Show accessions instead of names where available
    #[arg(long)]
    pub acc: bool,

    /// Maximum line width for descriptions
    #[arg(long)]
    pub textw: Option<usize>,

    /// Also write the tabular report, with trailer, to this file
    #[arg(long)]
    pub tblout: Option<PathBuf>,

    /// Omit the column header from tabular output
    #[arg(long)]
    pub noheader: bool,

    /// Query name for tabular output
    #[arg(long, default_value = "-")]
    pub query_name: String,

    /// Query accession for tabular output
    #[arg(long)]
    pub query_acc: Option<String>,

    /// Search (model vs. sequences) or scan (sequence vs. models)
    #[arg(long, value_enum, default_value = "search")]
    pub mode: PipelineMode,
}

impl ReportArgs {
    /// Thresholds from `--thresholds`, or the defaults, with any explicit
    /// cutoff flags applied on top.
    fn thresholds(&self) -> anyhow::Result<Thresholds> {
        let mut thresholds = match &self.thresholds {
            Some(path) => load_thresholds(path)?,
            None => Thresholds::default(),
        };

        if let Some(e) = self.report_evalue {
            thresholds.report = Cutoff::EValue(e);
        }
        if let Some(t) = self.report_score {
            thresholds.report = Cutoff::Score(t);
        }
        if let Some(e) = self.include_evalue {
            thresholds.include = Cutoff::EValue(e);
        }
        if let Some(t) = self.include_score {
            thresholds.include = Cutoff::Score(t);
        }
        if self.cut_ga {
            thresholds.use_bit_cutoffs = true;
        }
        Ok(thresholds)
    }

    fn query(&self) -> QueryIdentity {
        QueryIdentity {
            name: self.query_name.clone(),
            acc: self.query_acc.clone(),
        }
    }

    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            show_accessions: self.acc,
            show_alignments: !self.noali,
            text_width: self.textw,
            mode: self.mode,
        }
    }

    fn tail(&self) -> TabularTail {
        let targets: Vec<String> = self
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        TabularTail {
            program: Some(env!("CARGO_PKG_NAME").to_string()),
            mode: self.mode,
            query_file: None,
            target_file: Some(targets.join(",")),
            options: command_line(),
        }
    }
}

fn load_thresholds(path: &Path) -> anyhow::Result<Thresholds> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read thresholds from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid thresholds file {}", path.display()))
}

pub fn run(args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(msg) = check_dbsize(args.dbsize) {
        anyhow::bail!(msg);
    }
    let thresholds = args.thresholds()?;

    let mut th = load_hits(&args.files)?;
    th.compute_evalues(args.dbsize);
    th.sort();
    th.threshold(&thresholds);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match format {
        OutputFormat::Text => print_text_report(&mut out, &th, &args.report_options())?,
        OutputFormat::Json => write_json(&mut out, &args.query(), &th)?,
        OutputFormat::Tsv => {
            write_tabular_targets(&mut out, &args.query(), &th, !args.noheader)?;
            args.tail().write(&mut out)?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.tblout {
        write_tblout(path, &args, &th)
            .with_context(|| format!("Failed to write tabular output {}", path.display()))?;
    }

    Ok(())
}

fn print_text_report<W: Write>(
    out: &mut W,
    th: &TopHits,
    opts: &ReportOptions,
) -> anyhow::Result<()> {
    write_targets(out, th, opts)?;
    writeln!(out)?;
    write_hit_alignments(out, th, opts, &PlainAlignmentRenderer::default())?;
    Ok(())
}

fn write_tblout(path: &Path, args: &ReportArgs, th: &TopHits) -> anyhow::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_tabular_targets(&mut w, &args.query(), th, !args.noheader)?;
    args.tail().write(&mut w)?;
    w.flush()?;
    info!("Wrote tabular output to {}", path.display());
    Ok(())
}
