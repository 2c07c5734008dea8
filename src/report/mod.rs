//! Renderers for a sorted, thresholded hit list.
//!
//! - [`write_targets`]: human-readable ranked hit table
//! - [`write_hit_alignments`]: per-hit detail tables, optionally with alignments
//! - [`write_tabular_targets`]: whitespace-delimited table for downstream parsing
//! - [`TabularTail`]: provenance trailer closing a tabular file
//! - [`write_json`]: the reported hits as JSON
//!
//! Column widths are computed in one scan over the list ([`table::FieldWidths`])
//! before any row is written. All renderers expect the list to be sorted; the
//! ranked accessors panic otherwise.
//!
//! ## Tabular format
//!
//! One row per reported hit, space-padded, fields in this order:
//!
//! | # | Field | Notes |
//! |---|-------|-------|
//! | 1 | target name | |
//! | 2 | target accession | `-` if none |
//! | 3 | query name | |
//! | 4 | query accession | `-` if none |
//! | 5 | cm from | `-` without an alignment |
//! | 6 | cm to | `-` without an alignment |
//! | 7 | hit from | |
//! | 8 | hit to | |
//! | 9 | E-value | |
//! | 10 | score | |
//! | 11 | strand | `+` or `-` |
//! | 12 | description of target | rest of the line |

use std::io::{self, Write};

use thiserror::Error;

use crate::core::alignment::Alignment;
use crate::core::hit::Hit;
use crate::core::types::PipelineMode;

pub mod alignments;
pub mod json;
pub mod table;
pub mod tabular;
pub mod targets;
pub mod trailer;

pub use alignments::{write_hit_alignments, PlainAlignmentRenderer};
pub use json::write_json;
pub use tabular::{write_tabular_targets, QueryIdentity};
pub use targets::write_targets;
pub use trailer::TabularTail;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("System environment error: {0}")]
    SystemEnvironment(String),
}

/// Display settings for the human-readable reports
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Show accessions instead of names where available
    pub show_accessions: bool,

    /// Print detailed alignments under each hit
    pub show_alignments: bool,

    /// Total line width budget; descriptions are cut to fit. `None` is unbounded.
    pub text_width: Option<usize>,

    pub mode: PipelineMode,
}

/// Draws the detailed alignment of a hit
pub trait AlignmentRenderer {
    /// Write `ad`, the alignment of `hit`, to `w`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from `w`.
    fn render(&self, w: &mut dyn Write, hit: &Hit, ad: &Alignment) -> io::Result<()>;
}
