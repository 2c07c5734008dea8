//! # tophits
//!
//! A library for collecting, ranking, thresholding and reporting the hits of a
//! sequence homology search.
//!
//! A search splits its target database across workers. Each worker fills its
//! own [`TopHits`] list; the lists are then merged into one, ranked by
//! significance, marked against reporting and inclusion thresholds, and
//! rendered as human-readable or parseable reports.
//!
//! ## Features
//!
//! - **Cheap appends**: hits are reserved in place, with amortized growth
//! - **Deterministic ranking**: by sort key, then target name, then position
//! - **Ownership-transferring merge**: combine worker lists without copying hits
//! - **Pluggable thresholds**: E-value or bit score cutoffs via [`SignificancePolicy`]
//! - **Reports**: ranked hit table, per-hit details, tabular output with provenance trailer
//!
//! ## Example
//!
//! ```rust
//! use tophits::report::{write_targets, ReportOptions};
//! use tophits::{Hit, Thresholds, TopHits};
//!
//! let mut th = TopHits::new().unwrap();
//! th.push(Hit::new("chr4", 1201, 1290).with_stats(58.1, 2e-14)).unwrap();
//! th.push(Hit::new("chr9", 500, 431).with_stats(19.7, 0.04)).unwrap();
//!
//! th.compute_evalues(1.0);
//! th.sort();
//! th.threshold(&Thresholds::default());
//!
//! let mut out = Vec::new();
//! write_targets(&mut out, &th, &ReportOptions::default()).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("inclusion threshold"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Hit, alignment and pipeline data types
//! - [`tophits`]: The hit list with its ranking, merging and thresholding
//! - [`report`]: Text, tabular and JSON renderers
//! - [`parsing`]: Readers and writers for partial hit tables
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod report;
pub mod tophits;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::alignment::Alignment;
pub use crate::core::hit::{Hit, HitFlags};
pub use crate::core::types::*;
pub use crate::tophits::{hit_order, Cutoff, SignificancePolicy, Thresholds, TopHits, TopHitsError};
