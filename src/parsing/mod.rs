//! Readers and writers for partial hit tables.
//!
//! Each input file holds the hits one worker collected for one query. Files
//! are tab-separated, optionally gzip-compressed (`.gz`/`.bgz`).
//!
//! ## Example
//!
//! ```rust
//! use tophits::parsing::hits::parse_hits_text;
//!
//! let table = "name\taccession\tstart\tstop\tscore\tpvalue\n\
//!              chr1\t-\t100\t171\t45.2\t3.1e-9\n";
//! let th = parse_hits_text(table).unwrap();
//! assert_eq!(th.len(), 1);
//! ```
//!
//! ## Columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | name | Target name | Yes |
//! | accession | Target accession, `-` if none | Yes |
//! | start | 1-based start; `start > stop` is the reverse strand | Yes |
//! | stop | 1-based stop | Yes |
//! | score | Bit score | Yes |
//! | pvalue | P-value of the score | Yes |
//! | oasc | Optimal accuracy score | No |
//! | cm_from, cm_to | Model coordinates of the alignment | No |
//! | cm_len | Model length | No |
//! | target_len | Target sequence length | No |
//! | flags | `-`, `?` (reported) or `!` (reported and included) | No |
//! | description | Target description; may contain tabs | No |
//!
//! `-` marks an absent optional value.

pub mod hits;

pub use hits::{parse_hits_file, parse_hits_reader, parse_hits_text, write_hits, ParseError};
