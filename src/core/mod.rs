//! Core data types for search hits.
//!
//! - [`Hit`]: one significant match at one target location
//! - [`HitFlags`]: REPORTED / INCLUDED marks set by thresholding
//! - [`Alignment`]: the detailed alignment attached to a hit
//! - [`PipelineMode`], [`SearchResultNode`], [`ThresholdProvenance`]: pipeline context
//!
//! ## Coordinates
//!
//! Target coordinates are 1-based and inclusive. The strand is encoded in
//! their order:
//!
//! | start vs stop | Strand | Example |
//! |---------------|--------|---------|
//! | start < stop  | forward (`+`) | 100..171 |
//! | start > stop  | reverse (`-`) | 900..830 |

pub mod alignment;
pub mod hit;
pub mod types;

pub use alignment::Alignment;
pub use hit::{Hit, HitFlags};
pub use types::{PipelineMode, SearchResultNode, ThresholdProvenance};
