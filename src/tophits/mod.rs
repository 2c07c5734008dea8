//! The ranked hit list and the operations on it.
//!
//! - [`TopHits`]: append-only hit storage with a ranked index view
//! - [`hit_order`]: the ranking relation used by sorting and merging
//! - [`SignificancePolicy`], [`Thresholds`]: reporting/inclusion decisions
//!
//! ## Lifecycle
//!
//! 1. The search pipeline reserves hits with [`TopHits::reserve_next`] (or
//!    [`TopHits::clone_hit_from`]) and fills them in.
//! 2. Partial lists built by separate workers are folded together with
//!    [`TopHits::merge`].
//! 3. [`TopHits::compute_evalues`], [`TopHits::sort`] and
//!    [`TopHits::threshold`] prepare the list for output.
//! 4. The [`crate::report`] functions render it.
//! 5. [`TopHits::reuse`] empties the list for the next query; dropping it
//!    frees everything.
//!
//! A `TopHits` is not synchronized. Give each worker its own list and merge
//! them on one thread.
//!
//! ## Example
//!
//! ```rust
//! use tophits::{Hit, Thresholds, TopHits};
//!
//! let mut a = TopHits::new().unwrap();
//! a.push(Hit::new("seq1", 100, 180).with_stats(42.0, 1e-9)).unwrap();
//!
//! let mut b = TopHits::new().unwrap();
//! b.push(Hit::new("seq2", 950, 870).with_stats(12.0, 0.2)).unwrap();
//!
//! a.merge(&mut b).unwrap();
//! a.compute_evalues(1.0);
//! a.sort();
//! a.threshold(&Thresholds::default());
//!
//! assert_eq!(a.get(0).unwrap().name_str(), "seq1");
//! assert_eq!(a.nreported(), 2);
//! assert_eq!(a.nincluded(), 1);
//! ```

pub mod rank;
pub mod store;
pub mod threshold;

pub use rank::hit_order;
pub use store::{TopHits, TopHitsError, DEFAULT_NALLOC};
pub use threshold::{Cutoff, SignificancePolicy, Thresholds};
