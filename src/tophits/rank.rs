use std::cmp::Ordering;

use tracing::debug;

use crate::core::hit::Hit;
use crate::tophits::store::{TopHits, TopHitsError};

/// Ranking order of two hits: `Less` means `a` ranks ahead of `b`.
///
/// Higher sort key first; then target name ascending (bytewise); then the
/// larger start coordinate first.
///
/// A NaN sort key is placed by `f64::total_cmp` (a negated NaN E-value ranks
/// last), so the relation stays total. `0.0` and `-0.0` tie.
pub fn hit_order(a: &Hit, b: &Hit) -> Ordering {
    b.sortkey
        .partial_cmp(&a.sortkey)
        .unwrap_or_else(|| b.sortkey.total_cmp(&a.sortkey))
        .then_with(|| a.name_str().cmp(b.name_str()))
        .then_with(|| b.start.cmp(&a.start))
}

impl TopHits {
    /// Rank the hits. A no-op if the list is already sorted.
    pub fn sort(&mut self) {
        if self.is_sorted {
            return;
        }

        let unsrt = &self.unsrt;
        self.hit.clear();
        self.hit.extend(0..unsrt.len());
        if unsrt.len() > 1 {
            self.hit.sort_by(|&i, &j| hit_order(&unsrt[i], &unsrt[j]));
        }
        self.is_sorted = true;
    }

    /// Merge `other` into this list, leaving this list sorted.
    ///
    /// Both lists are sorted first and their ranked views are merged in one
    /// linear pass. Every hit of `other`, with its owned name, accession,
    /// description and alignment, moves into this list; `other` is left empty
    /// (with its allocation) and may be reused or dropped.
    ///
    /// # Errors
    ///
    /// Returns `TopHitsError::Allocation` if the combined list cannot be
    /// allocated. Neither list loses any hits in that case.
    pub fn merge(&mut self, other: &mut TopHits) -> Result<(), TopHitsError> {
        self.sort();
        other.sort();

        let n1 = self.unsrt.len();
        let n2 = other.unsrt.len();
        let nalloc = self.nalloc + other.nalloc;

        // Allocate everything before touching either list
        self.unsrt
            .try_reserve_exact(nalloc - n1)
            .map_err(TopHitsError::allocation(nalloc))?;
        let mut merged: Vec<usize> = Vec::new();
        merged
            .try_reserve_exact(nalloc)
            .map_err(TopHitsError::allocation(nalloc))?;

        // other's hits land at [n1, n1 + n2)
        self.unsrt.append(&mut other.unsrt);

        let (mut i, mut j) = (0, 0);
        while i < n1 && j < n2 {
            let a = self.hit[i];
            let b = n1 + other.hit[j];
            if hit_order(&self.unsrt[a], &self.unsrt[b]) == Ordering::Greater {
                merged.push(b);
                j += 1;
            } else {
                merged.push(a);
                i += 1;
            }
        }
        merged.extend_from_slice(&self.hit[i..]);
        merged.extend(other.hit[j..].iter().map(|&k| n1 + k));

        self.hit = merged;
        self.nalloc = nalloc;

        other.hit.clear();
        other.is_sorted = true;
        other.nreported = 0;
        other.nincluded = 0;

        debug!(kept = n1, absorbed = n2, total = self.unsrt.len(), "merged hit lists");
        Ok(())
    }
}
