use std::collections::TryReserveError;

use thiserror::Error;
use tracing::debug;

use crate::core::hit::Hit;
use crate::core::types::SearchResultNode;

#[derive(Error, Debug)]
pub enum TopHitsError {
    #[error("Failed to allocate room for {requested} hits: {source}")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

impl TopHitsError {
    pub(crate) fn allocation(requested: usize) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::Allocation { requested, source }
    }
}

/// Initial number of hit slots in a new list
pub const DEFAULT_NALLOC: usize = 256;

/// A ranked list of hits
///
/// Hits live in an append-only backing vector (`unsrt`) in the order they were
/// reserved. `hit` is a parallel vector of indices into `unsrt` giving the
/// ranked view. The ranked view is only meaningful while `is_sorted` holds;
/// reserving a second or later hit clears it, [`TopHits::sort`] restores it.
///
/// Because the view stores indices rather than references, relocating
/// `unsrt` on growth never invalidates it.
#[derive(Debug)]
pub struct TopHits {
    pub(crate) unsrt: Vec<Hit>,
    pub(crate) hit: Vec<usize>,
    pub(crate) nalloc: usize,
    pub(crate) is_sorted: bool,
    pub(crate) nreported: usize,
    pub(crate) nincluded: usize,
}

impl TopHits {
    /// Create an empty hit list with room for [`DEFAULT_NALLOC`] hits.
    ///
    /// # Errors
    ///
    /// Returns `TopHitsError::Allocation` if the backing storage cannot be obtained.
    pub fn new() -> Result<Self, TopHitsError> {
        let mut unsrt = Vec::new();
        let mut hit = Vec::new();
        unsrt
            .try_reserve_exact(DEFAULT_NALLOC)
            .map_err(TopHitsError::allocation(DEFAULT_NALLOC))?;
        hit.try_reserve_exact(DEFAULT_NALLOC)
            .map_err(TopHitsError::allocation(DEFAULT_NALLOC))?;

        Ok(Self {
            unsrt,
            hit,
            nalloc: DEFAULT_NALLOC,
            // Vacuously sorted while empty
            is_sorted: true,
            nreported: 0,
            nincluded: 0,
        })
    }

    /// Make room for one more hit, doubling the allocation if the list is full.
    ///
    /// A no-op while there is still room. The ranked view survives growth
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `TopHitsError::Allocation` on allocation failure; the hits in
    /// the list are unchanged in that case.
    pub fn grow(&mut self) -> Result<(), TopHitsError> {
        let n = self.unsrt.len();
        if n < self.nalloc {
            return Ok(());
        }

        let nalloc = self.nalloc * 2;
        self.hit
            .try_reserve_exact(nalloc - self.hit.len())
            .map_err(TopHitsError::allocation(nalloc))?;
        self.unsrt
            .try_reserve_exact(nalloc - n)
            .map_err(TopHitsError::allocation(nalloc))?;

        debug!(from = self.nalloc, to = nalloc, "grew hit list");
        self.nalloc = nalloc;
        Ok(())
    }

    /// Append a new, empty hit and return it for the caller to fill in.
    ///
    /// # Errors
    ///
    /// Returns `TopHitsError::Allocation` if the list had to grow and could
    /// not; the list is left unchanged.
    pub fn reserve_next(&mut self) -> Result<&mut Hit, TopHitsError> {
        self.grow()?;

        let idx = self.unsrt.len();
        self.unsrt.push(Hit::default());
        self.hit.push(idx);
        if self.unsrt.len() >= 2 {
            self.is_sorted = false;
        }

        Ok(&mut self.unsrt[idx])
    }

    /// Append a new hit holding the location and score of an upstream scan
    /// result. Identity fields are left for the caller.
    ///
    /// # Errors
    ///
    /// Returns `TopHitsError::Allocation` as for [`TopHits::reserve_next`].
    pub fn clone_hit_from(&mut self, node: &SearchResultNode) -> Result<&mut Hit, TopHitsError> {
        let hit = self.reserve_next()?;
        *hit = Hit::from_node(node);
        Ok(hit)
    }

    /// Append a fully built hit.
    ///
    /// # Errors
    ///
    /// Returns `TopHitsError::Allocation` as for [`TopHits::reserve_next`].
    pub fn push(&mut self, hit: Hit) -> Result<(), TopHitsError> {
        *self.reserve_next()? = hit;
        Ok(())
    }

    /// Empty the list for another query, keeping its allocation.
    ///
    /// Every owned name, accession, description and alignment is dropped here.
    pub fn reuse(&mut self) {
        self.unsrt.clear();
        self.hit.clear();
        self.is_sorted = true;
        self.nreported = 0;
        self.nincluded = 0;
    }

    /// Convert p-values to E-values for an effective database size of
    /// `eff_dbsize`, and rank by E-value (`sortkey = -evalue`).
    ///
    /// Sort keys change, so a list holding more than one hit needs sorting again.
    pub fn compute_evalues(&mut self, eff_dbsize: f64) {
        for hit in &mut self.unsrt {
            hit.evalue = hit.pvalue * eff_dbsize;
            hit.sortkey = -hit.evalue;
        }
        if self.unsrt.len() > 1 {
            self.is_sorted = false;
        }
    }

    /// Number of hits in the list
    pub fn len(&self) -> usize {
        self.unsrt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unsrt.is_empty()
    }

    /// Number of hit slots currently allocated
    pub fn capacity(&self) -> usize {
        self.nalloc
    }

    /// Whether the ranked view is current
    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    /// Hits marked REPORTED by the last [`TopHits::threshold`]
    pub fn nreported(&self) -> usize {
        self.nreported
    }

    /// Hits marked INCLUDED by the last [`TopHits::threshold`]
    pub fn nincluded(&self) -> usize {
        self.nincluded
    }

    /// The hit at `rank` (0 = best).
    ///
    /// # Panics
    ///
    /// Panics if the list has not been sorted since the last hit was added.
    pub fn get(&self, rank: usize) -> Option<&Hit> {
        assert!(self.is_sorted, "ranked access to an unsorted hit list");
        self.hit.get(rank).map(|&idx| &self.unsrt[idx])
    }

    /// Hits in rank order, best first.
    ///
    /// # Panics
    ///
    /// Panics if the list has not been sorted since the last hit was added.
    pub fn iter_ranked(&self) -> impl Iterator<Item = &Hit> + '_ {
        assert!(self.is_sorted, "ranked access to an unsorted hit list");
        self.hit.iter().map(move |&idx| &self.unsrt[idx])
    }

    /// Hits in the order they were added
    pub fn iter_unsorted(&self) -> impl Iterator<Item = &Hit> + '_ {
        self.unsrt.iter()
    }

    /// REPORTED hits in rank order
    pub fn reported(&self) -> impl Iterator<Item = &Hit> + '_ {
        self.iter_ranked()
            .filter(|h| h.is_reported())
            .inspect(|h| debug_assert!(h.name.is_some(), "reported hit without a name"))
    }

    /// Widest start/stop coordinate, in printed characters
    pub fn max_position_width(&self) -> usize {
        self.unsrt
            .iter()
            .map(|h| integer_text_width(h.start).max(integer_text_width(h.stop)))
            .max()
            .unwrap_or(0)
    }

    /// Longest target name
    pub fn max_name_len(&self) -> usize {
        self.unsrt
            .iter()
            .filter_map(|h| h.name.as_deref())
            .map(str::len)
            .max()
            .unwrap_or(0)
    }

    /// Longest target accession
    pub fn max_accession_len(&self) -> usize {
        self.unsrt
            .iter()
            .filter_map(|h| h.acc.as_deref())
            .map(str::len)
            .max()
            .unwrap_or(0)
    }

    /// Longest label shown in accession display mode: the accession where one
    /// is set and non-empty, the name otherwise.
    pub fn max_shown_len(&self) -> usize {
        self.unsrt
            .iter()
            .map(|h| h.shown_name(true).len())
            .max()
            .unwrap_or(0)
    }
}

/// Characters needed to print `n` in decimal, including a minus sign
pub fn integer_text_width(n: i64) -> usize {
    let sign = usize::from(n < 0);
    let mut m = n.unsigned_abs();
    let mut width = 1;
    while m >= 10 {
        m /= 10;
        width += 1;
    }
    sign + width
}
