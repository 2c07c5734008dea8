use crate::core::alignment::Alignment;
use crate::core::types::SearchResultNode;

bitflags::bitflags! {
    /// Significance marks set by thresholding (or stamped upstream when
    /// per-model bit score cutoffs are in effect).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HitFlags: u8 {
        /// Passed the reporting threshold.
        const REPORTED = 1 << 0;
        /// Passed the inclusion threshold. Only ever set together with `REPORTED`.
        const INCLUDED = 1 << 1;
    }
}

/// A single search result at one target location
///
/// A freshly reserved hit is "empty": no identity, zeroed statistics,
/// `start == stop == 1`. The search pipeline fills it in before the list
/// is sorted or reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Target name. Required once the hit is complete.
    pub name: Option<String>,

    /// Target accession
    pub acc: Option<String>,

    /// Target description
    pub desc: Option<String>,

    /// 1-based start on the target. `start > stop` means the reverse strand.
    pub start: i64,

    /// 1-based stop on the target
    pub stop: i64,

    /// Bit score
    pub score: f64,

    /// P-value of `score`
    pub pvalue: f64,

    /// E-value, `pvalue * Z` (see [`crate::TopHits::compute_evalues`])
    pub evalue: f64,

    /// Optimal accuracy score of the alignment
    pub oasc: f64,

    /// Ranking value; larger is better. Conventionally `-evalue`.
    pub sortkey: f64,

    /// Best-scoring start state in the model; passed through untouched
    pub bestr: i32,

    /// Detailed alignment, produced by the alignment stage
    pub ad: Option<Box<Alignment>>,

    pub flags: HitFlags,
}

impl Default for Hit {
    fn default() -> Self {
        Self {
            name: None,
            acc: None,
            desc: None,
            start: 1,
            stop: 1,
            score: 0.0,
            pvalue: 0.0,
            evalue: 0.0,
            oasc: 0.0,
            sortkey: 0.0,
            bestr: 0,
            ad: None,
            flags: HitFlags::empty(),
        }
    }
}

impl Hit {
    /// A complete hit with a name and coordinates; everything else empty.
    pub fn new(name: impl Into<String>, start: i64, stop: i64) -> Self {
        Self {
            name: Some(name.into()),
            start,
            stop,
            ..Self::default()
        }
    }

    /// Copy coordinates and score from an upstream scan result.
    /// Identity fields stay empty.
    #[must_use]
    pub fn from_node(node: &SearchResultNode) -> Self {
        Self {
            start: node.start,
            stop: node.stop,
            bestr: node.bestr,
            score: node.score,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_accession(mut self, acc: impl Into<String>) -> Self {
        self.acc = Some(acc.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    #[must_use]
    pub fn with_stats(mut self, score: f64, pvalue: f64) -> Self {
        self.score = score;
        self.pvalue = pvalue;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, ad: Alignment) -> Self {
        self.ad = Some(Box::new(ad));
        self
    }

    pub fn is_reported(&self) -> bool {
        self.flags.contains(HitFlags::REPORTED)
    }

    pub fn is_included(&self) -> bool {
        self.flags.contains(HitFlags::INCLUDED)
    }

    /// Hit lies on the reverse strand of the target
    pub fn is_reverse(&self) -> bool {
        self.start > self.stop
    }

    /// Strand marker used in tabular output
    pub fn strand(&self) -> char {
        if self.start < self.stop {
            '+'
        } else {
            '-'
        }
    }

    /// Target name, or "" for an incomplete hit
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Accession if present and non-empty
    pub fn accession(&self) -> Option<&str> {
        self.acc.as_deref().filter(|a| !a.is_empty())
    }

    pub fn accession_or_dash(&self) -> &str {
        self.accession().unwrap_or("-")
    }

    pub fn desc_str(&self) -> &str {
        self.desc.as_deref().unwrap_or("")
    }

    /// The label shown in reports: the accession when `show_accessions` is on
    /// and one is available, the name otherwise.
    pub fn shown_name(&self, show_accessions: bool) -> &str {
        match self.accession() {
            Some(acc) if show_accessions => acc,
            _ => self.name_str(),
        }
    }

    /// Number of target residues covered by the hit
    pub fn span(&self) -> i64 {
        (self.stop - self.start).abs() + 1
    }

    /// Mean per-residue optimal accuracy of the alignment
    pub fn accuracy(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)] // Spans are far below 2^52
        let span = self.span() as f64;
        self.oasc / span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let hit = Hit::default();
        assert!(hit.name.is_none());
        assert!(hit.acc.is_none());
        assert!(hit.desc.is_none());
        assert!(hit.ad.is_none());
        assert_eq!(hit.start, 1);
        assert_eq!(hit.stop, 1);
        assert_eq!(hit.flags, HitFlags::empty());
    }

    #[test]
    fn test_from_node_copies_coordinates_only() {
        let node = SearchResultNode {
            start: 500,
            stop: 380,
            bestr: 7,
            score: 42.5,
        };
        let hit = Hit::from_node(&node);
        assert_eq!(hit.start, 500);
        assert_eq!(hit.stop, 380);
        assert_eq!(hit.bestr, 7);
        assert!((hit.score - 42.5).abs() < f64::EPSILON);
        assert!(hit.name.is_none());
        assert!(hit.is_reverse());
    }

    #[test]
    fn test_shown_name_falls_back_to_name() {
        let hit = Hit::new("seq1", 1, 10).with_accession("");
        assert_eq!(hit.shown_name(true), "seq1");

        let hit = Hit::new("seq1", 1, 10).with_accession("RF00001");
        assert_eq!(hit.shown_name(true), "RF00001");
        assert_eq!(hit.shown_name(false), "seq1");
        assert_eq!(hit.accession_or_dash(), "RF00001");
        assert_eq!(Hit::new("x", 1, 2).accession_or_dash(), "-");
    }

    #[test]
    fn test_strand_and_accuracy() {
        let mut hit = Hit::new("seq1", 10, 19);
        assert_eq!(hit.strand(), '+');
        hit.oasc = 9.0;
        assert!((hit.accuracy() - 0.9).abs() < 1e-12);

        let hit = Hit::new("seq1", 19, 10);
        assert_eq!(hit.strand(), '-');
        assert_eq!(hit.span(), 10);
    }
}
