use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::hit::HitFlags;
use crate::core::types::ThresholdProvenance;
use crate::tophits::store::TopHits;

/// Decides which hits are significant enough to report and to include.
pub trait SignificancePolicy {
    /// Whether a hit with this score and E-value is reported
    fn reportable(&self, score: f64, evalue: f64) -> bool;

    /// Whether a reported hit with this score and E-value is included.
    /// Only ever asked about reportable hits.
    fn includable(&self, score: f64, evalue: f64) -> bool;

    /// Whether flags are to be derived from the predicates above, or were
    /// already stamped on each hit during the scan.
    fn provenance(&self) -> ThresholdProvenance {
        ThresholdProvenance::PolicyDerived
    }
}

/// A single significance cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cutoff {
    /// Pass if the E-value is at most this
    #[serde(rename = "evalue")]
    EValue(f64),
    /// Pass if the bit score is at least this
    Score(f64),
}

impl Cutoff {
    pub fn passes(self, score: f64, evalue: f64) -> bool {
        match self {
            Self::EValue(max) => evalue <= max,
            Self::Score(min) => score >= min,
        }
    }
}

/// Default reporting E-value cutoff
pub const DEFAULT_REPORT_EVALUE: f64 = 10.0;

/// Default inclusion E-value cutoff
pub const DEFAULT_INCLUDE_EVALUE: f64 = 0.01;

/// Reporting and inclusion thresholds for a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Cutoff for reporting a hit
    pub report: Cutoff,
    /// Cutoff for including a reported hit
    pub include: Cutoff,
    /// Per-model bit score cutoffs were applied during the scan, so the hits
    /// already carry their flags
    pub use_bit_cutoffs: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            report: Cutoff::EValue(DEFAULT_REPORT_EVALUE),
            include: Cutoff::EValue(DEFAULT_INCLUDE_EVALUE),
            use_bit_cutoffs: false,
        }
    }
}

impl SignificancePolicy for Thresholds {
    fn reportable(&self, score: f64, evalue: f64) -> bool {
        self.report.passes(score, evalue)
    }

    fn includable(&self, score: f64, evalue: f64) -> bool {
        self.include.passes(score, evalue)
    }

    fn provenance(&self) -> ThresholdProvenance {
        if self.use_bit_cutoffs {
            ThresholdProvenance::PreApplied
        } else {
            ThresholdProvenance::PolicyDerived
        }
    }
}

impl TopHits {
    /// Mark REPORTED and INCLUDED hits, then count them.
    ///
    /// With pre-applied flags nothing is re-derived; the flags already on the
    /// hits are only counted. Otherwise any flags a hit carries are replaced by
    /// the ones the policy derives.
    pub fn threshold<P: SignificancePolicy + ?Sized>(&mut self, policy: &P) {
        let provenance = policy.provenance();
        if provenance == ThresholdProvenance::PolicyDerived {
            for hit in &mut self.unsrt {
                hit.flags.remove(HitFlags::REPORTED | HitFlags::INCLUDED);
                if policy.reportable(hit.score, hit.evalue) {
                    hit.flags |= HitFlags::REPORTED;
                    if policy.includable(hit.score, hit.evalue) {
                        hit.flags |= HitFlags::INCLUDED;
                    }
                }
            }
        } else {
            debug!("flags pre-applied during the scan; counting only");
        }

        self.nreported = self.unsrt.iter().filter(|h| h.is_reported()).count();
        self.nincluded = self.unsrt.iter().filter(|h| h.is_included()).count();

        info!(
            total = self.unsrt.len(),
            reported = self.nreported,
            included = self.nincluded,
            ?provenance,
            "thresholded hit list"
        );
    }
}
