/// Detailed alignment of a hit, produced by the alignment stage.
///
/// The hit list owns these for lifetime purposes only. Reports read the model
/// coordinates for the hit tables and hand the whole record to an
/// [`crate::report::AlignmentRenderer`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alignment {
    /// First model position in the alignment (1-based)
    pub cfrom: u32,

    /// Last model position in the alignment
    pub cto: u32,

    /// Model length; 0 if unknown
    pub clen: u32,

    /// Length of the target sequence; 0 if unknown
    pub target_len: i64,

    /// Model consensus row
    pub model: String,

    /// Match annotation row
    pub mline: String,

    /// Target residue row
    pub target: String,

    /// Posterior probability annotation row
    pub postprob: Option<String>,
}

impl Alignment {
    pub fn new(cfrom: u32, cto: u32, clen: u32) -> Self {
        Self {
            cfrom,
            cto,
            clen,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rows(
        mut self,
        model: impl Into<String>,
        mline: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.model = model.into();
        self.mline = mline.into();
        self.target = target.into();
        self
    }

    /// Whether the alignment starts at the first model position
    pub fn is_model_start(&self) -> bool {
        self.cfrom == 1
    }

    /// Whether the alignment reaches the last model position
    pub fn is_model_end(&self) -> bool {
        self.clen > 0 && self.cto == self.clen
    }

    /// Whether display rows are present
    pub fn has_rows(&self) -> bool {
        !self.model.is_empty() && !self.target.is_empty()
    }
}
