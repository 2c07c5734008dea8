use std::io::Write;

use crate::report::table::{dashes, format_g, FieldWidths};
use crate::report::ReportError;
use crate::tophits::TopHits;

/// Name and optional accession of the query that produced a hit list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryIdentity {
    pub name: String,
    pub acc: Option<String>,
}

impl QueryIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            acc: None,
        }
    }

    #[must_use]
    pub fn with_accession(mut self, acc: impl Into<String>) -> Self {
        self.acc = Some(acc.into());
        self
    }

    fn accession_or_dash(&self) -> &str {
        match self.acc.as_deref() {
            Some(acc) if !acc.is_empty() => acc,
            _ => "-",
        }
    }
}

/// Write one whitespace-delimited row per reported hit, in rank order.
///
/// Output from several queries or lists can be concatenated; pass
/// `show_header = false` for every block after the first. Name columns are
/// at least 20 wide, accession columns 10 and position columns 8.
///
/// # Errors
///
/// Returns `ReportError::Io` if writing fails.
///
/// # Panics
///
/// Panics if `th` is not sorted.
pub fn write_tabular_targets<W: Write + ?Sized>(
    w: &mut W,
    query: &QueryIdentity,
    th: &TopHits,
    show_header: bool,
) -> Result<(), ReportError> {
    let widths = FieldWidths::scan(th, false).with_minimums(20, 10, 8);
    let tnamew = widths.name;
    let taccw = widths.acc;
    let posw = widths.pos;
    let qnamew = query.name.len().max(20);
    let qaccw = query.acc.as_deref().map_or(10, |acc| acc.len().max(10));

    if show_header {
        let hnamew = tnamew - 1;
        writeln!(
            w,
            "#{:<hnamew$} {:<taccw$} {:<qnamew$} {:<qaccw$} {:<7} {:<7} {:>posw$} {:>posw$} {:>9} {:>6} {:>5} {}",
            " target name",
            "accession",
            "query name",
            "accession",
            "cm from",
            "cm to",
            "hit from",
            "hit to",
            "E-value",
            "score",
            "strand",
            "description of target"
        )?;
        writeln!(
            w,
            "#{:<hnamew$} {:<taccw$} {:<qnamew$} {:<qaccw$} {:<7} {:<7} {:>posw$} {:>posw$} {:>9} {:>6} {:>5} {}",
            dashes(hnamew),
            dashes(taccw),
            dashes(qnamew),
            dashes(qaccw),
            "-------",
            "-------",
            dashes(posw),
            dashes(posw),
            "---------",
            "------",
            "-----",
            "---------------------"
        )?;
    }

    for hit in th.reported() {
        let (cfrom, cto) = match hit.ad.as_deref() {
            Some(ad) => (ad.cfrom.to_string(), ad.cto.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        writeln!(
            w,
            "{:<tnamew$} {:<taccw$} {:<qnamew$} {:<qaccw$} {:>7} {:>7} {:>posw$} {:>posw$} {:>9} {:>6.1} {:>6} {}",
            hit.name_str(),
            hit.accession_or_dash(),
            query.name,
            query.accession_or_dash(),
            cfrom,
            cto,
            hit.start,
            hit.stop,
            format_g(hit.evalue, 2),
            hit.score,
            format!("   {}  ", hit.strand()),
            hit.desc_str()
        )?;
    }

    Ok(())
}
