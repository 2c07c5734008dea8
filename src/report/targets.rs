use std::io::Write;

use crate::report::table::{dashes, format_g, truncate, FieldWidths};
use crate::report::{ReportError, ReportOptions};
use crate::tophits::TopHits;

/// Columns of the hit table other than name and description:
/// 2 + 22+2 + 22+2 + 8+2 + name + 1
const FIXED_COLUMNS: usize = 61;

/// Minimum description width when a line width budget is set
pub const MIN_DESC_WIDTH: usize = 32;

/// Write the ranked table of reported hits.
///
/// A one-time `inclusion threshold` line separates included hits from the
/// reported-only ones that follow them.
///
/// # Errors
///
/// Returns `ReportError::Io` if writing fails.
///
/// # Panics
///
/// Panics if `th` is not sorted.
pub fn write_targets<W: Write + ?Sized>(
    w: &mut W,
    th: &TopHits,
    opts: &ReportOptions,
) -> Result<(), ReportError> {
    let widths = FieldWidths::scan(th, opts.show_accessions).with_minimums(8, 0, 6);
    let namew = widths.name;
    let posw = widths.pos;
    let descw = opts
        .text_width
        .map(|textw| MIN_DESC_WIDTH.max(textw.saturating_sub(namew + FIXED_COLUMNS)));

    writeln!(w, "Hit scores:")?;
    writeln!(
        w,
        "  {:>9} {:>6} {:<namew$} {:>posw$} {:>posw$} {}",
        "E-value",
        " score",
        opts.mode.target_label(),
        "start",
        "end",
        "description"
    )?;
    writeln!(
        w,
        "  {:>9} {:>6} {:<namew$} {:>posw$} {:>posw$} {}",
        "---------",
        "------",
        dashes(namew),
        dashes(posw),
        dashes(posw),
        "----------"
    )?;

    let mut nreported = 0;
    let mut printed_incthresh = false;
    for hit in th.reported() {
        nreported += 1;
        if !hit.is_included() && !printed_incthresh {
            writeln!(w, "  ------ inclusion threshold ------")?;
            printed_incthresh = true;
        }

        let desc = match descw {
            Some(descw) => truncate(hit.desc_str(), descw),
            None => hit.desc_str(),
        };
        writeln!(
            w,
            "{} {:>9} {:>6.1} {:<namew$} {:>posw$} {:>posw$} {}",
            ' ',
            format_g(hit.evalue, 2),
            hit.score,
            hit.shown_name(opts.show_accessions),
            hit.start,
            hit.stop,
            desc
        )?;
    }

    if nreported == 0 {
        writeln!(w, "\n   [No hits detected that satisfy reporting thresholds]")?;
    }

    Ok(())
}
