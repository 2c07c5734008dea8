use std::io::{self, Write};

use crate::core::alignment::Alignment;
use crate::core::hit::Hit;
use crate::report::table::{format_g, truncate};
use crate::report::targets::MIN_DESC_WIDTH;
use crate::report::{AlignmentRenderer, ReportError, ReportOptions};
use crate::tophits::TopHits;

/// Write the per-hit detail section: a `>>` header and a one-row hit table for
/// every reported hit, each followed by its alignment when
/// `opts.show_alignments` is set.
///
/// Hit table layout (widths in characters):
///
/// ```text
///     #    score    Evalue cm from   cm to       hit from      hit to     acc
///  ----   ------ --------- ------- -------    ----------- -----------    ----
///     1 !  123.4   6.8e-09       3    1230 [.           1         492 .. 0.90
/// ```
///
/// `[`/`]` mark a range touching the first/last position of the model or
/// target, `.` one that does not.
///
/// # Errors
///
/// Returns `ReportError::Io` if writing fails.
///
/// # Panics
///
/// Panics if `th` is not sorted.
pub fn write_hit_alignments<W: Write>(
    w: &mut W,
    th: &TopHits,
    opts: &ReportOptions,
    renderer: &dyn AlignmentRenderer,
) -> Result<(), ReportError> {
    writeln!(w, "Hit alignments:")?;

    let mut nreported = 0;
    for (rank, hit) in th.iter_ranked().enumerate() {
        if !hit.is_reported() {
            continue;
        }
        debug_assert!(hit.name.is_some(), "reported hit without a name");
        nreported += 1;

        let showname = hit.shown_name(opts.show_accessions);
        match opts.text_width {
            Some(textw) => {
                let descw = MIN_DESC_WIDTH.max(textw.saturating_sub(showname.len() + 5));
                writeln!(w, ">> {showname}  {}", truncate(hit.desc_str(), descw))?;
            }
            None => writeln!(w, ">> {showname}  {}", hit.desc_str())?,
        }

        writeln!(
            w,
            " {:>4} {:>1} {:>6} {:>9} {:>7} {:>7} {:>2} {:>11} {:>11} {:>2} {:>4}",
            "#", "", "score", "Evalue", "cm from", "cm to", "", "hit from", "hit to", "", "acc"
        )?;
        writeln!(
            w,
            " {:>4} {:>1} {:>6} {:>9} {:>7} {:>7} {:>2} {:>11} {:>11} {:>2} {:>4}",
            "----",
            "",
            "------",
            "---------",
            "-------",
            "-------",
            "",
            "-----------",
            "-----------",
            "",
            "----"
        )?;
        write_hit_row(w, rank + 1, hit)?;

        match hit.ad.as_deref() {
            Some(ad) if opts.show_alignments => {
                writeln!(w, "\n  Alignment:")?;
                writeln!(w, "  score: {:.1} bits", hit.score)?;
                renderer.render(w, hit, ad)?;
                writeln!(w)?;
            }
            _ => writeln!(w)?,
        }
    }

    if nreported == 0 {
        writeln!(w, "\n   [No targets detected that satisfy reporting thresholds]")?;
    }

    Ok(())
}

fn write_hit_row<W: Write>(w: &mut W, rank: usize, hit: &Hit) -> io::Result<()> {
    let (cfrom, cto, model_markers) = match hit.ad.as_deref() {
        Some(ad) => (
            ad.cfrom.to_string(),
            ad.cto.to_string(),
            [
                if ad.is_model_start() { '[' } else { '.' },
                if ad.is_model_end() { ']' } else { '.' },
            ],
        ),
        None => ("-".to_string(), "-".to_string(), ['.', '.']),
    };
    let target_markers = target_markers(hit);

    writeln!(
        w,
        " {:>4} {} {:>6.1} {:>9} {:>7} {:>7} {}{} {:>11} {:>11} {}{} {:>4.2}",
        rank,
        if hit.is_included() { '!' } else { '?' },
        hit.score,
        format_g(hit.evalue, 2),
        cfrom,
        cto,
        model_markers[0],
        model_markers[1],
        hit.start,
        hit.stop,
        target_markers[0],
        target_markers[1],
        hit.accuracy()
    )
}

/// Boundary markers for the target range, read in the direction of the hit
fn target_markers(hit: &Hit) -> [char; 2] {
    let target_len = hit.ad.as_deref().map_or(0, |ad| ad.target_len);
    let (first, last) = if hit.is_reverse() {
        (target_len, 1)
    } else {
        (1, target_len)
    };
    [
        if hit.start == first { '[' } else { '.' },
        if target_len > 0 && hit.stop == last { ']' } else { '.' },
    ]
}

/// Prints alignment rows in fixed-width blocks, each block framed by the
/// model and target coordinates it covers.
#[derive(Debug, Clone)]
pub struct PlainAlignmentRenderer {
    pub line_width: usize,
}

impl Default for PlainAlignmentRenderer {
    fn default() -> Self {
        Self { line_width: 60 }
    }
}

impl AlignmentRenderer for PlainAlignmentRenderer {
    fn render(&self, w: &mut dyn Write, hit: &Hit, ad: &Alignment) -> io::Result<()> {
        if !ad.has_rows() {
            return writeln!(w, "  [no alignment available]");
        }

        let width = self.line_width.max(1);
        let len = ad.model.len().min(ad.target.len());
        let step: i64 = if hit.is_reverse() { -1 } else { 1 };
        let coordw = [
            i64::from(ad.cfrom),
            i64::from(ad.cto),
            hit.start,
            hit.stop,
        ]
        .iter()
        .map(|n| n.to_string().len())
        .max()
        .unwrap_or(1);

        let mut mpos = i64::from(ad.cfrom);
        let mut tpos = hit.start;
        let mut offset = 0;
        while offset < len {
            let end = (offset + width).min(len);
            let model = ad.model.get(offset..end).unwrap_or("");
            let mline = ad.mline.get(offset..end).unwrap_or("");
            let target = ad.target.get(offset..end).unwrap_or("");

            let mres = residue_count(model);
            let tres = residue_count(target);
            let mlast = mpos + (mres - 1).max(0);
            let tlast = tpos + step * (tres - 1).max(0);

            writeln!(w, "  {mpos:>coordw$} {model} {mlast}")?;
            writeln!(w, "  {:>coordw$} {mline}", "")?;
            writeln!(w, "  {tpos:>coordw$} {target} {tlast}")?;
            if let Some(pp) = ad.postprob.as_deref() {
                writeln!(w, "  {:>coordw$} {} PP", "", pp.get(offset..end).unwrap_or(""))?;
            }
            writeln!(w)?;

            mpos += mres;
            tpos += step * tres;
            offset = end;
        }
        Ok(())
    }
}

/// Residues in an alignment row; gap characters don't count
fn residue_count(row: &str) -> i64 {
    let n = row
        .bytes()
        .filter(|b| !matches!(b, b'-' | b'.' | b'~'))
        .count();
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hit::HitFlags;

    fn reported_hit(name: &str, start: i64, stop: i64, flags: HitFlags) -> Hit {
        let mut hit = Hit::new(name, start, stop).with_description("5S ribosomal RNA");
        hit.score = 57.84;
        hit.evalue = 3.2e-12;
        hit.sortkey = -hit.evalue;
        hit.oasc = 90.0;
        hit.flags = flags;
        hit
    }

    fn render(th: &TopHits, opts: &ReportOptions) -> String {
        let mut out = Vec::new();
        write_hit_alignments(&mut out, th, opts, &PlainAlignmentRenderer::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_hit_row_layout() {
        let mut ad = Alignment::new(1, 119, 119);
        ad.target_len = 5000;
        let hit = reported_hit("chr3", 1, 100, HitFlags::REPORTED | HitFlags::INCLUDED)
            .with_alignment(ad);
        let mut th = TopHits::new().unwrap();
        th.push(hit).unwrap();
        th.sort();

        let text = render(&th, &ReportOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Hit alignments:");
        assert_eq!(lines[1], ">> chr3  5S ribosomal RNA");
        assert_eq!(
            lines[2],
            "    #   score    Evalue cm from   cm to       hit from      hit to     acc"
        );
        assert_eq!(
            lines[4],
            "    1 !   57.8   3.2e-12       1     119 []           1         100 [. 0.90"
        );
    }

    #[test]
    fn test_reverse_strand_markers() {
        let mut ad = Alignment::new(5, 60, 119);
        ad.target_len = 300;
        let hit = reported_hit("chr3", 300, 201, HitFlags::REPORTED).with_alignment(ad);
        assert_eq!(target_markers(&hit), ['[', '.']);

        let mut ad = Alignment::new(5, 60, 119);
        ad.target_len = 300;
        let hit = reported_hit("chr3", 250, 1, HitFlags::REPORTED).with_alignment(ad);
        assert_eq!(target_markers(&hit), ['.', ']']);
    }

    #[test]
    fn test_missing_alignment_prints_dashes() {
        let mut th = TopHits::new().unwrap();
        th.push(reported_hit("chr1", 10, 19, HitFlags::REPORTED))
            .unwrap();
        th.sort();
        let text = render(&th, &ReportOptions::default());
        let row = text.lines().nth(4).unwrap();
        assert!(row.starts_with("    1 ?   57.8   3.2e-12       -       - .."));
    }

    #[test]
    fn test_alignment_rows_rendered_when_requested() {
        let ad = Alignment::new(1, 12, 12).with_rows("GCCUGGCGGCCG", "GCC:GGCGG:CG", "GCCAGGCGGUCG");
        let hit = reported_hit("chr1", 10, 21, HitFlags::REPORTED | HitFlags::INCLUDED)
            .with_alignment(ad);
        let mut th = TopHits::new().unwrap();
        th.push(hit).unwrap();
        th.sort();

        let quiet = render(&th, &ReportOptions::default());
        assert!(!quiet.contains("Alignment:"));

        let opts = ReportOptions {
            show_alignments: true,
            ..ReportOptions::default()
        };
        let text = render(&th, &opts);
        assert!(text.contains("  Alignment:\n  score: 57.8 bits\n"));
        assert!(text.contains("   1 GCCUGGCGGCCG 12\n"));
        assert!(text.contains("  10 GCCAGGCGGUCG 21\n"));
    }

    #[test]
    fn test_renderer_blocks_and_reverse_coordinates() {
        let ad = Alignment::new(1, 8, 8).with_rows("ACGU-ACG", "AC U AC ", "ACGUUACG");
        let hit = Hit::new("t", 108, 101);
        let renderer = PlainAlignmentRenderer { line_width: 4 };
        let mut out = Vec::new();
        renderer.render(&mut out, &hit, &ad).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    1 ACGU 4");
        assert_eq!(lines[2], "  108 ACGU 105");
        assert_eq!(lines[4], "    5 -ACG 7");
        assert_eq!(lines[6], "  104 UACG 101");
    }

    #[test]
    fn test_no_reported_targets_message() {
        let mut th = TopHits::new().unwrap();
        th.push(reported_hit("chr1", 1, 10, HitFlags::empty())).unwrap();
        th.sort();
        let text = render(&th, &ReportOptions::default());
        assert!(text.contains("[No targets detected that satisfy reporting thresholds]"));
        assert!(!text.contains(">>"));
    }
}
