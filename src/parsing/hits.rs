use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::debug;

use crate::core::alignment::Alignment;
use crate::core::hit::{Hit, HitFlags};
use crate::core::types::SearchResultNode;
use crate::tophits::{TopHits, TopHitsError};
use crate::utils::validation::{check_hit_limit, is_gzipped};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid hit table format: {0}")]
    InvalidFormat(String),

    #[error("Too many hits: {0} exceeds maximum allowed (10000000)")]
    TooManyHits(usize),

    #[error(transparent)]
    Store(#[from] TopHitsError),
}

/// Column names written by [`write_hits`]
pub const HEADER: [&str; 13] = [
    "name",
    "accession",
    "start",
    "stop",
    "score",
    "pvalue",
    "oasc",
    "cm_from",
    "cm_to",
    "cm_len",
    "target_len",
    "flags",
    "description",
];

/// Number of leading columns every row must carry
const REQUIRED_COLUMNS: usize = 6;

/// Parse a hit table file into a fresh, private hit list.
///
/// Files ending in `.gz` or `.bgz` are decompressed on the fly.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read,
/// `ParseError::InvalidFormat` for malformed rows,
/// `ParseError::TooManyHits` if the per-file limit is exceeded, or
/// `ParseError::Store` if the hit list cannot grow.
pub fn parse_hits_file(path: &Path) -> Result<TopHits, ParseError> {
    let file = File::open(path)?;
    let th = if is_gzipped(path) {
        parse_hits_reader(BufReader::new(GzDecoder::new(file)))?
    } else {
        parse_hits_reader(BufReader::new(file))?
    };
    debug!("Parsed {} hits from {}", th.len(), path.display());
    Ok(th)
}

/// Parse hit table text. See [`parse_hits_reader`].
///
/// # Errors
///
/// As for [`parse_hits_reader`].
pub fn parse_hits_text(text: &str) -> Result<TopHits, ParseError> {
    parse_hits_reader(text.as_bytes())
}

/// Parse tab-separated hit rows from `reader`.
///
/// Blank lines and `#` comments are skipped. The first data line is treated
/// as a header if its first field is `name` or `target`. An input with no
/// rows yields an empty list.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row has fewer than six fields or
/// an unparseable value, `ParseError::TooManyHits` if the per-file limit is
/// exceeded, `ParseError::Io` on read failure, or `ParseError::Store` if the
/// hit list cannot grow.
pub fn parse_hits_reader<R: BufRead>(reader: R) -> Result<TopHits, ParseError> {
    let mut th = TopHits::new()?;
    let mut first_data_line = true;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.splitn(HEADER.len(), '\t').collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.trim().to_lowercase()).unwrap_or_default();
            if first == "name" || first == "target" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < REQUIRED_COLUMNS {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than {REQUIRED_COLUMNS} fields"
            )));
        }

        if check_hit_limit(th.len()).is_some() {
            return Err(ParseError::TooManyHits(th.len()));
        }

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Missing target name on line {line_num}"
            )));
        }

        let node = SearchResultNode {
            start: parse_field(fields[2], "start", line_num)?,
            stop: parse_field(fields[3], "stop", line_num)?,
            bestr: 0,
            score: parse_finite(fields[4], "score", line_num)?,
        };
        let pvalue = parse_finite(fields[5], "pvalue", line_num)?;
        let optional = |idx: usize| {
            fields
                .get(idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty() && *s != "-")
        };

        let oasc: Option<f64> = optional(6)
            .map(|s| parse_field(s, "oasc", line_num))
            .transpose()?;
        let cfrom: Option<u32> = optional(7)
            .map(|s| parse_field(s, "cm_from", line_num))
            .transpose()?;
        let cto: Option<u32> = optional(8)
            .map(|s| parse_field(s, "cm_to", line_num))
            .transpose()?;
        let clen: Option<u32> = optional(9)
            .map(|s| parse_field(s, "cm_len", line_num))
            .transpose()?;
        let target_len: Option<i64> = optional(10)
            .map(|s| parse_field(s, "target_len", line_num))
            .transpose()?;
        let flags = optional(11)
            .map(|s| parse_flags(s, line_num))
            .transpose()?
            .unwrap_or_default();
        let desc = fields
            .get(12)
            .copied()
            .filter(|s| !s.is_empty() && *s != "-");

        let hit = th.clone_hit_from(&node)?;
        hit.name = Some(name.to_string());
        hit.acc = optional(1).map(str::to_string);
        hit.desc = desc.map(str::to_string);
        hit.pvalue = pvalue;
        hit.oasc = oasc.unwrap_or(0.0);
        hit.flags = flags;
        if let (Some(cfrom), Some(cto)) = (cfrom, cto) {
            let mut ad = Alignment::new(cfrom, cto, clen.unwrap_or(0));
            ad.target_len = target_len.unwrap_or(0);
            hit.ad = Some(Box::new(ad));
        }
    }

    Ok(th)
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    column: &str,
    line_num: usize,
) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!("Invalid {column} on line {line_num}: '{value}'"))
    })
}

/// Scores and p-values feed the ranking key, so NaN and infinities are refused
fn parse_finite(value: &str, column: &str, line_num: usize) -> Result<f64, ParseError> {
    let x: f64 = parse_field(value, column, line_num)?;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(ParseError::InvalidFormat(format!(
            "Non-finite {column} on line {line_num}: '{value}'"
        )))
    }
}

fn parse_flags(value: &str, line_num: usize) -> Result<HitFlags, ParseError> {
    match value {
        "?" => Ok(HitFlags::REPORTED),
        "!" => Ok(HitFlags::REPORTED | HitFlags::INCLUDED),
        _ => Err(ParseError::InvalidFormat(format!(
            "Invalid flags on line {line_num}: '{value}' (expected '-', '?' or '!')"
        ))),
    }
}

fn flags_symbol(hit: &Hit) -> char {
    if hit.is_included() {
        '!'
    } else if hit.is_reported() {
        '?'
    } else {
        '-'
    }
}

/// Write every hit in `th` in the format read by [`parse_hits_reader`], with
/// a header line.
///
/// Hits are written in rank order when the list is sorted, in insertion order
/// otherwise. Floating point values are written in their shortest exact form,
/// so a written table parses back to the same hits.
///
/// # Errors
///
/// Returns `ParseError::Io` if writing fails.
pub fn write_hits<W: Write>(w: &mut W, th: &TopHits) -> Result<(), ParseError> {
    writeln!(w, "{}", HEADER.join("\t"))?;

    let hits: Box<dyn Iterator<Item = &Hit>> = if th.is_sorted() {
        Box::new(th.iter_ranked())
    } else {
        Box::new(th.iter_unsorted())
    };

    for hit in hits {
        let (cfrom, cto, clen, target_len) = match hit.ad.as_deref() {
            Some(ad) => (
                ad.cfrom.to_string(),
                ad.cto.to_string(),
                ad.clen.to_string(),
                ad.target_len.to_string(),
            ),
            None => ("-".into(), "-".into(), "-".into(), "-".into()),
        };
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            hit.name_str(),
            hit.accession_or_dash(),
            hit.start,
            hit.stop,
            hit.score,
            hit.pvalue,
            hit.oasc,
            cfrom,
            cto,
            clen,
            target_len,
            flags_symbol(hit),
            hit.desc.as_deref().filter(|d| !d.is_empty()).unwrap_or("-")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
# partial results, worker 3
name\taccession\tstart\tstop\tscore\tpvalue\toasc\tcm_from\tcm_to\tcm_len\ttarget_len\tflags\tdescription
chr1\t-\t100\t171\t45.2\t3.1e-9\t70.5\t1\t72\t72\t5000\t-\tpartial tRNA
chr2\tNC_2\t900\t830\t21.0\t0.004

chr3\t-\t5\t40\t10.5\t2.5\t-\t-\t-\t-\t-\t?\t-
";

    #[test]
    fn test_parse_hits_text() {
        let th = parse_hits_text(TABLE).unwrap();
        assert_eq!(th.len(), 3);
        assert!(!th.is_sorted());

        let hits: Vec<&Hit> = th.iter_unsorted().collect();
        assert_eq!(hits[0].name.as_deref(), Some("chr1"));
        assert!(hits[0].acc.is_none());
        assert_eq!(hits[0].desc.as_deref(), Some("partial tRNA"));
        assert_eq!(hits[0].start, 100);
        assert!((hits[0].pvalue - 3.1e-9).abs() < 1e-20);
        let ad = hits[0].ad.as_deref().unwrap();
        assert_eq!((ad.cfrom, ad.cto, ad.clen, ad.target_len), (1, 72, 72, 5000));

        assert_eq!(hits[1].acc.as_deref(), Some("NC_2"));
        assert!(hits[1].is_reverse());
        assert!(hits[1].ad.is_none());
        assert!(hits[1].desc.is_none());

        assert!(hits[2].ad.is_none());
        assert!(hits[2].desc.is_none());
        assert_eq!(hits[2].flags, HitFlags::REPORTED);
    }

    #[test]
    fn test_parse_no_header() {
        let th = parse_hits_text("s1\t-\t1\t10\t5.0\t0.1\n").unwrap();
        assert_eq!(th.len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        let th = parse_hits_text("# nothing here\n\n").unwrap();
        assert!(th.is_empty());
        assert!(th.is_sorted());
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        let err = parse_hits_text("s1\t-\t1\t10\t5.0\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("Line 1")));
    }

    #[test]
    fn test_parse_rejects_bad_numbers_and_flags() {
        let err = parse_hits_text("s1\t-\tone\t10\t5.0\t0.1\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("start")));

        let err = parse_hits_text("s1\t-\t1\t10\t5.0\t0.1\t-\t-\t-\t-\t-\tX\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("flags")));
    }

    #[test]
    fn test_parse_rejects_non_finite_statistics() {
        let err = parse_hits_text("s1\t-\t1\t10\t5.0\tNaN\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("Non-finite pvalue")));

        let err = parse_hits_text("s1\t-\t1\t10\tinf\t0.1\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("Non-finite score")));
    }

    #[test]
    fn test_description_keeps_tabs() {
        let th = parse_hits_text("s1\t-\t1\t10\t5.0\t0.1\t-\t-\t-\t-\t-\t-\ta\tb\n").unwrap();
        let hit = th.iter_unsorted().next().unwrap();
        assert_eq!(hit.desc.as_deref(), Some("a\tb"));
    }

    #[test]
    fn test_write_then_parse_preserves_hits() {
        let mut th = parse_hits_text(TABLE).unwrap();
        th.sort();

        let mut out = Vec::new();
        write_hits(&mut out, &th).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("name\taccession\t"));

        let mut back = parse_hits_text(&text).unwrap();
        back.sort();
        let original: Vec<&Hit> = th.iter_ranked().collect();
        let reread: Vec<&Hit> = back.iter_ranked().collect();
        assert_eq!(original, reread);
    }

    #[test]
    fn test_parse_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits.tsv.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(TABLE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let th = parse_hits_file(&path).unwrap();
        assert_eq!(th.len(), 3);
    }
}
