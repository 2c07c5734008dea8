//! Column width scans and number formatting shared by the renderers.

use crate::tophits::TopHits;

/// Widest content of each variable-width column, floored at per-report minimums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    pub name: usize,
    pub acc: usize,
    pub pos: usize,
}

impl FieldWidths {
    /// Scan every hit in the list (reported or not).
    ///
    /// `shown` selects the accession display width for the name column: the
    /// accession where one is set, the name otherwise.
    pub fn scan(th: &TopHits, shown: bool) -> Self {
        Self {
            name: if shown {
                th.max_shown_len()
            } else {
                th.max_name_len()
            },
            acc: th.max_accession_len(),
            pos: th.max_position_width(),
        }
    }

    #[must_use]
    pub fn with_minimums(self, name: usize, acc: usize, pos: usize) -> Self {
        Self {
            name: self.name.max(name),
            acc: self.acc.max(acc),
            pos: self.pos.max(pos),
        }
    }
}

/// A ruler of `n` dashes
pub fn dashes(n: usize) -> String {
    "-".repeat(n)
}

/// At most `max` characters of `s`
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Format like C's `%.{precision}g`: `precision` significant digits, fixed or
/// exponent notation depending on magnitude, trailing zeros removed.
///
/// # Examples
///
/// ```
/// use tophits::report::table::format_g;
///
/// assert_eq!(format_g(6.8e-9, 2), "6.8e-09");
/// assert_eq!(format_g(0.0012, 2), "0.0012");
/// assert_eq!(format_g(5.0, 2), "5");
/// assert_eq!(format_g(123.0, 2), "1.2e+02");
/// ```
pub fn format_g(value: f64, precision: usize) -> String {
    let p = precision.max(1);

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to `p` digits can carry into the next decade (9.96 -> 1.0e1),
    // so the exponent is read back from the rounded form.
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    let p = i32::try_from(p).unwrap_or(i32::MAX);
    if exp < -4 || exp >= p {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    } else {
        #[allow(clippy::cast_sign_loss)] // exp < p here
        let decimals = (p - 1 - exp) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
