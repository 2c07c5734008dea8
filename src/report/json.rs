use std::io::Write;

use serde_json::json;

use crate::core::hit::Hit;
use crate::report::{QueryIdentity, ReportError};
use crate::tophits::TopHits;

fn hit_json(rank: usize, hit: &Hit) -> serde_json::Value {
    let mut value = json!({
        "rank": rank,
        "name": hit.name_str(),
        "accession": hit.accession(),
        "description": hit.desc.as_deref(),
        "start": hit.start,
        "stop": hit.stop,
        "strand": hit.strand().to_string(),
        "score": hit.score,
        "pvalue": hit.pvalue,
        "evalue": hit.evalue,
        "reported": hit.is_reported(),
        "included": hit.is_included(),
    });

    if let Some(ad) = hit.ad.as_deref() {
        value["cm_from"] = json!(ad.cfrom);
        value["cm_to"] = json!(ad.cto);
    }

    value
}

/// Write the reported hits, in rank order, as a pretty-printed JSON object.
///
/// # Errors
///
/// Returns `ReportError::Json` if serialization fails, `ReportError::Io` if
/// writing fails.
///
/// # Panics
///
/// Panics if `th` is not sorted.
pub fn write_json<W: Write>(
    w: &mut W,
    query: &QueryIdentity,
    th: &TopHits,
) -> Result<(), ReportError> {
    let hits: Vec<serde_json::Value> = th
        .iter_ranked()
        .enumerate()
        .filter(|(_, hit)| hit.is_reported())
        .map(|(i, hit)| hit_json(i + 1, hit))
        .collect();

    let output = json!({
        "query": {
            "name": query.name,
            "accession": query.acc,
        },
        "nreported": th.nreported(),
        "nincluded": th.nincluded(),
        "hits": hits,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}
