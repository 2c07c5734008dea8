//! End-to-end scenarios for the hit list: collection, merging, ranking,
//! thresholding and reporting through the public API.

use std::collections::HashSet;

use tophits::report::{write_tabular_targets, write_targets, QueryIdentity, ReportOptions};
use tophits::{
    Cutoff, Hit, HitFlags, SearchResultNode, SignificancePolicy, ThresholdProvenance,
    Thresholds, TopHits,
};

fn hit(name: &str, start: i64, stop: i64, pvalue: f64) -> Hit {
    Hit::new(name, start, stop).with_stats(-pvalue.log10(), pvalue)
}

fn prepared(hits: Vec<Hit>, thresholds: &Thresholds) -> TopHits {
    let mut th = TopHits::new().unwrap();
    for h in hits {
        th.push(h).unwrap();
    }
    th.compute_evalues(1.0);
    th.sort();
    th.threshold(thresholds);
    th
}

#[test]
fn test_report_cutoff_counts_reported_hits() {
    let thresholds = Thresholds {
        report: Cutoff::EValue(1e-2),
        ..Thresholds::default()
    };
    let th = prepared(
        vec![hit("a", 1, 10, 1e-10), hit("b", 1, 10, 1e-3), hit("c", 1, 10, 5.0)],
        &thresholds,
    );

    assert_eq!(th.nreported(), 2);
    // default inclusion cutoff is E <= 0.01
    assert_eq!(th.nincluded(), 2);
    let reported: Vec<&str> = th.reported().map(Hit::name_str).collect();
    assert_eq!(reported, vec!["a", "b"]);
}

#[test]
fn test_included_hits_are_always_reported() {
    let thresholds = Thresholds {
        report: Cutoff::Score(20.0),
        include: Cutoff::EValue(1.0),
        use_bit_cutoffs: false,
    };
    let th = prepared(
        vec![hit("a", 1, 10, 1e-30), hit("b", 1, 10, 1e-3), hit("c", 1, 10, 0.5)],
        &thresholds,
    );

    for h in th.iter_ranked() {
        if h.is_included() {
            assert!(h.is_reported(), "{} included but not reported", h.name_str());
        }
    }
    assert!(th.nincluded() <= th.nreported());
    assert_eq!(th.nreported(), 1);
}

#[test]
fn test_merge_keeps_every_hit_and_ranks_them() {
    let mut a = TopHits::new().unwrap();
    let mut b = TopHits::new().unwrap();
    let mut expected = HashSet::new();
    for i in 0..150 {
        let name = format!("t{i:03}");
        let pvalue = 10f64.powi(-(i % 17));
        let target = if i % 3 == 0 { &mut b } else { &mut a };
        target.push(hit(&name, i64::from(i), i64::from(i + 40), pvalue)).unwrap();
        expected.insert(name);
    }
    let total = a.len() + b.len();

    a.merge(&mut b).unwrap();
    assert!(b.is_empty());
    assert_eq!(a.len(), total);
    assert!(a.is_sorted());

    let merged: HashSet<String> = a.iter_ranked().map(|h| h.name_str().to_string()).collect();
    assert_eq!(merged, expected);

    let ranked: Vec<&Hit> = a.iter_ranked().collect();
    for pair in ranked.windows(2) {
        assert_ne!(
            tophits::hit_order(pair[0], pair[1]),
            std::cmp::Ordering::Greater
        );
    }
}

#[test]
fn test_growth_past_initial_allocation() {
    let mut th = TopHits::new().unwrap();
    for i in 0..256 {
        th.clone_hit_from(&SearchResultNode {
            start: i,
            stop: i + 10,
            bestr: 0,
            score: 1.0,
        })
        .unwrap()
        .name = Some(format!("h{i}"));
    }
    assert_eq!(th.capacity(), 256);

    th.push(hit("last", 1, 2, 0.5)).unwrap();
    assert_eq!(th.len(), 257);
    assert_eq!(th.capacity(), 512);

    th.sort();
    assert_eq!(th.iter_ranked().count(), 257);
}

#[test]
fn test_zero_reported_hits_render_empty_reports() {
    let thresholds = Thresholds {
        report: Cutoff::EValue(1e-50),
        ..Thresholds::default()
    };
    let th = prepared(vec![hit("a", 1, 10, 1e-3)], &thresholds);
    assert_eq!(th.nreported(), 0);

    let mut out = Vec::new();
    write_tabular_targets(&mut out, &QueryIdentity::new("q"), &th, true).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 2);

    let mut out = Vec::new();
    write_targets(&mut out, &th, &ReportOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[No hits detected that satisfy reporting thresholds]"));
}

#[test]
fn test_pre_applied_flags_are_counted_not_derived() {
    let mut th = TopHits::new().unwrap();
    let mut stamped = hit("stamped", 1, 10, 8.0);
    stamped.flags = HitFlags::REPORTED | HitFlags::INCLUDED;
    th.push(stamped).unwrap();
    th.push(hit("strong", 1, 10, 1e-20)).unwrap();
    th.compute_evalues(1.0);
    th.sort();

    let thresholds = Thresholds {
        use_bit_cutoffs: true,
        ..Thresholds::default()
    };
    assert_eq!(thresholds.provenance(), ThresholdProvenance::PreApplied);
    th.threshold(&thresholds);

    assert_eq!(th.nreported(), 1);
    assert_eq!(th.nincluded(), 1);
    assert!(!th.get(0).unwrap().is_reported(), "strong hit was not stamped");
}

#[test]
fn test_reuse_after_report() {
    let mut th = prepared(vec![hit("a", 1, 10, 1e-5)], &Thresholds::default());
    assert_eq!(th.nreported(), 1);

    th.reuse();
    assert!(th.is_empty());
    assert_eq!(th.nreported(), 0);
    th.push(hit("b", 1, 10, 1e-5)).unwrap();
    th.sort();
    assert_eq!(th.get(0).unwrap().name_str(), "b");
}
