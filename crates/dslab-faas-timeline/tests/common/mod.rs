#![allow(dead_code)]

use dslab_faas_timeline::timeline::TimelineEntry;
use dslab_faas_timeline::trace::{FunctionTrace, RuntimeSpecification};

pub fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!(x > y - eps && x < y + eps, "{} != {}", x, y);
}

/// Builds a trace from IAT rows (microseconds) and runtime rows (milliseconds).
pub fn make_trace(iat: Vec<Vec<f64>>, runtime: Vec<Vec<u64>>) -> FunctionTrace {
    let runtime = runtime
        .into_iter()
        .map(|row| row.into_iter().map(|x| RuntimeSpecification::new(x, 1)).collect())
        .collect();
    FunctionTrace::new("f", iat, runtime)
}

pub fn make_timeline(points: &[(f64, i64)]) -> Vec<TimelineEntry> {
    points.iter().map(|&(t, c)| TimelineEntry::new(t, c)).collect()
}

pub fn assert_timeline_eq(result: &[TimelineEntry], expected: &[(f64, i64)]) {
    assert_eq!(result.len(), expected.len(), "{:?} vs {:?}", result, expected);
    for (entry, &(t, c)) in result.iter().zip(expected) {
        assert_float_eq(entry.timestamp, t, 1e-9);
        assert_eq!(entry.concurrency, c, "{:?} vs {:?}", result, expected);
    }
}
