mod common;
use common::{assert_timeline_eq, make_trace};

use std::time::Duration;

use dslab_faas_timeline::error::AnalysisError;
use dslab_faas_timeline::query::max_over_range;
use dslab_faas_timeline::timeline::{function_timeline, function_timeline_compressed, merge_events, TimelineEntry};

const MS: Duration = Duration::from_millis(1);
const TENTH_MS: Duration = Duration::from_micros(100);

#[test]
fn test_single_invocation() {
    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![1]]);
    let timeline = function_timeline(&trace, 1, MS).unwrap();
    assert_eq!(timeline.len(), 60_000 + 60_000);
    assert_eq!(timeline[0], 1);
    assert_eq!(timeline[1], 0);
    assert_eq!(timeline[60], 0);
    assert_eq!(timeline[60_000], 0);

    let timeline = function_timeline(&trace, 1, TENTH_MS).unwrap();
    assert_eq!(timeline.len(), 600_000 + 600_000);
    assert_eq!(timeline[0], 1);
    assert_eq!(timeline[9], 1);
    assert_eq!(timeline[10], 0);
}

#[test]
fn test_long_invocation() {
    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![1000]]);
    let timeline = function_timeline(&trace, 1, MS).unwrap();
    assert_eq!(timeline[0], 1);
    assert_eq!(timeline[999], 1);
    assert_eq!(timeline[1000], 0);

    let timeline = function_timeline(&trace, 1, TENTH_MS).unwrap();
    assert_eq!(timeline[9999], 1);
    assert_eq!(timeline[10000], 0);
}

#[test]
fn test_two_invocations() {
    let trace = make_trace(vec![vec![0., 10_000., 60_000_000. - 10_000.]], vec![vec![1, 1]]);
    let timeline = function_timeline(&trace, 1, MS).unwrap();
    assert_eq!(&timeline[0..12], &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0]);

    let timeline = function_timeline(&trace, 1, TENTH_MS).unwrap();
    assert_eq!(timeline[0], 1);
    assert_eq!(timeline[10], 0);
    assert_eq!(timeline[99], 0);
    assert_eq!(timeline[100], 1);
    assert_eq!(timeline[110], 0);
}

#[test]
fn test_two_overlapping_invocations() {
    let trace = make_trace(vec![vec![0., 10_000., 60_000_000. - 10_000.]], vec![vec![100, 100]]);
    let timeline = function_timeline(&trace, 1, MS).unwrap();
    assert_eq!(timeline[9], 1);
    assert_eq!(timeline[10], 2);
    assert_eq!(timeline[99], 2);
    assert_eq!(timeline[100], 1);
    assert_eq!(timeline[110], 0);
}

#[test]
fn test_residual_gap_is_not_invocation() {
    // minute 0 has no invocations, minute 1 has one
    let trace = make_trace(vec![vec![60_000_000.], vec![500_000., 59_500_000.]], vec![vec![], vec![2]]);
    assert_eq!(trace.invocations, vec![0, 1]);
    let timeline = function_timeline(&trace, 2, MS).unwrap();
    assert_eq!(timeline.iter().map(|x| *x as usize).sum::<usize>(), 2);
    assert_eq!(timeline[60_500], 1);
    assert_eq!(timeline[60_501], 1);
    assert_eq!(timeline[60_502], 0);
    let sparse = function_timeline_compressed(&trace, 2, 1.).unwrap();
    assert_timeline_eq(&sparse, &[(60.5, 1), (60.502, 0)]);
}

#[test]
fn test_invocation_past_window_end() {
    let trace = make_trace(vec![vec![59_000_000., 1_000_000.]], vec![vec![60_000]]);
    let timeline = function_timeline(&trace, 1, MS).unwrap();
    assert_eq!(timeline[58_999], 0);
    assert_eq!(timeline[59_000], 1);
    assert_eq!(timeline[118_999], 1);
    assert_eq!(timeline[119_000], 0);
}

#[test]
fn test_padding_runtime_entry() {
    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![5, 0]]);
    let timeline = function_timeline(&trace, 1, MS).unwrap();
    assert_eq!(timeline[4], 1);
    assert_eq!(timeline[5], 0);
}

#[test]
fn test_malformed_traces() {
    let trace = make_trace(vec![vec![0., 10., 60_000_000.]], vec![vec![1]]);
    assert!(matches!(
        function_timeline(&trace, 1, MS),
        Err(AnalysisError::MalformedTrace { minute: 0, .. })
    ));

    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![1]]);
    assert!(matches!(
        function_timeline_compressed(&trace, 2, 1.),
        Err(AnalysisError::TraceTooShort {
            available: 1,
            required: 2,
            ..
        })
    ));

    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![60_001]]);
    assert!(matches!(
        function_timeline(&trace, 1, MS),
        Err(AnalysisError::RuntimeTooLong { runtime: 60_001, .. })
    ));

    let trace = make_trace(vec![vec![40_000_000., 40_000_000., 0.]], vec![vec![1, 1]]);
    assert!(matches!(
        function_timeline(&trace, 1, MS),
        Err(AnalysisError::MalformedTrace { .. })
    ));

    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![1]]);
    assert!(matches!(
        function_timeline(&trace, 1, Duration::from_micros(300)),
        Err(AnalysisError::InvalidConfig(_))
    ));
}

#[test]
fn test_compressed_timeline() {
    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![1]]);
    assert_timeline_eq(
        &function_timeline_compressed(&trace, 1, 1.).unwrap(),
        &[(0., 1), (1e-3, 0)],
    );
    assert_timeline_eq(
        &function_timeline_compressed(&trace, 1, 1.5).unwrap(),
        &[(0., 1), (1.5e-3, 0)],
    );

    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![1000]]);
    assert_timeline_eq(&function_timeline_compressed(&trace, 1, 1.).unwrap(), &[(0., 1), (1., 0)]);

    let trace = make_trace(vec![vec![0., 10_000., 60_000_000. - 10_000.]], vec![vec![1, 1]]);
    assert_timeline_eq(
        &function_timeline_compressed(&trace, 1, 1.).unwrap(),
        &[(0., 1), (1e-3, 0), (10e-3, 1), (11e-3, 0)],
    );

    let trace = make_trace(vec![vec![0., 10_000., 60_000_000. - 10_000.]], vec![vec![100, 100]]);
    assert_timeline_eq(
        &function_timeline_compressed(&trace, 1, 1.).unwrap(),
        &[(0., 1), (10e-3, 2), (100e-3, 1), (110e-3, 0)],
    );
}

#[test]
fn test_simultaneous_invocations() {
    let trace = make_trace(vec![vec![0., 0., 60_000_000. - 10_000.]], vec![vec![100, 100]]);
    assert_timeline_eq(
        &function_timeline_compressed(&trace, 1, 1.).unwrap(),
        &[(0., 1), (0., 2), (100e-3, 1), (100e-3, 0)],
    );
}

#[test]
fn test_end_before_simultaneous_start() {
    let events = vec![
        TimelineEntry::new(1., 1),
        TimelineEntry::new(2., -1),
        TimelineEntry::new(0., 1),
        TimelineEntry::new(1., -1),
    ];
    let merged = merge_events(events);
    assert_timeline_eq(&merged, &[(0., 1), (1., 0), (1., 1), (2., 0)]);
    assert!(merged.iter().all(|e| e.concurrency >= 0));
    assert_eq!(max_over_range(&merged, 1.5, 1.6), 1);
}

#[test]
fn test_zero_slowdown_gives_empty_timeline() {
    let trace = make_trace(vec![vec![0., 60_000_000.]], vec![vec![10]]);
    assert!(function_timeline_compressed(&trace, 1, 0.).unwrap().is_empty());
}

#[test]
fn test_dense_matches_sparse() {
    let trace = make_trace(
        vec![vec![0., 5_000., 3_000., 0., 60_000_000. - 8_000.], vec![60_000_000.]],
        vec![vec![10, 4, 7, 2], vec![]],
    );
    let dense = function_timeline(&trace, 2, MS).unwrap();
    let sparse = function_timeline_compressed(&trace, 2, 1.).unwrap();
    for (t, &value) in dense.iter().enumerate().take(30) {
        let start = (t as f64 + 0.5) / 1000.;
        assert_eq!(max_over_range(&sparse, start, start + 1e-4), value as i64, "tick {}", t);
    }
    assert_eq!(dense[8], 4);
    assert_eq!(dense[9], 3);
}

#[test]
fn test_dense_matches_sparse_on_tick_boundaries() {
    let trace = make_trace(vec![vec![0., 10_000., 60_000_000. - 10_000.]], vec![vec![1, 1]]);
    let dense = function_timeline(&trace, 1, MS).unwrap();
    let sparse = function_timeline_compressed(&trace, 1, 1.).unwrap();
    for t in [0, 1, 2, 9, 10] {
        let start = t as f64 / 1000.;
        let end = (t + 1) as f64 / 1000.;
        assert_eq!(max_over_range(&sparse, start, end), dense[t] as i64, "tick {}", t);
    }
    assert_eq!(dense[1], 0);
    assert_eq!(max_over_range(&sparse, 0.001, 0.002), 0);
}
