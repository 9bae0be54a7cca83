//! Range queries over merged sparse timelines.
use crate::timeline::TimelineEntry;

/// Index of the entry whose level is in effect at `time`: the last entry at or before `time`, or the first entry if
/// the timeline starts later.
fn level_at(timeline: &[TimelineEntry], time: f64) -> usize {
    timeline.partition_point(|e| e.timestamp <= time).saturating_sub(1)
}

fn max_in(timeline: &[TimelineEntry], low: usize, high: usize) -> i64 {
    if low >= high {
        return 0;
    }
    timeline[low..high].iter().map(|e| e.concurrency).max().unwrap_or(0).max(0)
}

/// Computes max concurrency over `[start, end)`.
pub fn max_over_range(timeline: &[TimelineEntry], start: f64, end: f64) -> i64 {
    let high = timeline.partition_point(|e| e.timestamp < end);
    max_in(timeline, level_at(timeline, start), high)
}

/// Checks whether concurrency over `[start, end)` is ever strictly greater than `threshold`.
pub fn exceeds_over_range(timeline: &[TimelineEntry], start: f64, end: f64, threshold: i64) -> bool {
    let high = timeline.partition_point(|e| e.timestamp < end);
    let low = level_at(timeline, start);
    low < high && timeline[low..high].iter().any(|e| e.concurrency > threshold)
}

/// Checks whether concurrency over `(start, end]` is ever strictly greater than `threshold`.
pub fn exceeds_until(timeline: &[TimelineEntry], start: f64, end: f64, threshold: i64) -> bool {
    let high = timeline.partition_point(|e| e.timestamp <= end);
    let low = level_at(timeline, start);
    low < high && timeline[low..high].iter().any(|e| e.concurrency > threshold)
}
