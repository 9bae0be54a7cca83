//! Averaging of sparse timelines over fixed-size intervals.
use crate::timeline::{AvgTimelineEntry, TimelineEntry};

/// Integrates a merged step function over consecutive buckets of `granularity` seconds.
///
/// Buckets are aligned to multiples of `granularity` and cover the timeline up to its last entry. Empty timeline
/// produces no buckets.
pub fn average_timeline(timeline: &[TimelineEntry], granularity: f64) -> Vec<AvgTimelineEntry> {
    if timeline.is_empty() {
        return Vec::new();
    }
    let min_time = timeline[0].timestamp;
    let max_time = timeline[timeline.len() - 1].timestamp;
    let mut curr_time = (min_time / granularity).floor() * granularity;
    let mut interval_end = curr_time + granularity;
    let mut prev_time = curr_time;
    let mut concurrency = 0;
    let mut i = 0;
    let mut result = Vec::with_capacity(((max_time - curr_time) / granularity) as usize + 1);
    while curr_time <= max_time {
        let mut area = 0.;
        while i < timeline.len() && timeline[i].timestamp <= interval_end {
            area += concurrency as f64 * (timeline[i].timestamp - prev_time);
            concurrency = timeline[i].concurrency;
            prev_time = timeline[i].timestamp;
            i += 1;
        }
        area += concurrency as f64 * (interval_end - prev_time);
        prev_time = interval_end;
        result.push(AvgTimelineEntry {
            timestamp: curr_time,
            value: area / granularity,
        });
        curr_time = interval_end;
        interval_end += granularity;
    }
    result
}
