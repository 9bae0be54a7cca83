//! Projection of invocation concurrency onto the number of live instances under a fixed keepalive window.
use crate::query::{exceeds_over_range, exceeds_until};
use crate::timeline::TimelineEntry;

/// Converts a merged concurrency timeline into a timeline of live instances.
///
/// A scale-up creates instances immediately unless enough instances were busy during `[t - keepalive, t)`.
/// A scale-down is delayed by `keepalive` and dropped if more capacity is needed again within `(t, t + keepalive]`;
/// it is then produced by the later scale-down instead. The number of instances never falls below the number of
/// running invocations.
pub fn instance_timeline(timeline: &[TimelineEntry], keepalive: f64) -> Vec<TimelineEntry> {
    let mut result = Vec::new();
    for (i, entry) in timeline.iter().enumerate() {
        if i != 0 && entry.concurrency <= timeline[i - 1].concurrency {
            let ts = entry.timestamp;
            if !exceeds_until(timeline, ts, ts + keepalive, entry.concurrency) {
                result.push(TimelineEntry::new(ts + keepalive, entry.concurrency));
            }
        } else if !exceeds_over_range(
            timeline,
            entry.timestamp - keepalive,
            entry.timestamp,
            entry.concurrency - 1,
        ) {
            result.push(*entry);
        }
    }
    result
}
