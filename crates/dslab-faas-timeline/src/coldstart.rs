//! Cold start detection under a fixed keepalive window.
use crate::timeline::TimelineEntry;

/// Finds cold starts on a dense timeline.
///
/// Instances that were busy at any tick of the last `keepalive` ticks are still warm. Every time concurrency grows
/// beyond the number of warm instances, one cold start per missing instance is reported at the current tick.
pub fn cold_starts(concurrency: &[u32], keepalive: usize) -> Vec<usize> {
    let mut result = Vec::new();
    let mut capacity = 0;
    for (i, &c) in concurrency.iter().enumerate() {
        if i != 0 {
            if c <= concurrency[i - 1] {
                continue;
            }
            capacity = concurrency[i.saturating_sub(keepalive)..i]
                .iter()
                .copied()
                .max()
                .unwrap_or(0);
        }
        while capacity < c {
            result.push(i);
            capacity += 1;
        }
    }
    result
}

/// Finds cold starts on an instance timeline (see [`crate::keepalive::instance_timeline`]): one cold start per
/// instance added by each scale-up.
pub fn instance_cold_starts(instances: &[TimelineEntry]) -> Vec<f64> {
    let mut result = Vec::new();
    let mut alive = 0;
    for entry in instances {
        while alive < entry.concurrency {
            result.push(entry.timestamp);
            alive += 1;
        }
        alive = entry.concurrency;
    }
    result
}
