//! Concurrency timelines built from invocation traces.
use std::time::Duration;

use crate::error::{AnalysisError, Result};
use crate::trace::{FunctionTrace, MAX_EXEC_TIME_MS};

/// Point of a sparse timeline.
///
/// Before [`merge_events`] `concurrency` is a delta (+1 on invocation start, -1 on its end), afterwards it is the
/// number of running invocations at and after `timestamp`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineEntry {
    pub timestamp: f64,
    pub concurrency: i64,
}

impl TimelineEntry {
    pub fn new(timestamp: f64, concurrency: i64) -> Self {
        Self { timestamp, concurrency }
    }
}

/// Time-weighted mean of a step function over `[timestamp, timestamp + granularity)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvgTimelineEntry {
    pub timestamp: f64,
    pub value: f64,
}

/// Number of discretization ticks in one millisecond.
pub fn ticks_per_milli(granularity: Duration) -> Result<usize> {
    let nanos = granularity.as_nanos();
    if nanos == 0 || 1_000_000 % nanos != 0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "granularity {:?} does not divide one millisecond",
            granularity
        )));
    }
    Ok((1_000_000 / nanos) as usize)
}

/// Builds dense timeline: slot `t` holds the number of invocations running during tick `t`.
///
/// The array covers `duration` minutes plus the longest possible invocation, so invocations starting near the end
/// of the observed window are never cut.
pub fn function_timeline(trace: &FunctionTrace, duration: usize, granularity: Duration) -> Result<Vec<u32>> {
    trace.validate(duration)?;
    let per_milli = ticks_per_milli(granularity)?;
    let per_second = per_milli * 1000;
    let per_minute = per_second * 60;
    let mut concurrency = vec![0u32; duration * per_minute + MAX_EXEC_TIME_MS as usize * per_milli];
    for inv in trace.invocation_iter(duration) {
        // validated gaps may exceed a minute only by rounding error
        let start = (inv.minute * per_minute + (inv.offset * per_second as f64) as usize)
            .min((inv.minute + 1) * per_minute);
        let len = inv.spec.runtime as usize * per_milli;
        for slot in &mut concurrency[start..start + len] {
            *slot += 1;
        }
    }
    Ok(concurrency)
}

/// Builds unsorted start/end events of all invocations, stretching execution durations by `slowdown`.
pub fn function_events(trace: &FunctionTrace, duration: usize, slowdown: f64) -> Result<Vec<TimelineEntry>> {
    trace.validate(duration)?;
    let mut events = Vec::with_capacity(2 * trace.total_invocations());
    for inv in trace.invocation_iter(duration) {
        let len = inv.spec.runtime as f64 / 1000. * slowdown;
        if len <= 0. {
            continue;
        }
        let start = (inv.minute * 60) as f64 + inv.offset;
        events.push(TimelineEntry::new(start, 1));
        events.push(TimelineEntry::new(start + len, -1));
    }
    Ok(events)
}

/// Sorts delta events and replaces deltas with running concurrency.
///
/// Events with equal timestamps are ordered by delta, so invocation ends are applied before simultaneous starts.
pub fn merge_events(mut events: Vec<TimelineEntry>) -> Vec<TimelineEntry> {
    events.sort_by(|x, y| {
        x.timestamp
            .total_cmp(&y.timestamp)
            .then(x.concurrency.cmp(&y.concurrency))
    });
    let mut concurrency = 0;
    for entry in events.iter_mut() {
        concurrency += entry.concurrency;
        entry.concurrency = concurrency;
    }
    events
}

/// Builds sparse concurrency step function of a function.
pub fn function_timeline_compressed(
    trace: &FunctionTrace,
    duration: usize,
    slowdown: f64,
) -> Result<Vec<TimelineEntry>> {
    Ok(merge_events(function_events(trace, duration, slowdown)?))
}
