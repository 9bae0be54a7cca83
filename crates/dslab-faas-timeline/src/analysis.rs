//! Per-function analysis chains.
use log::debug;

use crate::average::average_timeline;
use crate::coldstart::{cold_starts, instance_cold_starts};
use crate::config::{AnalysisConfig, AnalysisKind};
use crate::error::Result;
use crate::keepalive::instance_timeline;
use crate::output::Record;
use crate::timeline::{function_timeline, function_timeline_compressed};
use crate::trace::FunctionTrace;

/// Runs the analysis selected by `config` on a single function. Records are tagged with `function` and come out in
/// non-decreasing timestamp order.
pub fn analyze_function(function: usize, trace: &FunctionTrace, config: &AnalysisConfig) -> Result<Vec<Record>> {
    let records: Vec<Record> = match config.kind {
        AnalysisKind::ColdStart => {
            let per_second = config.ticks_per_second()? as f64;
            let timeline = function_timeline(trace, config.duration, config.granularity())?;
            cold_starts(&timeline, config.keepalive_ticks()?)
                .into_iter()
                .map(|tick| Record::ColdStart {
                    timestamp: tick as f64 / per_second,
                    function,
                })
                .collect()
        }
        AnalysisKind::Cpu => {
            let timeline = function_timeline_compressed(trace, config.duration, config.slowdown)?;
            average_timeline(&timeline, config.averaging_granularity)
                .into_iter()
                .map(|x| Record::Cpu {
                    timestamp: x.timestamp,
                    function,
                    cpu: x.value,
                })
                .collect()
        }
        AnalysisKind::Memory => {
            let timeline = function_timeline_compressed(trace, config.duration, config.slowdown)?;
            let instances = instance_timeline(&timeline, config.keepalive);
            average_timeline(&instances, config.averaging_granularity)
                .into_iter()
                .map(|x| Record::Memory {
                    timestamp: x.timestamp,
                    function,
                    instances: x.value,
                })
                .collect()
        }
        AnalysisKind::InstanceColdStart => {
            let timeline = function_timeline_compressed(trace, config.duration, config.slowdown)?;
            let instances = instance_timeline(&timeline, config.keepalive);
            instance_cold_starts(&instances)
                .into_iter()
                .map(|timestamp| Record::ColdStart { timestamp, function })
                .collect()
        }
    };
    debug!(
        "function {} ({}): {} invocations, {} {} records",
        function,
        trace.name,
        trace.total_invocations(),
        records.len(),
        config.kind
    );
    Ok(records)
}
