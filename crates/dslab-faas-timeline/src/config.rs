use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::timeline::ticks_per_milli;

/// Type of analysis performed for every function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisKind {
    /// Cold starts on dense timeline.
    #[serde(rename = "coldstart")]
    ColdStart,
    /// Average concurrency of invocations.
    #[serde(rename = "cpu")]
    Cpu,
    /// Average number of live instances under keepalive policy.
    #[serde(rename = "memory")]
    Memory,
    /// Cold starts on instance timeline.
    #[serde(rename = "instance-coldstart")]
    InstanceColdStart,
}

impl FromStr for AnalysisKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "coldstart" => Ok(Self::ColdStart),
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            "instance-coldstart" => Ok(Self::InstanceColdStart),
            _ => Err(AnalysisError::InvalidConfig(format!(
                "unknown analysis type {}, expected one of [coldstart, cpu, memory, instance-coldstart]",
                s
            ))),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::ColdStart => "coldstart",
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::InstanceColdStart => "instance-coldstart",
        };
        write!(f, "{}", s)
    }
}

/// Analysis config. It implements Default trait so that you can create default config and change only the fields
/// you need.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub kind: AnalysisKind,
    /// Number of trace minutes to analyze.
    pub duration: usize,
    /// Tick length of dense timelines in nanoseconds, must divide one millisecond.
    pub granularity_ns: u64,
    /// Length of averaging intervals in seconds.
    pub averaging_granularity: f64,
    /// Keepalive window in seconds.
    pub keepalive: f64,
    /// Factor applied to all execution durations.
    pub slowdown: f64,
    /// Number of functions processed concurrently.
    pub threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kind: AnalysisKind::ColdStart,
            duration: 1440,
            granularity_ns: 1_000_000,
            averaging_granularity: 1.,
            keepalive: 6.,
            slowdown: 1.,
            threads: 12,
        }
    }
}

impl AnalysisConfig {
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        Ok(serde_yaml::from_reader(f)?)
    }

    pub fn granularity(&self) -> Duration {
        Duration::from_nanos(self.granularity_ns)
    }

    /// Number of dense timeline ticks in one second.
    pub fn ticks_per_second(&self) -> Result<usize> {
        Ok(ticks_per_milli(self.granularity())? * 1000)
    }

    /// Keepalive window measured in dense timeline ticks.
    pub fn keepalive_ticks(&self) -> Result<usize> {
        Ok((self.keepalive * self.ticks_per_second()? as f64).round() as usize)
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(AnalysisError::InvalidConfig("duration should be positive".to_string()));
        }
        if self.threads == 0 {
            return Err(AnalysisError::InvalidConfig("at least one thread is required".to_string()));
        }
        if !self.slowdown.is_finite() || self.slowdown < 0. {
            return Err(AnalysisError::InvalidConfig(format!(
                "slowdown {} should be non-negative",
                self.slowdown
            )));
        }
        if !self.keepalive.is_finite() || self.keepalive < 0. {
            return Err(AnalysisError::InvalidConfig(format!(
                "keepalive {} should be non-negative",
                self.keepalive
            )));
        }
        if !self.averaging_granularity.is_finite() || self.averaging_granularity <= 0. {
            return Err(AnalysisError::InvalidConfig(format!(
                "averaging granularity {} should be positive",
                self.averaging_granularity
            )));
        }
        ticks_per_milli(self.granularity())?;
        Ok(())
    }
}
