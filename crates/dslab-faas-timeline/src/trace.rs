//! Per-function invocation traces bucketed by minute.
use crate::error::{AnalysisError, Result};

/// Longest invocation the platform allows, in milliseconds.
pub const MAX_EXEC_TIME_MS: u64 = 60_000;
/// One minute in microseconds (the unit of inter-arrival times).
pub const MINUTE_US: f64 = 60_000_000.;
const IAT_TOLERANCE_US: f64 = 1.;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeSpecification {
    /// Execution duration in milliseconds.
    pub runtime: u64,
    /// Memory size in megabytes.
    pub memory: u64,
}

impl RuntimeSpecification {
    pub fn new(runtime: u64, memory: u64) -> Self {
        Self { runtime, memory }
    }
}

/// Invocations of a single function.
///
/// Row `m` of `iat` holds inter-arrival gaps (microseconds) of minute `m`. The last gap of every non-empty row is the
/// residual time until the end of the minute, so a row of length `L` describes `L - 1` invocations.
/// `runtime[m][k]` describes the `k`-th invocation of minute `m`; a runtime row may carry one extra padding entry
/// matching the residual gap.
#[derive(Default, Clone, Debug)]
pub struct FunctionTrace {
    pub name: String,
    pub invocations: Vec<usize>,
    pub iat: Vec<Vec<f64>>,
    pub runtime: Vec<Vec<RuntimeSpecification>>,
}

impl FunctionTrace {
    /// Creates a trace, deriving per-minute invocation counts from the IAT matrix.
    pub fn new(name: &str, iat: Vec<Vec<f64>>, runtime: Vec<Vec<RuntimeSpecification>>) -> Self {
        let invocations = iat.iter().map(|row| row.len().saturating_sub(1)).collect();
        Self {
            name: name.to_string(),
            invocations,
            iat,
            runtime,
        }
    }

    pub fn total_invocations(&self) -> usize {
        self.invocations.iter().sum()
    }

    /// Checks that the first `duration` minutes of the trace are consistent, so that timeline builders can index
    /// the matrices without further checks.
    pub fn validate(&self, duration: usize) -> Result<()> {
        let available = self.invocations.len().min(self.iat.len()).min(self.runtime.len());
        if available < duration {
            return Err(AnalysisError::TraceTooShort {
                function: self.name.clone(),
                available,
                required: duration,
            });
        }
        for minute in 0..duration {
            let count = self.invocations[minute];
            let iat = &self.iat[minute];
            let runtime = &self.runtime[minute];
            if count != iat.len().saturating_sub(1) {
                return Err(self.malformed(
                    minute,
                    format!("{} invocations, but {} inter-arrival times", count, iat.len()),
                ));
            }
            if runtime.len() != count && runtime.len() != count + 1 {
                return Err(self.malformed(
                    minute,
                    format!("{} invocations, but {} runtime entries", count, runtime.len()),
                ));
            }
            if iat.iter().any(|x| !x.is_finite() || *x < 0.) {
                return Err(self.malformed(minute, "negative or non-finite inter-arrival time".to_string()));
            }
            let span: f64 = iat.iter().take(count).sum();
            if span > MINUTE_US + IAT_TOLERANCE_US {
                return Err(self.malformed(
                    minute,
                    format!("invocations span {} us, which is longer than a minute", span),
                ));
            }
            if let Some(spec) = runtime.iter().take(count).find(|x| x.runtime > MAX_EXEC_TIME_MS) {
                return Err(AnalysisError::RuntimeTooLong {
                    function: self.name.clone(),
                    minute,
                    runtime: spec.runtime,
                    max: MAX_EXEC_TIME_MS,
                });
            }
        }
        Ok(())
    }

    fn malformed(&self, minute: usize, reason: String) -> AnalysisError {
        AnalysisError::MalformedTrace {
            function: self.name.clone(),
            minute,
            reason,
        }
    }

    /// Iterates over real invocations of the first `duration` minutes in arrival order.
    ///
    /// Expects a trace that passed [`FunctionTrace::validate`].
    pub fn invocation_iter(&self, duration: usize) -> InvocationIter<'_> {
        InvocationIter {
            trace: self,
            duration,
            minute: 0,
            index: 0,
            offset: 0.,
        }
    }
}

/// A single invocation located within its minute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvocationData {
    pub minute: usize,
    /// Start time relative to the beginning of the minute, in seconds.
    pub offset: f64,
    pub spec: RuntimeSpecification,
}

/// Walks a trace minute by minute, accumulating inter-arrival gaps within each minute.
pub struct InvocationIter<'a> {
    trace: &'a FunctionTrace,
    duration: usize,
    minute: usize,
    index: usize,
    offset: f64,
}

impl<'a> Iterator for InvocationIter<'a> {
    type Item = InvocationData;

    fn next(&mut self) -> Option<Self::Item> {
        while self.minute < self.duration && self.index >= self.trace.invocations[self.minute] {
            self.minute += 1;
            self.index = 0;
            self.offset = 0.;
        }
        if self.minute >= self.duration {
            return None;
        }
        self.offset += self.trace.iat[self.minute][self.index] / 1e6;
        let item = InvocationData {
            minute: self.minute,
            offset: self.offset,
            spec: self.trace.runtime[self.minute][self.index],
        };
        self.index += 1;
        Some(item)
    }
}
