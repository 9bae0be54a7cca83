//! Generation of invocation specifications (inter-arrival times and runtimes) from per-minute trace statistics.
use std::str::FromStr;

use rand::prelude::*;
use rand_distr::Exp1;
use rand_pcg::Pcg64;

use crate::error::{AnalysisError, Result};
use crate::extra::azure_trace::FunctionStats;
use crate::trace::{FunctionTrace, RuntimeSpecification, MAX_EXEC_TIME_MS, MINUTE_US};

/// Distribution of inter-arrival times within a minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IatDistribution {
    /// Poisson arrivals.
    Exponential,
    /// Gaps drawn uniformly at random.
    Uniform,
    /// Equal gaps.
    Equidistant,
}

/// Inter-arrival time generation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IatConfig {
    pub distribution: IatDistribution,
    /// If set, the first invocation of a minute is moved away from the minute start by a random offset.
    pub shift: bool,
}

impl FromStr for IatConfig {
    type Err = AnalysisError;

    /// Parses `exponential`, `uniform`, `equidistant`, optionally followed by `_shift`.
    fn from_str(s: &str) -> Result<Self> {
        let (name, shift) = match s.strip_suffix("_shift") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let distribution = match name {
            "exponential" => IatDistribution::Exponential,
            "uniform" => IatDistribution::Uniform,
            "equidistant" => IatDistribution::Equidistant,
            _ => {
                return Err(AnalysisError::InvalidConfig(format!(
                    "unsupported IAT distribution {}, expected one of \
                     [exponential(_shift), uniform(_shift), equidistant(_shift)]",
                    s
                )))
            }
        };
        Ok(Self { distribution, shift })
    }
}

/// Empirical distribution given by a set of percentiles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Percentiles {
    /// (cumulative probability, value) pairs sorted by probability.
    points: Vec<(f64, f64)>,
}

impl Percentiles {
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(AnalysisError::MissingTraceData("empty percentile list".to_string()));
        }
        if points.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(AnalysisError::InvalidConfig(
                "percentiles should be sorted by probability".to_string(),
            ));
        }
        if points.iter().any(|x| !x.1.is_finite()) {
            return Err(AnalysisError::InvalidConfig("percentile values should be finite".to_string()));
        }
        Ok(Self { points })
    }

    /// Draws a value, interpolating linearly between neighbouring percentiles.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let p = rng.gen_range(0.0..1.0);
        let (first_p, first_val) = self.points[0];
        if p <= first_p {
            return first_val;
        }
        for w in self.points.windows(2) {
            let ((lp, lv), (rp, rv)) = (w[0], w[1]);
            if p < rp {
                return lv + (rv - lv) * (p - lp) / (rp - lp);
            }
        }
        self.points[self.points.len() - 1].1
    }
}

fn minute_iat(count: usize, config: IatConfig, rng: &mut Pcg64) -> Vec<f64> {
    if count == 0 {
        return vec![MINUTE_US];
    }
    let mut gaps: Vec<f64> = match config.distribution {
        IatDistribution::Exponential => (0..count).map(|_| -> f64 { Exp1.sample(&mut *rng) }).collect(),
        IatDistribution::Uniform => (0..count).map(|_| rng.gen_range(0.0..1.0)).collect(),
        IatDistribution::Equidistant => vec![1.; count],
    };
    let mut total: f64 = gaps.iter().sum();
    if total <= 0. {
        gaps = vec![1.; count];
        total = count as f64;
    }
    let mut row = Vec::with_capacity(count + 1);
    row.push(0.);
    row.extend(gaps.iter().map(|x| x * MINUTE_US / total));
    if config.shift {
        let residual = row[count];
        let offset = rng.gen_range(0.0..1.0) * residual;
        row[0] = offset;
        row[count] = residual - offset;
    }
    row
}

/// Generates invocation specification of a function. The random generator is supplied by the caller, so that
/// generating the same functions in the same order with the same seed always gives the same result.
pub fn generate_specification(stats: &FunctionStats, iat: IatConfig, rng: &mut Pcg64) -> FunctionTrace {
    let mut iat_matrix = Vec::with_capacity(stats.invocations.len());
    let mut runtime_matrix = Vec::with_capacity(stats.invocations.len());
    for &count in stats.invocations.iter() {
        iat_matrix.push(minute_iat(count, iat, rng));
        let mut row = Vec::with_capacity(count);
        for _ in 0..count {
            let runtime = stats.duration.sample(rng).round().clamp(1., MAX_EXEC_TIME_MS as f64) as u64;
            let memory = stats.memory.sample(rng).round().max(0.) as u64;
            row.push(RuntimeSpecification::new(runtime, memory));
        }
        runtime_matrix.push(row);
    }
    FunctionTrace::new(&stats.name, iat_matrix, runtime_matrix)
}
