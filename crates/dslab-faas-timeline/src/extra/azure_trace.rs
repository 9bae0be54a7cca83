//! Functions responsible for parsing Azure Functions 2019 trace.
//! Trace description: https://github.com/Azure/AzurePublicDataset/blob/master/AzureFunctionsDataset2019.md
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use csv::{Reader, ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::error::{AnalysisError, Result};
use crate::extra::generator::Percentiles;

pub const INVOCATIONS_FILE: &str = "invocations.csv";
pub const DURATIONS_FILE: &str = "durations.csv";
pub const MEMORY_FILE: &str = "memory.csv";

const DURATION_COLUMNS: [(&str, f64); 7] = [
    ("percentile_Average_0", 0.),
    ("percentile_Average_1", 0.01),
    ("percentile_Average_25", 0.25),
    ("percentile_Average_50", 0.5),
    ("percentile_Average_75", 0.75),
    ("percentile_Average_99", 0.99),
    ("percentile_Average_100", 1.),
];

const MEMORY_COLUMNS: [(&str, f64); 8] = [
    ("AverageAllocatedMb_pct1", 0.01),
    ("AverageAllocatedMb_pct5", 0.05),
    ("AverageAllocatedMb_pct25", 0.25),
    ("AverageAllocatedMb_pct50", 0.5),
    ("AverageAllocatedMb_pct75", 0.75),
    ("AverageAllocatedMb_pct95", 0.95),
    ("AverageAllocatedMb_pct99", 0.99),
    ("AverageAllocatedMb_pct100", 1.),
];

/// Trace statistics of a single function.
#[derive(Clone, Debug)]
pub struct FunctionStats {
    /// `HashOwner_HashApp_HashFunction`.
    pub name: String,
    /// `HashOwner_HashApp`.
    pub app: String,
    /// Number of invocations in each minute.
    pub invocations: Vec<usize>,
    /// Execution duration distribution in milliseconds.
    pub duration: Percentiles,
    /// Allocated memory distribution in megabytes.
    pub memory: Percentiles,
}

fn open_reader(dir: &Path, file: &str) -> Result<Reader<File>> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(AnalysisError::MissingTraceData(format!("{} not found", path.display())));
    }
    Ok(ReaderBuilder::new().from_path(path)?)
}

fn column(headers: &StringRecord, name: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AnalysisError::MissingTraceData(format!("{} has no column {}", file, name)))
}

fn field<T: FromStr>(record: &StringRecord, idx: usize, file: &str) -> Result<T> {
    let value = record.get(idx).unwrap_or("");
    value.parse::<T>().map_err(|_| {
        AnalysisError::TraceParse(format!(
            "{} line {}: bad value {:?} in column {}",
            file,
            record.position().map(|p| p.line()).unwrap_or(0),
            value,
            idx + 1
        ))
    })
}

fn percentiles(record: &StringRecord, columns: &[(usize, f64)], file: &str) -> Result<Percentiles> {
    let mut points = Vec::with_capacity(columns.len());
    for &(idx, p) in columns {
        points.push((p, field::<f64>(record, idx, file)?));
    }
    Percentiles::new(points)
}

fn resolve_columns(headers: &StringRecord, columns: &[(&str, f64)], file: &str) -> Result<Vec<(usize, f64)>> {
    columns
        .iter()
        .map(|&(name, p)| Ok((column(headers, name, file)?, p)))
        .collect()
}

/// Loads invocation counts of the first `duration` minutes together with execution duration and memory statistics
/// from a directory with `invocations.csv`, `durations.csv` and `memory.csv`.
///
/// Functions are returned in the order of `invocations.csv`; functions without invocations in the window are
/// skipped.
pub fn load_azure_trace(dir: &Path, duration: usize) -> Result<Vec<FunctionStats>> {
    let mut inv_file = open_reader(dir, INVOCATIONS_FILE)?;
    let headers = inv_file.headers()?.clone();
    let owner_col = column(&headers, "HashOwner", INVOCATIONS_FILE)?;
    let app_col = column(&headers, "HashApp", INVOCATIONS_FILE)?;
    let func_col = column(&headers, "HashFunction", INVOCATIONS_FILE)?;
    let first_minute = column(&headers, "1", INVOCATIONS_FILE)?;
    let mut functions = IndexMap::<String, (String, Vec<usize>)>::new();
    for inv_rec in inv_file.records() {
        let record = inv_rec?;
        let app = format!("{}_{}", &record[owner_col], &record[app_col]);
        let name = format!("{}_{}", app, &record[func_col]);
        let available = record.len().saturating_sub(first_minute);
        if available < duration {
            return Err(AnalysisError::TraceTooShort {
                function: name,
                available,
                required: duration,
            });
        }
        let mut counts = Vec::with_capacity(duration);
        for minute in 0..duration {
            counts.push(field::<usize>(&record, first_minute + minute, INVOCATIONS_FILE)?);
        }
        let entry = functions.entry(name).or_insert_with(|| (app, vec![0; duration]));
        for (total, cnt) in entry.1.iter_mut().zip(counts) {
            *total += cnt;
        }
    }

    let mut dur_file = open_reader(dir, DURATIONS_FILE)?;
    let headers = dur_file.headers()?.clone();
    let owner_col = column(&headers, "HashOwner", DURATIONS_FILE)?;
    let app_col = column(&headers, "HashApp", DURATIONS_FILE)?;
    let func_col = column(&headers, "HashFunction", DURATIONS_FILE)?;
    let dur_columns = resolve_columns(&headers, &DURATION_COLUMNS, DURATIONS_FILE)?;
    let mut durations = FxHashMap::<String, Percentiles>::default();
    for dur_rec in dur_file.records() {
        let record = dur_rec?;
        let name = format!("{}_{}_{}", &record[owner_col], &record[app_col], &record[func_col]);
        if functions.contains_key(&name) {
            durations.insert(name, percentiles(&record, &dur_columns, DURATIONS_FILE)?);
        }
    }

    // memory is reported per app, some trace samples also carry function hashes
    let mut mem_file = open_reader(dir, MEMORY_FILE)?;
    let headers = mem_file.headers()?.clone();
    let owner_col = column(&headers, "HashOwner", MEMORY_FILE)?;
    let app_col = column(&headers, "HashApp", MEMORY_FILE)?;
    let func_col = headers.iter().position(|h| h == "HashFunction");
    let mem_columns = resolve_columns(&headers, &MEMORY_COLUMNS, MEMORY_FILE)?;
    let mut memory = FxHashMap::<String, Percentiles>::default();
    for mem_rec in mem_file.records() {
        let record = mem_rec?;
        let mut key = format!("{}_{}", &record[owner_col], &record[app_col]);
        if let Some(idx) = func_col {
            key.push('_');
            key.push_str(&record[idx]);
        }
        memory.insert(key, percentiles(&record, &mem_columns, MEMORY_FILE)?);
    }

    let mut result = Vec::with_capacity(functions.len());
    let mut idle = 0;
    for (name, (app, invocations)) in functions {
        if invocations.iter().all(|x| *x == 0) {
            idle += 1;
            continue;
        }
        let dur_stats = durations
            .remove(&name)
            .ok_or_else(|| AnalysisError::MissingTraceData(format!("no duration statistics for function {}", name)))?;
        let mem_key = if func_col.is_some() { &name } else { &app };
        let mem_stats = memory
            .get(mem_key)
            .cloned()
            .ok_or_else(|| AnalysisError::MissingTraceData(format!("no memory statistics for function {}", name)))?;
        result.push(FunctionStats {
            name,
            app,
            invocations,
            duration: dur_stats,
            memory: mem_stats,
        });
    }
    if idle > 0 {
        warn!("skipped {} functions without invocations in the first {} minutes", idle, duration);
    }
    info!("loaded {} functions from {}", result.len(), dir.display());
    Ok(result)
}
