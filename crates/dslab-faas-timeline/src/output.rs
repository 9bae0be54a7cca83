//! Analysis records and sinks that consume them.
use std::io::Write;

use csv::Writer;
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Discriminant of [`Record`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    ColdStart,
    Cpu,
    Memory,
}

/// Result record of an analysis, tagged with the index of the function that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Record {
    /// A new instance had to be provisioned at `timestamp` (seconds).
    ColdStart { timestamp: f64, function: usize },
    /// Mean number of running invocations over the interval starting at `timestamp`.
    Cpu { timestamp: f64, function: usize, cpu: f64 },
    /// Mean number of live instances over the interval starting at `timestamp`.
    Memory {
        timestamp: f64,
        function: usize,
        instances: f64,
    },
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::ColdStart { .. } => RecordKind::ColdStart,
            Record::Cpu { .. } => RecordKind::Cpu,
            Record::Memory { .. } => RecordKind::Memory,
        }
    }

    pub fn timestamp(&self) -> f64 {
        match *self {
            Record::ColdStart { timestamp, .. } | Record::Cpu { timestamp, .. } | Record::Memory { timestamp, .. } => {
                timestamp
            }
        }
    }

    pub fn function(&self) -> usize {
        match *self {
            Record::ColdStart { function, .. } | Record::Cpu { function, .. } | Record::Memory { function, .. } => {
                function
            }
        }
    }
}

/// Consumer of analysis records. The parallel pipeline drives a sink from a single thread.
pub trait RecordSink {
    fn write(&mut self, record: &Record) -> Result<()>;
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps all records in memory.
#[derive(Default)]
pub struct VecSink {
    pub records: Vec<Record>,
}

impl RecordSink for VecSink {
    fn write(&mut self, record: &Record) -> Result<()> {
        self.records.push(*record);
        Ok(())
    }
}

#[derive(Serialize)]
struct ColdStartRow {
    timestamp: f64,
    function: usize,
}

#[derive(Serialize)]
struct CpuRow {
    timestamp: f64,
    function: usize,
    cpu: f64,
}

#[derive(Serialize)]
struct MemoryRow {
    timestamp: f64,
    function: usize,
    instances: f64,
}

/// Writes records as CSV rows, the header is taken from the first record.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| AnalysisError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write(&mut self, record: &Record) -> Result<()> {
        match *record {
            Record::ColdStart { timestamp, function } => self.writer.serialize(ColdStartRow { timestamp, function })?,
            Record::Cpu {
                timestamp,
                function,
                cpu,
            } => self.writer.serialize(CpuRow {
                timestamp,
                function,
                cpu,
            })?,
            Record::Memory {
                timestamp,
                function,
                instances,
            } => self.writer.serialize(MemoryRow {
                timestamp,
                function,
                instances,
            })?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
