//! Trace loading and invocation specification generation.
pub mod azure_trace;
pub mod generator;
