//! A library for offline analysis of FaaS invocation traces.
//!
//! For every function of a trace it reconstructs the concurrency timeline of running invocations and derives
//! cold starts and CPU/memory utilization implied by a fixed keepalive policy:
//!
//! - dense per-tick timelines ([`timeline::function_timeline`]) feed the cold start counter
//! ([`coldstart::cold_starts`]);
//! - sparse step-function timelines ([`timeline::function_timeline_compressed`]) feed the instance retention
//! projection ([`keepalive::instance_timeline`]) and interval averaging ([`average::average_timeline`]).
//!
//! Functions are processed in parallel by [`parallel::parallel_analysis`], which funnels the resulting records into a
//! single [`output::RecordSink`].

pub mod analysis;
pub mod average;
pub mod coldstart;
pub mod config;
pub mod error;
pub mod extra;
pub mod keepalive;
pub mod output;
pub mod parallel;
pub mod query;
pub mod timeline;
pub mod trace;
