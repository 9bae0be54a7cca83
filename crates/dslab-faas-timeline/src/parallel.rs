//! Running per-function analyses in parallel.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::{Arc, Mutex};
use std::thread;

use log::{error, info};
use threadpool::ThreadPool;

use crate::analysis::analyze_function;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::output::{Record, RecordSink};
use crate::trace::FunctionTrace;

/// Capacity of the channel between analysis workers and the output writer.
pub const OUTPUT_BUFFER_SIZE: usize = 1000;

/// Analyzes all functions in a thread pool with `config.threads` workers and writes the records to `sink` from a
/// dedicated writer thread.
///
/// Record order is preserved within each function, but not across functions. The first error stops the run:
/// functions that have not started yet are skipped and the error is returned. On success the flushed sink is
/// returned.
pub fn parallel_analysis<S>(functions: Vec<FunctionTrace>, config: &AnalysisConfig, mut sink: S) -> Result<S>
where
    S: RecordSink + Send + 'static,
{
    config.validate()?;
    info!(
        "running {} analysis of {} functions in {} threads",
        config.kind,
        functions.len(),
        config.threads
    );
    let (tx, rx) = sync_channel::<Record>(OUTPUT_BUFFER_SIZE);
    let writer = thread::spawn(move || -> Result<S> {
        for record in rx.iter() {
            sink.write(&record)?;
        }
        sink.flush()?;
        Ok(sink)
    });

    let pool = ThreadPool::new(config.threads);
    let aborted = Arc::new(AtomicBool::new(false));
    let failure: Arc<Mutex<Option<AnalysisError>>> = Arc::new(Mutex::new(None));
    let config = Arc::new(config.clone());
    for (id, trace) in functions.into_iter().enumerate() {
        let tx = tx.clone();
        let aborted = aborted.clone();
        let failure = failure.clone();
        let config = config.clone();
        pool.execute(move || {
            if aborted.load(Ordering::SeqCst) {
                return;
            }
            match analyze_function(id, &trace, &config) {
                Ok(records) => {
                    for record in records {
                        if tx.send(record).is_err() {
                            // writer has failed, its error is reported on join
                            aborted.store(true, Ordering::SeqCst);
                            return;
                        }
                    }
                }
                Err(e) => {
                    error!("analysis of function {} ({}) failed: {}", id, trace.name, e);
                    aborted.store(true, Ordering::SeqCst);
                    if let Ok(mut failure) = failure.lock() {
                        failure.get_or_insert(e);
                    }
                }
            }
        });
    }
    drop(tx);
    pool.join();

    let written = writer.join().map_err(|_| AnalysisError::WriterPanicked)?;
    if let Some(e) = failure.lock().ok().and_then(|mut x| x.take()) {
        return Err(e);
    }
    if pool.panic_count() > 0 {
        return Err(AnalysisError::WorkerPanicked(pool.panic_count()));
    }
    let sink = written?;
    info!("all records written");
    Ok(sink)
}
