// ## 📂 File: `src/pipeline/core.rs`
// ## Stable public API

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::crypto::{CipherParams, Operation};
use crate::group::LocalGroup;
use crate::pipeline::io::{resolve_output, InputSource, OutputSink};
use crate::pipeline::parallelism::ParallelismProfile;
use crate::pipeline::worker::{run_worker, WorkerJob, WorkerOutcome};
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Result of a successful run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Where the output was written, if it went to a file.
    pub output_path: Option<PathBuf>,
    /// The output bytes for `OutputSink::Memory`.
    pub output: Option<Vec<u8>>,
    pub telemetry: TelemetrySnapshot,
}

/// Run one encrypt or decrypt over a fresh worker group.
///
/// Either every worker succeeds and the output is complete, or the call
/// fails with the error of the worker that caused the abort.
pub fn run_pipeline(
    input: InputSource,
    output: OutputSink,
    params: &CipherParams,
    profile: &ParallelismProfile,
) -> Result<PipelineReport, StreamError> {
    profile.validate()?;
    let output_path = resolve_output(&output, &input, params.operation)?;
    let group = LocalGroup::new(profile.worker_count)?;

    info!(
        "[PIPELINE] {} {}-{} ({}), {} workers x {} threads",
        params.operation,
        params.strength,
        params.mode,
        params.chaining,
        profile.worker_count,
        profile.threads_per_worker
    );

    let job = WorkerJob::new(input, output_path.clone(), params);
    let results = group.run(|handle| run_worker(handle, &job, profile));
    let outcomes = root_cause(results)?;

    let mut counters = TelemetryCounters::default();
    let mut timer = None;
    let mut output = None;
    for outcome in outcomes {
        counters.merge(&outcome.counters);
        timer = timer.or(outcome.timer);
        output = output.or(outcome.output);
    }
    let timer = timer.unwrap_or_else(|| {
        let mut t = TelemetryTimer::new();
        t.finish();
        t
    });
    let telemetry = TelemetrySnapshot::from(&counters, &timer);

    info!(
        "[PIPELINE] done: {} blocks in {:?}",
        telemetry.blocks_processed, telemetry.elapsed
    );

    Ok(PipelineReport {
        output_path,
        output,
        telemetry,
    })
}

/// Pick the group's outcome: the first error that is not a reaction to a
/// peer's abort, then any abort, else every worker's result.
fn root_cause(
    results: Vec<Result<WorkerOutcome, StreamError>>,
) -> Result<Vec<WorkerOutcome>, StreamError> {
    let mut outcomes = Vec::with_capacity(results.len());
    let mut cause = None;
    let mut aborted = None;

    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) if e.is_peer_abort() => {
                aborted.get_or_insert(e);
            }
            Err(e) => {
                error!("[WORKER-{rank}] failed: {e}");
                cause.get_or_insert(e);
            }
        }
    }

    match cause.or(aborted) {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}

/// Encrypt `path` into `<path>.out`.
pub fn encrypt_file(
    path: impl AsRef<Path>,
    params: CipherParams,
    profile: &ParallelismProfile,
) -> Result<PipelineReport, StreamError> {
    let params = params.with_operation(Operation::Encrypt);
    run_pipeline(
        InputSource::File(path.as_ref().to_path_buf()),
        OutputSink::Derived,
        &params,
        profile,
    )
}

/// Decrypt `path`, writing to the name with `.out` stripped.
pub fn decrypt_file(
    path: impl AsRef<Path>,
    params: CipherParams,
    profile: &ParallelismProfile,
) -> Result<PipelineReport, StreamError> {
    let params = params.with_operation(Operation::Decrypt);
    run_pipeline(
        InputSource::File(path.as_ref().to_path_buf()),
        OutputSink::Derived,
        &params,
        profile,
    )
}

pub fn encrypt_bytes(
    data: &[u8],
    params: CipherParams,
    profile: &ParallelismProfile,
) -> Result<Vec<u8>, StreamError> {
    run_in_memory(data, params.with_operation(Operation::Encrypt), profile)
}

pub fn decrypt_bytes(
    data: &[u8],
    params: CipherParams,
    profile: &ParallelismProfile,
) -> Result<Vec<u8>, StreamError> {
    run_in_memory(data, params.with_operation(Operation::Decrypt), profile)
}

fn run_in_memory(
    data: &[u8],
    params: CipherParams,
    profile: &ParallelismProfile,
) -> Result<Vec<u8>, StreamError> {
    let report = run_pipeline(
        InputSource::Memory(data.to_vec()),
        OutputSink::Memory,
        &params,
        profile,
    )?;
    report
        .output
        .ok_or_else(|| StreamError::Validation("coordinator returned no output".into()))
}
