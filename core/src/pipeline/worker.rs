// ## 📂 File: `src/pipeline/worker.rs`
// ## Per-rank body of the pipeline, run once on every worker of the group.

use std::path::PathBuf;
use std::sync::Mutex;

use bytes::Bytes;
use tracing::{debug, info};

use crate::constants::BLOCK_SIZE;
use crate::crypto::padding::{pad_in_place, unpad_in_place};
use crate::crypto::{CipherParams, CipherSession, Operation};
use crate::engine::ShardEngine;
use crate::group::{chain_seeds, distribute, GroupError, PartitionPlan, ShardMessage, WorkerHandle};
use crate::pipeline::io::{read_input, write_output, InputSource};
use crate::pipeline::parallelism::{memory_budget_ok, ParallelismProfile};
use crate::pipeline::state::{PipelineState, StateTracker};
use crate::telemetry::{Stage, TelemetryCounters, TelemetryTimer};
use crate::types::StreamError;

/// Everything a worker needs for one run. Shared by reference across the group.
pub struct WorkerJob<'a> {
    /// Taken by the coordinator; other ranks never touch it.
    input: Mutex<Option<InputSource>>,
    /// `None` keeps the result in memory.
    output: Option<PathBuf>,
    params: &'a CipherParams,
}

impl<'a> WorkerJob<'a> {
    pub fn new(input: InputSource, output: Option<PathBuf>, params: &'a CipherParams) -> Self {
        Self {
            input: Mutex::new(Some(input)),
            output,
            params,
        }
    }

    fn take_input(&self) -> Result<InputSource, StreamError> {
        self.input
            .lock()
            .map_err(|_| StreamError::Validation("input lock poisoned".into()))?
            .take()
            .ok_or_else(|| StreamError::Validation("input already consumed".into()))
    }
}

/// What a worker hands back to the orchestrator.
#[derive(Debug, Default)]
pub struct WorkerOutcome {
    pub counters: TelemetryCounters,
    /// Coordinator only.
    pub timer: Option<TelemetryTimer>,
    /// Coordinator only, when no output file was requested.
    pub output: Option<Vec<u8>>,
}

/// Run the whole pipeline on this rank.
pub fn run_worker(
    handle: &mut WorkerHandle,
    job: &WorkerJob<'_>,
    profile: &ParallelismProfile,
) -> Result<WorkerOutcome, StreamError> {
    let mut state = StateTracker::new(handle.rank());
    let result = drive(handle, job, profile, &mut state);
    match &result {
        Ok(_) => state.advance(PipelineState::Done),
        Err(e) => state.abort(e),
    }
    result
}

fn drive(
    handle: &mut WorkerHandle,
    job: &WorkerJob<'_>,
    profile: &ParallelismProfile,
    state: &mut StateTracker,
) -> Result<WorkerOutcome, StreamError> {
    let rank = handle.rank();
    let params = job.params;
    let operation = params.operation;
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    // ---- Coordinator: read, validate, pad ----
    let mut source: Option<Vec<u8>> = None;
    let mut input_len = 0usize;
    if handle.is_coordinator() {
        let input = job.take_input()?;
        let mut data = timer.time(Stage::Read, || read_input(input))?;
        input_len = data.len();
        memory_budget_ok(data.len() as u64);

        // Ciphertext must already be whole blocks; plaintext is padded next.
        state.run(PipelineState::Validate, &mut timer, || match operation {
            Operation::Encrypt => Ok(()),
            Operation::Decrypt => check_aligned(input_len),
        })?;

        if operation == Operation::Encrypt {
            let pad_len = state.run(PipelineState::Pad, &mut timer, || {
                pad_in_place(&mut data, BLOCK_SIZE)
            })?;
            counters.add_padding(pad_len);
        }
        info!(
            "[PIPELINE] {} {} bytes ({} after padding) over {} workers",
            operation,
            input_len,
            data.len(),
            handle.size()
        );
        source = Some(data);
    }

    // ---- Every rank: agree on size and plan ----
    let announced = source.as_ref().map(|d| d.len() as u64);
    let file_size = state.run(PipelineState::BroadcastSize, &mut timer, || {
        handle.broadcast_size(announced)
    })?;
    let file_size = usize::try_from(file_size).map_err(|_| {
        GroupError::ProtocolSizeMismatch(format!("size {file_size} does not fit in memory"))
    })?;
    check_aligned(file_size)?;

    let group_size = handle.size();
    let plan = state.run(PipelineState::Partition, &mut timer, || {
        PartitionPlan::for_byte_len(file_size, group_size)
    })?;

    // ---- Scatter ----
    let shard = state.run(PipelineState::Distribute, &mut timer, || {
        let parts = source.take().map(|data| build_shards(data, &plan, params)).transpose()?;
        handle.scatter(parts).map_err(StreamError::from)
    })?;
    debug!("[WORKER-{rank}] received shard of {} bytes", shard.bytes.len());

    // ---- Cipher ----
    let session = CipherSession::init(params)?;
    let engine = ShardEngine::new(profile.threads_per_worker);
    let relay = session.needs_chain_seed() && !session.is_block_parallel();

    let out = state.run(PipelineState::Cipher, &mut timer, || -> Result<_, StreamError> {
        let seed = if relay && rank > 0 {
            Some(handle.recv_chain_seed(rank - 1)?)
        } else {
            shard.chain_seed
        };

        let mut out = engine.run(&session, &shard.bytes, seed.as_ref())?;
        drop(shard);

        if relay && rank + 1 < handle.size() {
            let next = last_block(&out.bytes)
                .or(seed)
                .unwrap_or(*session.iv());
            handle.send_chain_seed(rank + 1, next)?;
        }
        counters.add_shard(out.blocks, out.units);

        if handle.is_coordinator() {
            let tail = session.finalize()?;
            out.bytes.extend_from_slice(&tail);
        }
        Ok(out)
    })?;

    // ---- Gather ----
    let gathered = state.run(PipelineState::Collect, &mut timer, || {
        handle.gather(out.bytes, &plan)
    })?;
    let Some(mut data) = gathered else {
        return Ok(WorkerOutcome {
            counters,
            ..WorkerOutcome::default()
        });
    };

    // ---- Coordinator: unpad, write ----
    if operation == Operation::Decrypt {
        let removed = state.run(PipelineState::Unpad, &mut timer, || {
            unpad_in_place(&mut data, BLOCK_SIZE)
        })?;
        counters.add_padding(removed);
    }
    counters.set_io(input_len, data.len());

    let output = match &job.output {
        Some(path) => {
            state.run(PipelineState::Write, &mut timer, || write_output(path, &data))?;
            None
        }
        None => Some(data),
    };
    timer.finish();

    Ok(WorkerOutcome {
        counters,
        timer: Some(timer),
        output,
    })
}

fn check_aligned(len: usize) -> Result<(), GroupError> {
    if len % BLOCK_SIZE != 0 {
        return Err(GroupError::ProtocolSizeMismatch(format!(
            "{len} bytes is not a multiple of the {BLOCK_SIZE}-byte block"
        )));
    }
    Ok(())
}

/// Slice the coordinator's buffer into per-rank messages. Chained decrypt
/// also gets each shard's preceding ciphertext block.
fn build_shards(
    data: Vec<u8>,
    plan: &PartitionPlan,
    params: &CipherParams,
) -> Result<Vec<ShardMessage>, StreamError> {
    let source = Bytes::from(data);
    let slices = distribute(&source, plan)?;

    let seeds = match (params.operation, params.iv()) {
        (Operation::Decrypt, Some(iv)) if params.is_chained() => Some(chain_seeds(&source, plan, iv)),
        _ => None,
    };

    Ok(slices
        .into_iter()
        .enumerate()
        .map(|(rank, bytes)| ShardMessage {
            bytes,
            chain_seed: seeds.as_ref().map(|s| s[rank]),
        })
        .collect())
}

fn last_block(bytes: &[u8]) -> Option<[u8; BLOCK_SIZE]> {
    let start = bytes.len().checked_sub(BLOCK_SIZE)?;
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(&bytes[start..]);
    Some(block)
}
