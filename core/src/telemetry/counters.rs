//! telemetry/counters.rs
//! Mutable counters used during a pipeline run.
//!
//! Summary: block and byte counts per worker.
//! Converted into immutable TelemetrySnapshot at pipeline end.
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Deterministic counters collected during a run
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub workers: u64,
    pub cipher_units: u64,
    pub blocks_processed: u64,
    pub bytes_input: u64,
    pub bytes_output: u64,
    pub bytes_padding: u64,
}

impl TelemetryCounters {
    /// Record one worker's shard pass.
    ///
    /// - `blocks`: blocks transformed by this worker
    /// - `units`: cipher units that ran (0 for an empty shard)
    pub fn add_shard(&mut self, blocks: usize, units: usize) {
        self.workers += 1;
        self.blocks_processed += blocks as u64;
        self.cipher_units += units as u64;
    }

    /// Record padding appended (encrypt) or stripped (decrypt).
    pub fn add_padding(&mut self, pad_len: usize) {
        self.bytes_padding += pad_len as u64;
    }

    /// Record the coordinator's input and output sizes.
    pub fn set_io(&mut self, bytes_input: usize, bytes_output: usize) {
        self.bytes_input = bytes_input as u64;
        self.bytes_output = bytes_output as u64;
    }

    // This avoids:
    // * locks inside workers
    // * atomics
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.workers += other.workers;
        self.cipher_units += other.cipher_units;
        self.blocks_processed += other.blocks_processed;
        self.bytes_input += other.bytes_input;
        self.bytes_output += other.bytes_output;
        self.bytes_padding += other.bytes_padding;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
