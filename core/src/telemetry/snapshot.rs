//! telemetry/snapshot.rs
//! Immutable view of a finished run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub workers: u64,
    pub cipher_units: u64,
    pub blocks_processed: u64,
    pub bytes_input: u64,
    pub bytes_output: u64,
    pub bytes_padding: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    /// Coordinator stage times.
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_input as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            workers: counters.workers,
            cipher_units: counters.cipher_units,
            blocks_processed: counters.blocks_processed,
            bytes_input: counters.bytes_input,
            bytes_output: counters.bytes_output,
            bytes_padding: counters.bytes_padding,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.stage_times.contains(*s))
    }

    /// Internal invariants:
    /// - coordinator stage times fit inside the run
    /// - every processed block is accounted for in the larger of input/output
    pub fn sanity_check(&self) -> bool {
        let blocks_bytes = self.blocks_processed * crate::constants::BLOCK_SIZE as u64;
        self.total_stage_time() <= self.elapsed
            && blocks_bytes == self.bytes_input.max(self.bytes_output)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
