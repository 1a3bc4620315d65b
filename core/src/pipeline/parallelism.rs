use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{MAX_THREADS_PER_WORKER, MAX_WORKERS, WORKING_SET_FACTOR};
use crate::types::StreamError;

/// Parallelism configuration: workers in the group, cipher threads per worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelismProfile {
    pub worker_count: usize,
    pub threads_per_worker: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::dynamic()
    }
}

impl ParallelismProfile {
    pub fn new(worker_count: usize, threads_per_worker: usize) -> Self {
        Self {
            worker_count,
            threads_per_worker,
        }
    }

    pub fn single_threaded() -> Self {
        Self {
            worker_count: 1,
            threads_per_worker: 1,
        }
    }

    /// Size the group from the host's core count.
    pub fn dynamic() -> Self {
        let cores = num_cpus::get().saturating_sub(1).max(1); // leave one core free
        let worker_count = (cores / 2).max(1);
        let threads_per_worker = (cores / worker_count).max(1);

        Self {
            worker_count,
            threads_per_worker,
        }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(StreamError::Validation(format!(
                "invalid worker count: {}, must be 1..={MAX_WORKERS}",
                self.worker_count
            )));
        }
        if self.threads_per_worker == 0 || self.threads_per_worker > MAX_THREADS_PER_WORKER {
            return Err(StreamError::Validation(format!(
                "invalid threads per worker: {}, must be 1..={MAX_THREADS_PER_WORKER}",
                self.threads_per_worker
            )));
        }
        Ok(())
    }
}

/// Check that the whole-file working set fits in available memory.
///
/// Only warns: the OS may still page, and the caller chose to run in memory.
pub fn memory_budget_ok(file_size: u64) -> bool {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    let available = sys.available_memory();
    let needed = file_size.saturating_mul(WORKING_SET_FACTOR);

    if available > 0 && needed > available {
        warn!(
            "[PIPELINE] working set of {} bytes exceeds available memory ({} bytes)",
            needed, available
        );
        return false;
    }
    true
}
