/// AES block size in bytes. Every shard, padded buffer and cipher unit is a
/// multiple of this.
pub const BLOCK_SIZE: usize = 16;

/// IV length for CBC mode (exactly one block).
pub const IV_LEN: usize = BLOCK_SIZE;

/// Hex characters required to spell an IV on the command line.
pub const IV_HEX_LEN: usize = IV_LEN * 2;

/// Supported AES key strengths, in bits.
pub const KEY_BITS: &[usize] = &[128, 192, 256];

/// Defaults when Option<T> is None
pub const DEFAULT_KEY_BITS: usize = 128;

/// Suffix appended to encrypted output files and stripped on decrypt.
pub const OUTPUT_SUFFIX: &str = ".out";

/// Coordinator rank. Owns file I/O, padding and final assembly.
pub const COORDINATOR: usize = 0;

/// Upper bound for the worker group size.
pub const MAX_WORKERS: usize = 1024;

/// Upper bound for cipher threads inside one worker.
pub const MAX_THREADS_PER_WORKER: usize = 256;

/// Working set multiplier used by the memory check (source + output buffers).
pub const WORKING_SET_FACTOR: u64 = 2;
