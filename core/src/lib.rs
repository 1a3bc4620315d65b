//! shardcrypt-core
//!
//! Whole-file AES encryption split across a group of cooperating workers,
//! each running several cipher threads over its shard of blocks.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod crypto;
pub mod group;
pub mod engine;
pub mod telemetry;

// Orchestration
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::crypto::{Chaining, CipherMode, CipherParams, KeyStrength, Operation};
    pub use crate::pipeline::{
        decrypt_bytes, decrypt_file, encrypt_bytes, encrypt_file, output_path_for, run_pipeline,
        InputSource, OutputSink, ParallelismProfile, PipelineReport,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{ErrorKind, StreamError};
}
