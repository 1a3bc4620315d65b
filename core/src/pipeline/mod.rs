// ## 1️⃣ `mod.rs`: public façade + re-exports

//! pipeline: whole-file, group-parallel block cipher.
//!
//! read/validate → pad (encrypt) → broadcast size → plan → distribute →
//! cipher → collect → unpad (decrypt) → write.
//!
//! The coordinator (rank 0) owns file I/O, padding and assembly. Every rank
//! derives the same partition plan from the broadcast size.

pub mod io;
pub mod parallelism;
pub mod state;
pub mod worker;
pub mod core;

pub use io::{output_path_for, InputSource, OutputSink};
pub use parallelism::ParallelismProfile;
pub use state::PipelineState;

pub use self::core::{
    decrypt_bytes,
    decrypt_file,
    encrypt_bytes,
    encrypt_file,
    run_pipeline,
    PipelineReport,
};
