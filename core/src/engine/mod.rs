//! Cipher execution engine.
//!
//! Responsibilities:
//! - Split a worker's shard into whole-block cipher units
//! - Run the units concurrently, each with its own cipher state
//! - Reduce per-unit results after the parallel region
//!
//! Non-responsibilities:
//! - Group communication
//! - Padding

pub mod shard;

pub use shard::{ShardEngine, ShardOutput};
