//! Worker group: partition planning, scatter/gather data movement, and the
//! channel runtime that connects the workers.
//!
//! Responsibilities:
//! - Deterministic shard ownership (`partition`)
//! - Zero-copy split and ordered reassembly (`distribute`)
//! - Collectives and group-wide abort (`comm`, `local`)
//!
//! Non-responsibilities:
//! - Cipher work
//! - File I/O

pub mod types;
pub mod partition;
pub mod distribute;
pub mod comm;
pub mod local;

pub use types::{GroupError, ShardMessage};
pub use partition::{PartitionPlan, ShardRange};
pub use distribute::{chain_seeds, collect, distribute};
pub use comm::WorkerHandle;
pub use local::LocalGroup;
