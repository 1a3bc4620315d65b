//! Scatter/gather data movement as pure functions of the buffer and plan.
//!
//! `distribute` hands out zero-copy `Bytes` slices; `collect` is its inverse
//! and rejects any shard whose length disagrees with the plan.

use bytes::Bytes;

use crate::constants::BLOCK_SIZE;
use crate::group::partition::PartitionPlan;
use crate::group::types::GroupError;

/// Split `source` into one shard per worker, in rank order.
pub fn distribute(source: &Bytes, plan: &PartitionPlan) -> Result<Vec<Bytes>, GroupError> {
    if source.len() != plan.total_bytes() {
        return Err(GroupError::ProtocolSizeMismatch(format!(
            "source holds {} bytes but the plan covers {}",
            source.len(),
            plan.total_bytes()
        )));
    }

    Ok(plan
        .shards()
        .iter()
        .map(|shard| source.slice(shard.byte_range()))
        .collect())
}

/// Concatenate per-worker shards back into plan order.
pub fn collect<S: AsRef<[u8]>>(shards: &[S], plan: &PartitionPlan) -> Result<Vec<u8>, GroupError> {
    if shards.len() != plan.worker_count() {
        return Err(GroupError::ProtocolSizeMismatch(format!(
            "collected {} shards for a group of {}",
            shards.len(),
            plan.worker_count()
        )));
    }

    let mut out = Vec::with_capacity(plan.total_bytes());
    for (shard, range) in shards.iter().zip(plan.shards()) {
        let shard = shard.as_ref();
        if shard.len() != range.byte_len() {
            return Err(GroupError::ProtocolSizeMismatch(format!(
                "worker {} returned {} bytes, planned {}",
                range.worker_index,
                shard.len(),
                range.byte_len()
            )));
        }
        out.extend_from_slice(shard);
    }
    Ok(out)
}

/// Chain seed for each shard: the source block right before it, or `iv` for
/// the shard that starts at block 0.
pub fn chain_seeds(
    source: &[u8],
    plan: &PartitionPlan,
    iv: &[u8; BLOCK_SIZE],
) -> Vec<[u8; BLOCK_SIZE]> {
    plan.shards()
        .iter()
        .map(|shard| {
            if shard.block_offset == 0 {
                return *iv;
            }
            let start = (shard.block_offset - 1) * BLOCK_SIZE;
            let mut seed = [0u8; BLOCK_SIZE];
            seed.copy_from_slice(&source[start..start + BLOCK_SIZE]);
            seed
        })
        .collect()
}
