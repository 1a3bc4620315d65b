//! Partition planner.
//!
//! Every worker derives the same plan from `(total_blocks, worker_count)`
//! alone, so no message exchange is needed to agree on shard ownership.
//! Worker `i` owns `T / W` blocks plus one more when `i < T % W`; ranges are
//! contiguous in rank order.

use std::ops::Range;

use crate::constants::BLOCK_SIZE;
use crate::group::types::GroupError;

/// One worker's contiguous block range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRange {
    pub worker_index: usize,
    pub block_count: usize,
    pub block_offset: usize,
    pub block_size: usize,
}

impl ShardRange {
    pub fn byte_len(&self) -> usize {
        self.block_count * self.block_size
    }

    pub fn byte_offset(&self) -> usize {
        self.block_offset * self.block_size
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.byte_offset()..self.byte_offset() + self.byte_len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    total_blocks: usize,
    block_size: usize,
    shards: Vec<ShardRange>,
}

impl PartitionPlan {
    /// Plan `total_blocks` AES blocks over `worker_count` workers.
    pub fn new(total_blocks: usize, worker_count: usize) -> Result<Self, GroupError> {
        Self::with_block_size(total_blocks, worker_count, BLOCK_SIZE)
    }

    pub fn with_block_size(
        total_blocks: usize,
        worker_count: usize,
        block_size: usize,
    ) -> Result<Self, GroupError> {
        if worker_count == 0 {
            return Err(GroupError::EmptyGroup);
        }

        let base = total_blocks / worker_count;
        let remainder = total_blocks % worker_count;

        let mut shards = Vec::with_capacity(worker_count);
        let mut offset = 0;
        for worker_index in 0..worker_count {
            let block_count = base + usize::from(worker_index < remainder);
            shards.push(ShardRange {
                worker_index,
                block_count,
                block_offset: offset,
                block_size,
            });
            offset += block_count;
        }
        debug_assert_eq!(offset, total_blocks);

        Ok(Self {
            total_blocks,
            block_size,
            shards,
        })
    }

    /// Plan a byte buffer. The length must be block aligned.
    pub fn for_byte_len(byte_len: usize, worker_count: usize) -> Result<Self, GroupError> {
        if byte_len % BLOCK_SIZE != 0 {
            return Err(GroupError::ProtocolSizeMismatch(format!(
                "data size {byte_len} is not a multiple of the {BLOCK_SIZE}-byte block size"
            )));
        }
        Self::new(byte_len / BLOCK_SIZE, worker_count)
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    pub fn total_bytes(&self) -> usize {
        self.total_blocks * self.block_size
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn worker_count(&self) -> usize {
        self.shards.len()
    }

    pub fn shards(&self) -> &[ShardRange] {
        &self.shards
    }

    /// Byte length of every shard, in rank order.
    pub fn byte_counts(&self) -> Vec<usize> {
        self.shards.iter().map(ShardRange::byte_len).collect()
    }
}
