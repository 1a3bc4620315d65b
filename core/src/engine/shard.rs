// # 📂 `src/engine/shard.rs`

use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::constants::BLOCK_SIZE;
use crate::crypto::{CipherSession, CryptoError};
use crate::group::PartitionPlan;

/// Output of one shard pass.
#[derive(Debug, Default)]
pub struct ShardOutput {
    pub bytes: Vec<u8>,
    pub blocks: usize,
    /// Cipher units that actually ran.
    pub units: usize,
}

/// Multi-threaded cipher over one worker's shard.
///
/// The shard's blocks are planned over up to `threads` cipher units with the
/// same partition rule the group uses, so units own disjoint, contiguous
/// block ranges. Each unit clones the session's cipher state.
#[derive(Debug, Clone, Copy)]
pub struct ShardEngine {
    threads: usize,
}

impl ShardEngine {
    pub fn new(threads: usize) -> Self {
        Self { threads: threads.max(1) }
    }

    /// Transform a whole-block shard.
    ///
    /// `seed` is the ciphertext block preceding the shard in chained mode;
    /// `None` means the shard starts the chain (the IV is used).
    pub fn run(
        &self,
        session: &CipherSession,
        shard: &[u8],
        seed: Option<&[u8; BLOCK_SIZE]>,
    ) -> Result<ShardOutput, CryptoError> {
        if shard.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::CipherTransformFailure(format!(
                "shard of {} bytes is not block aligned",
                shard.len()
            )));
        }

        let blocks = shard.len() / BLOCK_SIZE;
        if blocks == 0 {
            return Ok(ShardOutput::default());
        }

        let seed = seed.copied().unwrap_or(*session.iv());
        let units = if session.is_block_parallel() {
            self.threads.min(blocks)
        } else {
            1
        };
        let plan = PartitionPlan::new(blocks, units)
            .map_err(|e| CryptoError::CipherTransformFailure(e.to_string()))?;

        let start = Instant::now();
        let mut output = vec![0u8; shard.len()];

        // Carve the output into one disjoint slice per unit.
        let mut jobs = Vec::with_capacity(units);
        let mut rest: &mut [u8] = &mut output;
        for range in plan.shards() {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.byte_len());
            rest = tail;

            let input = &shard[range.byte_range()];
            let unit_seed = if range.block_offset == 0 {
                seed
            } else {
                let mut s = [0u8; BLOCK_SIZE];
                s.copy_from_slice(&shard[range.byte_offset() - BLOCK_SIZE..range.byte_offset()]);
                s
            };
            jobs.push((input, head, unit_seed));
        }

        let results: Vec<Result<(), CryptoError>> = if units == 1 {
            jobs.into_iter()
                .map(|(input, out, unit_seed)| {
                    let cipher = session.clone_cipher();
                    session.transform_range(&cipher, input, out, &unit_seed)
                })
                .collect()
        } else {
            thread::scope(|scope| {
                let handles: Vec<_> = jobs
                    .into_iter()
                    .map(|(input, out, unit_seed)| {
                        scope.spawn(move || {
                            let cipher = session.clone_cipher();
                            session.transform_range(&cipher, input, out, &unit_seed)
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|h| {
                        h.join().unwrap_or_else(|_| {
                            Err(CryptoError::CipherTransformFailure("cipher unit panicked".into()))
                        })
                    })
                    .collect()
            })
        };

        // Fault check happens only after every unit has finished.
        if let Some(err) = results.into_iter().find_map(Result::err) {
            return Err(err);
        }

        debug!(
            "[ENGINE] {} blocks over {} units in {:?}",
            blocks,
            units,
            start.elapsed()
        );

        Ok(ShardOutput {
            bytes: output,
            blocks,
            units,
        })
    }
}
