//! Cipher session: the validated, initialised cipher state a worker clones
//! into each of its cipher units.

use crate::constants::{BLOCK_SIZE, IV_LEN};
use crate::crypto::block::{xor_block, BlockCipherImpl};
use crate::crypto::params::CipherParams;
use crate::crypto::types::{Chaining, CipherMode, CryptoError, Operation};

/// Which per-block rule the session applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRule {
    /// `C = E(P)` / `P = D(C)`
    Independent,
    /// `C = E(P ^ IV)` / `P = D(C) ^ IV`, chain reset every block.
    IvPerBlock,
    /// `C_i = E(P_i ^ C_{i-1})` / `P_i = D(C_i) ^ C_{i-1}`, `C_{-1} = IV`.
    Chained,
}

#[derive(Clone)]
pub struct CipherSession {
    cipher: BlockCipherImpl,
    operation: Operation,
    rule: BlockRule,
    iv: [u8; IV_LEN],
}

impl CipherSession {
    /// Validate the algorithm/key/IV combination and build the key schedule.
    pub fn init(params: &CipherParams) -> Result<Self, CryptoError> {
        if params.key().len() != params.strength.key_len() {
            return Err(CryptoError::UnsupportedCipherConfig(format!(
                "{} with a {}-byte key",
                params.strength,
                params.key().len()
            )));
        }

        let (rule, iv) = match (params.mode, params.iv()) {
            (CipherMode::Ecb, _) => (BlockRule::Independent, [0u8; IV_LEN]),
            (CipherMode::Cbc, Some(iv)) => {
                let rule = match params.chaining {
                    Chaining::PerBlock => BlockRule::IvPerBlock,
                    Chaining::Standard => BlockRule::Chained,
                };
                (rule, *iv)
            }
            (CipherMode::Cbc, None) => {
                return Err(CryptoError::UnsupportedCipherConfig(format!(
                    "{}-cbc without an IV",
                    params.strength
                )))
            }
        };

        let cipher = BlockCipherImpl::new(params.strength, params.key())
            .map_err(|e| CryptoError::UnsupportedCipherConfig(e.to_string()))?;

        Ok(Self {
            cipher,
            operation: params.operation,
            rule,
            iv,
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn rule(&self) -> BlockRule {
        self.rule
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Independent copy of the cipher state for one cipher unit.
    pub fn clone_cipher(&self) -> BlockCipherImpl {
        self.cipher.clone()
    }

    /// Whether blocks can be split across cipher units. Only chained
    /// encryption has a sequential dependency.
    pub fn is_block_parallel(&self) -> bool {
        !(self.rule == BlockRule::Chained && self.operation == Operation::Encrypt)
    }

    /// Whether the shard needs a chain seed (the ciphertext block preceding it).
    pub fn needs_chain_seed(&self) -> bool {
        self.rule == BlockRule::Chained
    }

    /// Transform `input` into `output` (same length, whole blocks).
    ///
    /// `seed` is the ciphertext block preceding `input[0]` for chained mode
    /// and ignored otherwise.
    pub fn transform_range(
        &self,
        cipher: &BlockCipherImpl,
        input: &[u8],
        output: &mut [u8],
        seed: &[u8; BLOCK_SIZE],
    ) -> Result<(), CryptoError> {
        if input.len() != output.len() || input.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::CipherTransformFailure(format!(
                "range not block aligned: in={}, out={}",
                input.len(),
                output.len()
            )));
        }

        let mut prev: [u8; BLOCK_SIZE] = *seed;
        for (inp, out) in input
            .chunks_exact(BLOCK_SIZE)
            .zip(output.chunks_exact_mut(BLOCK_SIZE))
        {
            out.copy_from_slice(inp);
            match (self.rule, self.operation) {
                (BlockRule::Independent, Operation::Encrypt) => cipher.encrypt_block(out)?,
                (BlockRule::Independent, Operation::Decrypt) => cipher.decrypt_block(out)?,
                (BlockRule::IvPerBlock, Operation::Encrypt) => {
                    xor_block(out, &self.iv);
                    cipher.encrypt_block(out)?;
                }
                (BlockRule::IvPerBlock, Operation::Decrypt) => {
                    cipher.decrypt_block(out)?;
                    xor_block(out, &self.iv);
                }
                (BlockRule::Chained, Operation::Encrypt) => {
                    xor_block(out, &prev);
                    cipher.encrypt_block(out)?;
                    prev.copy_from_slice(out);
                }
                (BlockRule::Chained, Operation::Decrypt) => {
                    cipher.decrypt_block(out)?;
                    xor_block(out, &prev);
                    prev.copy_from_slice(inp);
                }
            }
        }
        Ok(())
    }

    /// Flush any buffered final-block output.
    ///
    /// Raw-block mode never holds a partial block, so this emits nothing;
    /// the coordinator still calls it after its shard and appends the result.
    pub fn finalize(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(Vec::new())
    }
}
