// ## 📂 File: `src/crypto/block.rs`

//! Raw AES block transforms for 128/192/256-bit keys.
//!
//! Design notes:
//! - Operates on exactly one 16-byte block per call, in place.
//! - No padding, no mode logic; chaining lives in the session.
//! - The key schedule is `Clone`, so every cipher unit gets its own copy.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};

use crate::constants::BLOCK_SIZE;
use crate::crypto::types::{CryptoError, KeyStrength};

/// Unified AES implementation selected by key strength.
#[derive(Clone)]
pub enum BlockCipherImpl {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl BlockCipherImpl {
    /// Construct from key strength and key bytes.
    pub fn new(strength: KeyStrength, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != strength.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                expected: strength.key_len(),
                actual: key.len(),
            });
        }

        let invalid = |_| CryptoError::InvalidKeyLength {
            expected: strength.key_len(),
            actual: key.len(),
        };

        Ok(match strength {
            KeyStrength::Aes128 => Self::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            KeyStrength::Aes192 => Self::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            KeyStrength::Aes256 => Self::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
        })
    }

    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let block = as_block(block)?;
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
        Ok(())
    }

    pub fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let block = as_block(block)?;
        match self {
            Self::Aes128(c) => c.decrypt_block(block),
            Self::Aes192(c) => c.decrypt_block(block),
            Self::Aes256(c) => c.decrypt_block(block),
        }
        Ok(())
    }
}

fn as_block(block: &mut [u8]) -> Result<&mut Block, CryptoError> {
    if block.len() != BLOCK_SIZE {
        return Err(CryptoError::CipherTransformFailure(format!(
            "block must be {BLOCK_SIZE} bytes, got {}",
            block.len()
        )));
    }
    Ok(GenericArray::from_mut_slice(block))
}

/// XOR `mask` into `block`. Both are one block long.
pub fn xor_block(block: &mut [u8], mask: &[u8]) {
    for (b, m) in block.iter_mut().zip(mask) {
        *b ^= m;
    }
}
