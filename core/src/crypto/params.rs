//! Cipher parameters: validated key, IV, mode and operation.
//!
//! Validation happens once, here, before any group or cipher work starts.

use std::fmt;

use zeroize::Zeroizing;

use crate::constants::{IV_HEX_LEN, IV_LEN};
use crate::crypto::types::{Chaining, CipherMode, CryptoError, KeyStrength, Operation};

/// Immutable cipher configuration shared (by clone) with every worker.
#[derive(Clone)]
pub struct CipherParams {
    pub mode: CipherMode,
    pub strength: KeyStrength,
    pub operation: Operation,
    pub chaining: Chaining,
    key: Zeroizing<Vec<u8>>,
    iv: Option<[u8; IV_LEN]>,
}

impl CipherParams {
    /// Build parameters from raw key bytes and an optional binary IV.
    ///
    /// - key length must equal `strength.key_len()`
    /// - CBC requires an IV; ECB ignores one if given
    pub fn new(
        mode: CipherMode,
        strength: KeyStrength,
        key: &[u8],
        iv: Option<[u8; IV_LEN]>,
        operation: Operation,
    ) -> Result<Self, CryptoError> {
        if key.len() != strength.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                expected: strength.key_len(),
                actual: key.len(),
            });
        }

        let iv = if mode.requires_iv() {
            Some(iv.ok_or(CryptoError::MissingArgument("iv"))?)
        } else {
            None
        };

        Ok(Self {
            mode,
            strength,
            operation,
            chaining: Chaining::default(),
            key: Zeroizing::new(key.to_vec()),
            iv,
        })
    }

    /// Build parameters from the textual command-line surface.
    ///
    /// The key is taken as raw text up to the first CR or LF. The IV is
    /// 32 hex characters and only read in CBC mode.
    pub fn from_text(
        mode: CipherMode,
        key_bits: usize,
        key_text: &str,
        iv_hex: Option<&str>,
        operation: Operation,
    ) -> Result<Self, CryptoError> {
        let strength = KeyStrength::from_bits(key_bits)?;
        let key = strip_line_ending(key_text);

        let iv = match mode {
            CipherMode::Cbc => {
                let hex_text = iv_hex.ok_or(CryptoError::MissingArgument("iv"))?;
                Some(parse_iv_hex(hex_text)?)
            }
            CipherMode::Ecb => None,
        };

        Self::new(mode, strength, key.as_bytes(), iv, operation)
    }

    pub fn with_chaining(mut self, chaining: Chaining) -> Self {
        self.chaining = chaining;
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Textbook CBC: shards need the ciphertext block that precedes them.
    pub fn is_chained(&self) -> bool {
        self.mode == CipherMode::Cbc && self.chaining == Chaining::Standard
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> Option<&[u8; IV_LEN]> {
        self.iv.as_ref()
    }
}

// Never print key material.
impl fmt::Debug for CipherParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherParams")
            .field("mode", &self.mode)
            .field("strength", &self.strength)
            .field("operation", &self.operation)
            .field("chaining", &self.chaining)
            .field("has_iv", &self.iv.is_some())
            .finish()
    }
}

/// Truncate at the first CR or LF.
pub fn strip_line_ending(text: &str) -> &str {
    match text.find(['\r', '\n']) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Decode a 32-character hex IV.
pub fn parse_iv_hex(hex_text: &str) -> Result<[u8; IV_LEN], CryptoError> {
    if hex_text.len() != IV_HEX_LEN {
        return Err(CryptoError::InvalidIvFormat(format!(
            "got {} characters",
            hex_text.len()
        )));
    }
    let mut iv = [0u8; IV_LEN];
    hex::decode_to_slice(hex_text, &mut iv)
        .map_err(|e| CryptoError::InvalidIvFormat(e.to_string()))?;
    Ok(iv)
}
