// ## 📂 File: `src/crypto/types.rs`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{IV_HEX_LEN, KEY_BITS};

/// Block cipher mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherMode {
    /// Chained mode, requires an IV.
    Cbc,
    /// Independent-block mode.
    Ecb,
}

impl CipherMode {
    pub fn requires_iv(self) -> bool {
        matches!(self, CipherMode::Cbc)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CipherMode::Cbc => "cbc",
            CipherMode::Ecb => "ecb",
        })
    }
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cbc" => Ok(CipherMode::Cbc),
            "ecb" => Ok(CipherMode::Ecb),
            other => Err(CryptoError::UnsupportedCipherConfig(format!("unknown mode '{other}'"))),
        }
    }
}

/// AES key strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyStrength {
    Aes128,
    Aes192,
    Aes256,
}

impl KeyStrength {
    pub fn from_bits(bits: usize) -> Result<Self, CryptoError> {
        match bits {
            128 => Ok(KeyStrength::Aes128),
            192 => Ok(KeyStrength::Aes192),
            256 => Ok(KeyStrength::Aes256),
            other => Err(CryptoError::UnsupportedCipherConfig(format!(
                "unsupported key length: {other} bits, must be one of {KEY_BITS:?}"
            ))),
        }
    }

    pub fn bits(self) -> usize {
        match self {
            KeyStrength::Aes128 => 128,
            KeyStrength::Aes192 => 192,
            KeyStrength::Aes256 => 256,
        }
    }

    /// Key length in bytes (`bits / 8`).
    pub fn key_len(self) -> usize {
        self.bits() / 8
    }
}

impl fmt::Display for KeyStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aes-{}", self.bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        })
    }
}

impl FromStr for Operation {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encrypt" => Ok(Operation::Encrypt),
            "decrypt" => Ok(Operation::Decrypt),
            other => Err(CryptoError::UnsupportedCipherConfig(format!(
                "unknown operation '{other}'"
            ))),
        }
    }
}

/// How CBC chaining is applied across blocks.
///
/// `PerBlock` resets the chain to the IV on every block, so each block is
/// `E(P ^ IV)`. This is the tool's historical format and keeps encryption
/// embarrassingly parallel. `Standard` is textbook CBC over the whole file.
/// ECB ignores this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chaining {
    #[default]
    PerBlock,
    Standard,
}

impl fmt::Display for Chaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Chaining::PerBlock => "per-block",
            Chaining::Standard => "standard",
        })
    }
}

impl FromStr for Chaining {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-block" | "perblock" => Ok(Chaining::PerBlock),
            "standard" => Ok(Chaining::Standard),
            other => Err(CryptoError::UnsupportedCipherConfig(format!(
                "unknown chaining '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    /// A required input was not supplied.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Key length does not match the declared key strength.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// IV is not exactly one block of hex.
    #[error("IV must be {IV_HEX_LEN} hex characters (16 bytes) in CBC mode: {0}")]
    InvalidIvFormat(String),

    /// Mode / key strength / IV combination the engine cannot build.
    #[error("unsupported cipher configuration: {0}")]
    UnsupportedCipherConfig(String),

    /// A block transform failed inside a cipher unit.
    #[error("cipher transform failed: {0}")]
    CipherTransformFailure(String),

    /// Trailing padding is malformed (corrupt input or wrong key).
    #[error("invalid PKCS#7 padding")]
    InvalidPadding,
}
