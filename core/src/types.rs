use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::group::GroupError;

/// Unified pipeline error covering I/O, cipher and group failures.
/// - `From<T>` impls enable `?` across the layers.
/// - Every variant is fatal to the whole run.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("cannot open file {}: {source}", path.display())]
    FileUnreadable { path: PathBuf, source: io::Error },

    #[error("cannot open output file {}: {source}", path.display())]
    FileUnwritable { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Group(#[from] GroupError),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingArgument,
    InvalidKeyLength,
    InvalidIvFormat,
    FileUnreadable,
    FileUnwritable,
    UnsupportedCipherConfig,
    CipherTransformFailure,
    InvalidPadding,
    ProtocolSizeMismatch,
    GroupAborted,
    Validation,
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::FileUnreadable { .. } => ErrorKind::FileUnreadable,
            StreamError::FileUnwritable { .. } => ErrorKind::FileUnwritable,
            StreamError::Crypto(e) => match e {
                CryptoError::MissingArgument(_) => ErrorKind::MissingArgument,
                CryptoError::InvalidKeyLength { .. } => ErrorKind::InvalidKeyLength,
                CryptoError::InvalidIvFormat(_) => ErrorKind::InvalidIvFormat,
                CryptoError::UnsupportedCipherConfig(_) => ErrorKind::UnsupportedCipherConfig,
                CryptoError::CipherTransformFailure(_) => ErrorKind::CipherTransformFailure,
                CryptoError::InvalidPadding => ErrorKind::InvalidPadding,
            },
            StreamError::Group(e) => match e {
                GroupError::ProtocolSizeMismatch(_) => ErrorKind::ProtocolSizeMismatch,
                GroupError::Aborted { .. }
                | GroupError::Disconnected { .. }
                | GroupError::WorkerPanicked { .. } => ErrorKind::GroupAborted,
                GroupError::EmptyGroup | GroupError::InvalidCollective(_) => ErrorKind::Validation,
            },
            StreamError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// True when this worker failed only because a peer cancelled the group.
    pub fn is_peer_abort(&self) -> bool {
        matches!(
            self,
            StreamError::Group(GroupError::Aborted { .. }) | StreamError::Group(GroupError::Disconnected { .. })
        )
    }
}
