use bytes::Bytes;
use thiserror::Error;

use crate::constants::BLOCK_SIZE;

#[derive(Debug, Error)]
pub enum GroupError {
    /// A worker group needs at least one member.
    #[error("worker group must have at least one worker")]
    EmptyGroup,

    /// Block-alignment or shard-length violation at a size-check point.
    #[error("protocol size mismatch: {0}")]
    ProtocolSizeMismatch(String),

    /// Another worker failed and cancelled the group.
    #[error("group aborted by worker {origin}: {reason}")]
    Aborted { origin: usize, reason: String },

    /// A peer went away while this worker was waiting on it.
    #[error("worker {rank} lost its peers while waiting for {waiting_for}")]
    Disconnected { rank: usize, waiting_for: &'static str },

    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },

    /// A collective was called with arguments that do not fit the group.
    #[error("invalid collective call: {0}")]
    InvalidCollective(String),
}

/// One worker's portion of a scatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardMessage {
    pub bytes: Bytes,
    /// Ciphertext block preceding this shard (chained decrypt only).
    pub chain_seed: Option<[u8; BLOCK_SIZE]>,
}

impl ShardMessage {
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes, chain_seed: None }
    }
}

/// Message body carried between workers.
#[derive(Debug)]
pub enum Payload {
    Size(u64),
    Shard(ShardMessage),
    ChainSeed([u8; BLOCK_SIZE]),
    Gather(Vec<u8>),
    Abort { reason: String },
}

impl Payload {
    pub fn tag(&self) -> Tag {
        match self {
            Payload::Size(_) => Tag::Size,
            Payload::Shard(_) => Tag::Shard,
            Payload::ChainSeed(_) => Tag::ChainSeed,
            Payload::Gather(_) => Tag::Gather,
            Payload::Abort { .. } => Tag::Abort,
        }
    }
}

/// Payload discriminant used to match receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Size,
    Shard,
    ChainSeed,
    Gather,
    Abort,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Size => "size broadcast",
            Tag::Shard => "shard",
            Tag::ChainSeed => "chain seed",
            Tag::Gather => "gathered shard",
            Tag::Abort => "abort",
        }
    }
}

/// Payload tagged with its sender rank.
#[derive(Debug)]
pub struct Envelope {
    pub from: usize,
    pub payload: Payload,
}
