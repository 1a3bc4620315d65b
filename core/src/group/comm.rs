//! Per-worker endpoint of the group: explicit rank/size plus channels.
//!
//! Collectives block until the matching message arrives. An `Abort` from
//! any peer ends the wait immediately, so one failing worker cancels every
//! worker still inside a collective.

use std::collections::VecDeque;

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::constants::{BLOCK_SIZE, COORDINATOR};
use crate::group::distribute::collect;
use crate::group::partition::PartitionPlan;
use crate::group::types::{Envelope, GroupError, Payload, ShardMessage, Tag};

pub struct WorkerHandle {
    rank: usize,
    size: usize,
    inbox: Receiver<Envelope>,
    /// Senders indexed by peer rank; `None` in our own slot.
    peers: Vec<Option<Sender<Envelope>>>,
    /// Messages that arrived before they were asked for.
    stash: VecDeque<Envelope>,
    abort_seen: bool,
}

impl WorkerHandle {
    pub(crate) fn new(
        rank: usize,
        inbox: Receiver<Envelope>,
        peers: Vec<Option<Sender<Envelope>>>,
    ) -> Self {
        let size = peers.len();
        Self {
            rank,
            size,
            inbox,
            peers,
            stash: VecDeque::new(),
            abort_seen: false,
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_coordinator(&self) -> bool {
        self.rank == COORDINATOR
    }

    /// True once this worker has received an abort from a peer.
    pub fn abort_seen(&self) -> bool {
        self.abort_seen
    }

    fn send(&self, to: usize, payload: Payload) -> Result<(), GroupError> {
        let tag = payload.tag();
        let sender = self
            .peers
            .get(to)
            .and_then(Option::as_ref)
            .ok_or_else(|| GroupError::InvalidCollective(format!("worker {} cannot send to {to}", self.rank)))?;

        sender
            .send(Envelope { from: self.rank, payload })
            .map_err(|_| GroupError::Disconnected {
                rank: self.rank,
                waiting_for: tag.name(),
            })
    }

    /// Receive the next `tag` message, optionally from a specific sender.
    fn recv(&mut self, tag: Tag, from: Option<usize>) -> Result<Envelope, GroupError> {
        let wanted = |env: &Envelope| env.payload.tag() == tag && from.map_or(true, |f| env.from == f);

        if let Some(pos) = self.stash.iter().position(|e| wanted(e)) {
            if let Some(env) = self.stash.remove(pos) {
                return Ok(env);
            }
        }

        loop {
            let env = self.inbox.recv().map_err(|_| GroupError::Disconnected {
                rank: self.rank,
                waiting_for: tag.name(),
            })?;

            if let Payload::Abort { reason } = env.payload {
                self.abort_seen = true;
                debug!("[GROUP] worker {} received abort from {}", self.rank, env.from);
                return Err(GroupError::Aborted { origin: env.from, reason });
            }

            if wanted(&env) {
                return Ok(env);
            }
            self.stash.push_back(env);
        }
    }

    /// Make the coordinator's value common knowledge.
    ///
    /// The coordinator passes `Some(size)`; everyone else passes `None` and
    /// gets the coordinator's value back.
    pub fn broadcast_size(&mut self, size: Option<u64>) -> Result<u64, GroupError> {
        if self.is_coordinator() {
            let size = size.ok_or_else(|| {
                GroupError::InvalidCollective("coordinator must supply the broadcast size".into())
            })?;
            for peer in (0..self.size).filter(|&r| r != self.rank) {
                self.send(peer, Payload::Size(size))?;
            }
            return Ok(size);
        }

        match self.recv(Tag::Size, Some(COORDINATOR))?.payload {
            Payload::Size(size) => Ok(size),
            other => Err(unexpected(Tag::Size, &other)),
        }
    }

    /// Hand each worker its shard. The coordinator passes one message per
    /// rank (in rank order) and keeps its own.
    pub fn scatter(&mut self, parts: Option<Vec<ShardMessage>>) -> Result<ShardMessage, GroupError> {
        if self.is_coordinator() {
            let parts = parts.ok_or_else(|| {
                GroupError::InvalidCollective("coordinator must supply shards to scatter".into())
            })?;
            if parts.len() != self.size {
                return Err(GroupError::InvalidCollective(format!(
                    "scatter of {} shards in a group of {}",
                    parts.len(),
                    self.size
                )));
            }

            let mut own = None;
            for (rank, part) in parts.into_iter().enumerate() {
                if rank == self.rank {
                    own = Some(part);
                } else {
                    self.send(rank, Payload::Shard(part))?;
                }
            }
            return own.ok_or_else(|| GroupError::InvalidCollective("no shard for coordinator".into()));
        }

        match self.recv(Tag::Shard, Some(COORDINATOR))?.payload {
            Payload::Shard(part) => Ok(part),
            other => Err(unexpected(Tag::Shard, &other)),
        }
    }

    /// Send each worker's output to the coordinator, which assembles them in
    /// plan order. Returns `Some(buffer)` on the coordinator only.
    pub fn gather(&mut self, local: Vec<u8>, plan: &PartitionPlan) -> Result<Option<Vec<u8>>, GroupError> {
        if !self.is_coordinator() {
            self.send(COORDINATOR, Payload::Gather(local))?;
            return Ok(None);
        }

        let mut shards: Vec<Vec<u8>> = Vec::with_capacity(self.size);
        for rank in 0..self.size {
            if rank == self.rank {
                shards.push(Vec::new());
                continue;
            }
            match self.recv(Tag::Gather, Some(rank))?.payload {
                Payload::Gather(bytes) => shards.push(bytes),
                other => return Err(unexpected(Tag::Gather, &other)),
            }
        }
        shards[self.rank] = local;

        collect(&shards, plan).map(Some)
    }

    /// Pass the last ciphertext block to the next rank (chained encrypt).
    pub fn send_chain_seed(&self, to: usize, seed: [u8; BLOCK_SIZE]) -> Result<(), GroupError> {
        self.send(to, Payload::ChainSeed(seed))
    }

    pub fn recv_chain_seed(&mut self, from: usize) -> Result<[u8; BLOCK_SIZE], GroupError> {
        match self.recv(Tag::ChainSeed, Some(from))?.payload {
            Payload::ChainSeed(seed) => Ok(seed),
            other => Err(unexpected(Tag::ChainSeed, &other)),
        }
    }

    /// Cancel the group: tell every peer to stop. Peers that already left
    /// are skipped.
    pub fn abort(&mut self, reason: &str) {
        warn!("[GROUP] worker {} aborting group: {}", self.rank, reason);
        for peer in (0..self.size).filter(|&r| r != self.rank) {
            let _ = self.send(peer, Payload::Abort { reason: reason.to_string() });
        }
    }
}

fn unexpected(expected: Tag, got: &Payload) -> GroupError {
    GroupError::InvalidCollective(format!(
        "expected {}, received {}",
        expected.name(),
        got.tag().name()
    ))
}
