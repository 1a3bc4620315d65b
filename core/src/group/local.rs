//! In-process worker group: one scoped thread per rank, wired with
//! crossbeam channels.
//!
//! Established once per run and torn down when every worker returns. A
//! worker that fails (or panics) broadcasts an abort before it exits, which
//! is what makes failure group-wide.

use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use crossbeam::channel::unbounded;
use tracing::{debug, error};

use crate::constants::MAX_WORKERS;
use crate::group::comm::WorkerHandle;
use crate::group::types::{Envelope, GroupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalGroup {
    size: usize,
}

impl LocalGroup {
    pub fn new(size: usize) -> Result<Self, GroupError> {
        if size == 0 {
            return Err(GroupError::EmptyGroup);
        }
        if size > MAX_WORKERS {
            return Err(GroupError::InvalidCollective(format!(
                "group of {size} exceeds the {MAX_WORKERS}-worker limit"
            )));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Build a fully connected set of handles, one per rank.
    pub fn handles(&self) -> Vec<WorkerHandle> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..self.size).map(|_| unbounded::<Envelope>()).unzip();

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| {
                let peers = senders
                    .iter()
                    .enumerate()
                    .map(|(peer, tx)| (peer != rank).then(|| tx.clone()))
                    .collect();
                WorkerHandle::new(rank, inbox, peers)
            })
            .collect()
    }

    /// Run `f` on every rank and return the per-rank results in rank order.
    ///
    /// A worker whose `f` returns `Err` or panics aborts the group, unless it
    /// is itself failing because of an abort it received.
    pub fn run<T, E, F>(&self, f: F) -> Vec<Result<T, E>>
    where
        F: Fn(&mut WorkerHandle) -> Result<T, E> + Sync,
        T: Send,
        E: From<GroupError> + Display + Send,
    {
        let handles = self.handles();
        let f = &f;

        thread::scope(|scope| {
            let joins: Vec<_> = handles
                .into_iter()
                .map(|mut handle| {
                    scope.spawn(move || {
                        let rank = handle.rank();
                        debug!("[WORKER-{rank}] starting");
                        let result = match catch_unwind(AssertUnwindSafe(|| f(&mut handle))) {
                            Ok(Ok(value)) => Ok(value),
                            Ok(Err(e)) => {
                                if !handle.abort_seen() {
                                    handle.abort(&e.to_string());
                                }
                                Err(e)
                            }
                            Err(_) => {
                                error!("[WORKER-{rank}] panicked");
                                handle.abort("worker panicked");
                                Err(E::from(GroupError::WorkerPanicked { rank }))
                            }
                        };
                        debug!("[WORKER-{rank}] finished");
                        result
                    })
                })
                .collect();

            joins
                .into_iter()
                .enumerate()
                .map(|(rank, join)| {
                    join.join()
                        .unwrap_or_else(|_| Err(E::from(GroupError::WorkerPanicked { rank })))
                })
                .collect()
        })
    }
}
