// ## 📂 File: `src/pipeline/state.rs`

use std::fmt;

use tracing::{debug, warn};

use crate::telemetry::{Stage, TelemetryTimer};

/// Orchestrator states, in the order a successful run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Validate,
    Pad,
    BroadcastSize,
    Partition,
    Distribute,
    Cipher,
    Collect,
    Unpad,
    Write,
    Done,
    Aborted,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Aborted)
    }

    /// Telemetry stage charged while in this state.
    pub fn stage(self) -> Option<Stage> {
        match self {
            PipelineState::Init | PipelineState::Done | PipelineState::Aborted => None,
            PipelineState::Validate => Some(Stage::Validate),
            PipelineState::Pad => Some(Stage::Pad),
            PipelineState::BroadcastSize => Some(Stage::Broadcast),
            PipelineState::Partition => Some(Stage::Partition),
            PipelineState::Distribute => Some(Stage::Distribute),
            PipelineState::Cipher => Some(Stage::Cipher),
            PipelineState::Collect => Some(Stage::Collect),
            PipelineState::Unpad => Some(Stage::Unpad),
            PipelineState::Write => Some(Stage::Write),
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-worker state tracker. Terminal states are sticky.
#[derive(Debug)]
pub struct StateTracker {
    rank: usize,
    state: PipelineState,
}

impl StateTracker {
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            state: PipelineState::Init,
        }
    }

    pub fn current(&self) -> PipelineState {
        self.state
    }

    pub fn advance(&mut self, next: PipelineState) {
        if self.state.is_terminal() {
            return;
        }
        debug!("[WORKER-{}] {} -> {}", self.rank, self.state, next);
        self.state = next;
    }

    /// Enter `next` and run `f`, charging its wall time to the state's stage.
    pub fn run<T>(
        &mut self,
        next: PipelineState,
        timer: &mut TelemetryTimer,
        f: impl FnOnce() -> T,
    ) -> T {
        self.advance(next);
        match next.stage() {
            Some(stage) => timer.time(stage, f),
            None => f(),
        }
    }

    /// Move to `Aborted`, recording where the run stopped.
    pub fn abort(&mut self, reason: &dyn fmt::Display) {
        if self.state.is_terminal() {
            return;
        }
        warn!("[WORKER-{}] aborted in {}: {}", self.rank, self.state, reason);
        self.state = PipelineState::Aborted;
    }
}
