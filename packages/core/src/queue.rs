//! Queue introspection types for the admin surface.

use serde::{Deserialize, Serialize};

/// Current operational state of a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    /// Queue is accepting and processing jobs.
    #[default]
    Running,
    /// Queue still accepts jobs but workers stop pulling.
    Paused,
}

impl QueueState {
    pub fn is_running(&self) -> bool {
        matches!(self, QueueState::Running)
    }
}

impl std::fmt::Display for QueueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueState::Running => write!(f, "running"),
            QueueState::Paused => write!(f, "paused"),
        }
    }
}

/// Configuration for a named queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Number of concurrent workers for this queue.
    pub concurrency: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

impl QueueConfig {
    pub fn with_concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Job counts for a queue, by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueCounts {
    /// Jobs ready for a worker (zero while the queue is paused).
    pub waiting: u64,
    /// Jobs currently executing.
    pub active: u64,
    /// Jobs completed since the queue started.
    pub completed: u64,
    /// Jobs that ran out of attempts since the queue started.
    pub failed: u64,
    /// Jobs scheduled for the future.
    pub delayed: u64,
    /// Jobs held back because the queue is paused.
    pub paused: u64,
}

impl QueueCounts {
    /// Jobs that have yet to run.
    pub fn backlog(&self) -> u64 {
        self.waiting + self.delayed + self.paused
    }

    /// Jobs that finished, either way.
    pub fn processed(&self) -> u64 {
        self.completed + self.failed
    }
}

/// A queue's identity, state and counts, as reported to the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub name: String,
    pub state: QueueState,
    pub counts: QueueCounts,
}
