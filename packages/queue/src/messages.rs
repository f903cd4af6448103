//! Message types for actor communication.

use ractor::RpcReplyPort;
use ticket_core::{JobId, JobResult, JobSpec, QueueConfig, QueueCounts, QueuedJob, QueueSnapshot};

/// Messages for the QueueActor.
#[derive(Debug)]
pub enum QueueMessage {
    /// Add a job to this queue. Idempotent per job id.
    Enqueue {
        spec: Box<JobSpec>,
        reply: RpcReplyPort<Result<QueuedJob, String>>,
    },

    /// Request the next runnable job for a worker.
    RequestJob {
        worker_id: String,
        reply: RpcReplyPort<Option<QueuedJob>>,
    },

    /// Report job completion.
    JobCompleted {
        job_id: JobId,
        worker_id: String,
        result: JobResult,
    },

    /// Report job failure.
    JobFailed {
        job_id: JobId,
        worker_id: String,
        error: String,
    },

    /// Remove a job by id. Replies whether anything was removed.
    RemoveJob {
        job_id: JobId,
        reply: RpcReplyPort<bool>,
    },

    /// Get a job by ID.
    GetJob {
        job_id: JobId,
        reply: RpcReplyPort<Option<QueuedJob>>,
    },

    /// Get job counts by state.
    GetCounts { reply: RpcReplyPort<QueueCounts> },

    /// Get the queue's name, state and counts.
    GetSnapshot { reply: RpcReplyPort<QueueSnapshot> },

    /// Stop handing out jobs; enqueueing stays allowed.
    Pause,

    /// Resume handing out jobs.
    Resume,

    /// Periodic tick: promote due delayed jobs.
    Tick,

    /// Shutdown the queue.
    Shutdown,
}

/// Messages for the WorkerActor.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Start working on a job.
    ProcessJob { job: Box<QueuedJob> },

    /// Check if worker is idle.
    IsIdle { reply: RpcReplyPort<bool> },

    /// Shutdown the worker.
    Shutdown,

    /// Heartbeat tick.
    Heartbeat,
}

/// Messages for the Supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Create a new named queue and its worker pool.
    CreateQueue {
        name: String,
        config: QueueConfig,
        reply: RpcReplyPort<Result<(), String>>,
    },

    /// Add a job to a named queue.
    Enqueue {
        queue: String,
        spec: Box<JobSpec>,
        reply: RpcReplyPort<Result<QueuedJob, String>>,
    },

    /// Remove a job from a named queue.
    RemoveJob {
        queue: String,
        job_id: JobId,
        reply: RpcReplyPort<Result<bool, String>>,
    },

    /// Get a job from a named queue.
    GetJob {
        queue: String,
        job_id: JobId,
        reply: RpcReplyPort<Result<Option<QueuedJob>, String>>,
    },

    /// Get a named queue's job counts.
    GetCounts {
        queue: String,
        reply: RpcReplyPort<Result<QueueCounts, String>>,
    },

    /// Snapshot every queue for the admin surface.
    ListQueues { reply: RpcReplyPort<Vec<QueueSnapshot>> },

    /// Pause a named queue.
    PauseQueue {
        queue: String,
        reply: RpcReplyPort<Result<(), String>>,
    },

    /// Resume a named queue.
    ResumeQueue {
        queue: String,
        reply: RpcReplyPort<Result<(), String>>,
    },

    /// Shutdown all queues.
    Shutdown,
}
