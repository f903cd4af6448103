//! Job dispatch capability consumed by the ticket service.
//!
//! The service only needs "enqueue a named, optioned job" and "cancel a job
//! by id", so that is the whole trait; any at-least-once delayed-task backend
//! can sit behind it. The production implementation wraps the queue
//! supervisor actor.

use std::future::Future;
use std::pin::Pin;

use queue::SupervisorMessage;
use ractor::ActorRef;
use thiserror::Error;
use ticket_core::{JobId, JobSpec, QueuedJob};

/// Future type returned by dispatcher methods.
pub type DispatchFuture<T> = Pin<Box<dyn Future<Output = Result<T, DispatchError>> + Send>>;

/// Dispatch errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The queue backend could not be reached.
    #[error("job queue unavailable: {0}")]
    Unavailable(String),
    /// The queue backend refused the operation.
    #[error("job queue rejected the request: {0}")]
    Rejected(String),
}

/// Capability to enqueue and cancel background jobs on named queues.
pub trait JobDispatcher: Send + Sync + 'static {
    /// Add a job to the named queue. Idempotent per job id.
    fn enqueue(&self, queue: &str, spec: JobSpec) -> DispatchFuture<QueuedJob>;

    /// Remove a job from the named queue.
    ///
    /// Resolves to whether a job was actually removed; a missing id is not
    /// an error, so cancellation is idempotent.
    fn cancel(&self, queue: &str, job_id: JobId) -> DispatchFuture<bool>;
}

/// Production dispatcher backed by the queue supervisor actor.
pub struct QueueDispatcher {
    supervisor: ActorRef<SupervisorMessage>,
}

impl QueueDispatcher {
    pub fn new(supervisor: ActorRef<SupervisorMessage>) -> Self {
        Self { supervisor }
    }
}

impl JobDispatcher for QueueDispatcher {
    fn enqueue(&self, queue: &str, spec: JobSpec) -> DispatchFuture<QueuedJob> {
        let supervisor = self.supervisor.clone();
        let queue = queue.to_string();

        Box::pin(async move {
            let (tx, rx) = ractor::concurrency::oneshot();
            supervisor
                .send_message(SupervisorMessage::Enqueue {
                    queue,
                    spec: Box::new(spec),
                    reply: tx.into(),
                })
                .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

            rx.await
                .map_err(|_| DispatchError::Unavailable("no reply from job queue".into()))?
                .map_err(DispatchError::Rejected)
        })
    }

    fn cancel(&self, queue: &str, job_id: JobId) -> DispatchFuture<bool> {
        let supervisor = self.supervisor.clone();
        let queue = queue.to_string();

        Box::pin(async move {
            let (tx, rx) = ractor::concurrency::oneshot();
            supervisor
                .send_message(SupervisorMessage::RemoveJob {
                    queue,
                    job_id,
                    reply: tx.into(),
                })
                .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

            rx.await
                .map_err(|_| DispatchError::Unavailable("no reply from job queue".into()))?
                .map_err(DispatchError::Rejected)
        })
    }
}
