//! Worker actor for executing jobs.

use std::sync::Arc;
use std::time::Duration;

use ractor::{Actor, ActorProcessingErr, ActorRef};
use ticket_core::QueuedJob;

use crate::handler::JobHandlerRegistry;
use crate::messages::{QueueMessage, WorkerMessage};

/// How often an idle worker asks its queue for work.
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// State for the worker actor.
pub struct WorkerActorState {
    /// Unique worker ID.
    pub worker_id: String,
    /// Current job being processed.
    pub current_job: Option<QueuedJob>,
    /// Queue actor reference.
    pub queue: ActorRef<QueueMessage>,
    /// Handler registry.
    pub handlers: Arc<JobHandlerRegistry>,
    /// Whether the worker should continue running.
    pub running: bool,
}

impl WorkerActorState {
    /// Check if the worker is idle.
    pub fn is_idle(&self) -> bool {
        self.current_job.is_none()
    }
}

/// Worker actor arguments.
pub struct WorkerArgs {
    pub worker_id: String,
    pub queue_name: String,
    pub queue: ActorRef<QueueMessage>,
    pub handlers: Arc<JobHandlerRegistry>,
}

/// Worker actor that executes jobs.
pub struct WorkerActor;

impl Actor for WorkerActor {
    type Msg = WorkerMessage;
    type State = WorkerActorState;
    type Arguments = WorkerArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting worker {} for '{}'", args.worker_id, args.queue_name);

        // Start the work loop
        let myself_clone = myself.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(HEARTBEAT_INTERVAL).await;
                if myself_clone.send_message(WorkerMessage::Heartbeat).is_err() {
                    break;
                }
            }
        });

        Ok(WorkerActorState {
            worker_id: args.worker_id,
            current_job: None,
            queue: args.queue,
            handlers: args.handlers,
            running: true,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WorkerMessage::ProcessJob { job } => {
                let job = *job;
                state.current_job = Some(job.clone());

                // Find handler for this job name
                if let Some(handler) = state.handlers.get(&job.name) {
                    let job_id = job.id.clone();
                    let timeout = Duration::from_secs(job.opts.timeout_secs);

                    // Execute with timeout
                    let result = tokio::time::timeout(timeout, handler.handle(&job)).await;

                    match result {
                        Ok(Ok(job_result)) => {
                            state.queue.send_message(QueueMessage::JobCompleted {
                                job_id,
                                worker_id: state.worker_id.clone(),
                                result: job_result,
                            })?;
                        }
                        Ok(Err(error)) => {
                            state.queue.send_message(QueueMessage::JobFailed {
                                job_id,
                                worker_id: state.worker_id.clone(),
                                error,
                            })?;
                        }
                        Err(_) => {
                            state.queue.send_message(QueueMessage::JobFailed {
                                job_id,
                                worker_id: state.worker_id.clone(),
                                error: format!("timed out after {}s", job.opts.timeout_secs),
                            })?;
                        }
                    }
                } else {
                    // No handler registered for this job name
                    state.queue.send_message(QueueMessage::JobFailed {
                        job_id: job.id.clone(),
                        worker_id: state.worker_id.clone(),
                        error: format!("no handler for job: {}", job.name),
                    })?;
                }

                state.current_job = None;
            }

            WorkerMessage::IsIdle { reply } => {
                let _ = reply.send(state.is_idle());
            }

            WorkerMessage::Shutdown => {
                tracing::info!("Shutting down worker: {}", state.worker_id);
                state.running = false;
                myself.stop(None);
                return Ok(());
            }

            WorkerMessage::Heartbeat => {
                if !state.running {
                    myself.stop(None);
                    return Ok(());
                }

                // If idle, request a job
                if state.is_idle() {
                    let timeout = Duration::from_secs(5);
                    let result = ractor::rpc::call(
                        &state.queue,
                        |reply| QueueMessage::RequestJob {
                            worker_id: state.worker_id.clone(),
                            reply,
                        },
                        Some(timeout),
                    )
                    .await;
                    // CallResult can be Success(T), Timeout, or SenderError
                    if let Ok(ractor::rpc::CallResult::Success(Some(job))) = result {
                        myself.send_message(WorkerMessage::ProcessJob { job: Box::new(job) })?;
                    }
                }
            }
        }

        Ok(())
    }
}
