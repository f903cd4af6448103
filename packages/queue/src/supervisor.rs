//! Supervisor actor managing all named queues and their workers.

use std::collections::HashMap;
use std::sync::Arc;

use db::repositories::JobRepository;
use db::Database;
use ractor::{Actor, ActorProcessingErr, ActorRef, SupervisionEvent};
use ticket_core::QueueConfig;

use crate::handler::JobHandlerRegistry;
use crate::messages::{QueueMessage, SupervisorMessage};
use crate::queue_actor::{QueueActor, QueueActorState};
use crate::worker_actor::{WorkerActor, WorkerArgs};

/// State for the supervisor actor.
pub struct SupervisorState {
    /// Queue actors by name.
    queues: HashMap<String, ActorRef<QueueMessage>>,
    /// Handler registry shared by all workers.
    handlers: Arc<JobHandlerRegistry>,
    /// Database handle, used to build each queue's job repository.
    db: Database,
    /// Worker counter for unique IDs.
    worker_counter: u64,
}

impl SupervisorState {
    fn new(db: Database, handlers: JobHandlerRegistry) -> Self {
        Self {
            queues: HashMap::new(),
            handlers: Arc::new(handlers),
            db,
            worker_counter: 0,
        }
    }

    fn next_worker_id(&mut self) -> String {
        self.worker_counter += 1;
        format!("worker-{}", self.worker_counter)
    }
}

/// Supervisor arguments.
pub struct SupervisorArgs {
    pub db: Database,
    pub handlers: JobHandlerRegistry,
}

async fn spawn_queue_actor(
    state: &mut SupervisorState,
    name: &str,
    config: QueueConfig,
) -> Result<ActorRef<QueueMessage>, ActorProcessingErr> {
    let repo = JobRepository::new(state.db.clone());

    // Pick up jobs the previous process left open.
    let persisted = match repo.list_open(name).await {
        Ok(jobs) => jobs,
        Err(e) => {
            tracing::warn!("Failed to reload jobs for queue '{}': {}", name, e);
            Vec::new()
        }
    };
    if !persisted.is_empty() {
        tracing::info!("Reloaded {} open jobs for queue '{}'", persisted.len(), name);
    }

    let queue_state = QueueActorState::new(name, config, repo).with_jobs(persisted);

    let (actor, _handle) = Actor::spawn(None, QueueActor, queue_state)
        .await
        .map_err(|e| ActorProcessingErr::from(format!("failed to spawn queue: {e}")))?;

    for _ in 0..config.concurrency.max(1) {
        let worker_id = state.next_worker_id();
        let args = WorkerArgs {
            worker_id,
            queue_name: name.to_string(),
            queue: actor.clone(),
            handlers: state.handlers.clone(),
        };

        Actor::spawn(None, WorkerActor, args).await.ok();
    }

    state.queues.insert(name.to_string(), actor.clone());

    Ok(actor)
}

/// Supervisor actor that manages all queues.
pub struct Supervisor;

impl Actor for Supervisor {
    type Msg = SupervisorMessage;
    type State = SupervisorState;
    type Arguments = SupervisorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting job queue supervisor");
        Ok(SupervisorState::new(args.db, args.handlers))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisorMessage::CreateQueue {
                name,
                config,
                reply,
            } => {
                if state.queues.contains_key(&name) {
                    let _ = reply.send(Err(format!("queue '{name}' already exists")));
                    return Ok(());
                }

                match spawn_queue_actor(state, &name, config).await {
                    Ok(_) => {
                        tracing::info!(
                            "Queue '{}' created ({} workers)",
                            name,
                            config.concurrency.max(1)
                        );
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(format!("failed to spawn queue: {e}")));
                    }
                }
            }

            SupervisorMessage::Enqueue { queue, spec, reply } => {
                let Some(queue_ref) = state.queues.get(&queue) else {
                    let _ = reply.send(Err(format!("queue not found: {queue}")));
                    return Ok(());
                };

                let (tx, rx) = ractor::concurrency::oneshot();
                queue_ref.send_message(QueueMessage::Enqueue {
                    spec,
                    reply: tx.into(),
                })?;
                match rx.await {
                    Ok(result) => {
                        let _ = reply.send(result);
                    }
                    Err(_) => {
                        let _ = reply.send(Err("queue did not reply".into()));
                    }
                }
            }

            SupervisorMessage::RemoveJob {
                queue,
                job_id,
                reply,
            } => {
                let Some(queue_ref) = state.queues.get(&queue) else {
                    let _ = reply.send(Err(format!("queue not found: {queue}")));
                    return Ok(());
                };

                let (tx, rx) = ractor::concurrency::oneshot();
                queue_ref.send_message(QueueMessage::RemoveJob {
                    job_id,
                    reply: tx.into(),
                })?;
                match rx.await {
                    Ok(removed) => {
                        let _ = reply.send(Ok(removed));
                    }
                    Err(_) => {
                        let _ = reply.send(Err("queue did not reply".into()));
                    }
                }
            }

            SupervisorMessage::GetJob {
                queue,
                job_id,
                reply,
            } => {
                let Some(queue_ref) = state.queues.get(&queue) else {
                    let _ = reply.send(Err(format!("queue not found: {queue}")));
                    return Ok(());
                };

                let (tx, rx) = ractor::concurrency::oneshot();
                queue_ref.send_message(QueueMessage::GetJob {
                    job_id,
                    reply: tx.into(),
                })?;
                match rx.await {
                    Ok(job) => {
                        let _ = reply.send(Ok(job));
                    }
                    Err(_) => {
                        let _ = reply.send(Err("queue did not reply".into()));
                    }
                }
            }

            SupervisorMessage::GetCounts { queue, reply } => {
                let Some(queue_ref) = state.queues.get(&queue) else {
                    let _ = reply.send(Err(format!("queue not found: {queue}")));
                    return Ok(());
                };

                let (tx, rx) = ractor::concurrency::oneshot();
                queue_ref.send_message(QueueMessage::GetCounts { reply: tx.into() })?;
                match rx.await {
                    Ok(counts) => {
                        let _ = reply.send(Ok(counts));
                    }
                    Err(_) => {
                        let _ = reply.send(Err("queue did not reply".into()));
                    }
                }
            }

            SupervisorMessage::ListQueues { reply } => {
                let mut snapshots = Vec::new();
                for queue_ref in state.queues.values() {
                    let (tx, rx) = ractor::concurrency::oneshot();
                    if queue_ref
                        .send_message(QueueMessage::GetSnapshot { reply: tx.into() })
                        .is_ok()
                        && let Ok(snapshot) = rx.await
                    {
                        snapshots.push(snapshot);
                    }
                }
                snapshots.sort_by(|a, b| a.name.cmp(&b.name));
                let _ = reply.send(snapshots);
            }

            SupervisorMessage::PauseQueue { queue, reply } => {
                if let Some(queue_ref) = state.queues.get(&queue) {
                    queue_ref.send_message(QueueMessage::Pause)?;
                    let _ = reply.send(Ok(()));
                } else {
                    let _ = reply.send(Err(format!("queue not found: {queue}")));
                }
            }

            SupervisorMessage::ResumeQueue { queue, reply } => {
                if let Some(queue_ref) = state.queues.get(&queue) {
                    queue_ref.send_message(QueueMessage::Resume)?;
                    let _ = reply.send(Ok(()));
                } else {
                    let _ = reply.send(Err(format!("queue not found: {queue}")));
                }
            }

            SupervisorMessage::Shutdown => {
                tracing::info!("Shutting down supervisor");
                for queue_ref in state.queues.values() {
                    let _ = queue_ref.send_message(QueueMessage::Shutdown);
                }
                myself.stop(None);
                return Ok(());
            }
        }

        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: SupervisionEvent,
        _state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let SupervisionEvent::ActorTerminated(cell, _, reason) = message {
            tracing::warn!(
                "Child actor {} terminated: {:?}",
                cell.get_name().unwrap_or_default(),
                reason
            );
        }
        Ok(())
    }
}

/// Start the supervisor over the given database and handler registry.
pub async fn start_supervisor(
    db: Database,
    handlers: JobHandlerRegistry,
) -> Result<(ActorRef<SupervisorMessage>, tokio::task::JoinHandle<()>), ractor::SpawnErr> {
    let (actor, handle) = Actor::spawn(None, Supervisor, SupervisorArgs { db, handlers }).await?;

    Ok((actor, handle))
}
