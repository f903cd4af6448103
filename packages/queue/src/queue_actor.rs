//! Queue actor managing the jobs of a single named queue.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use db::repositories::JobRepository;
use ractor::{Actor, ActorProcessingErr, ActorRef};
use ticket_core::{JobId, JobState, QueueConfig, QueueCounts, QueueSnapshot, QueueState, QueuedJob};

use crate::messages::QueueMessage;

/// How often the actor promotes due delayed jobs.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Heap entry ordering delayed jobs by due time (earliest first).
#[derive(Debug, Clone)]
struct DelayedEntry {
    run_at: DateTime<Utc>,
    job_id: JobId,
}

impl PartialEq for DelayedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.job_id == other.job_id
    }
}

impl Eq for DelayedEntry {}

impl PartialOrd for DelayedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DelayedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the earliest due job surfaces.
        match other.run_at.cmp(&self.run_at) {
            Ordering::Equal => other.job_id.as_str().cmp(self.job_id.as_str()),
            ord => ord,
        }
    }
}

/// State for the queue actor.
pub struct QueueActorState {
    /// Queue name.
    name: String,
    /// Running or paused.
    state: QueueState,
    config: QueueConfig,
    /// Every live job by id: waiting, delayed, active, and retained terminal.
    /// Doubles as the dedup index for idempotent enqueueing.
    jobs: HashMap<JobId, QueuedJob>,
    /// Jobs ready for a worker, in FIFO order.
    ready: VecDeque<JobId>,
    /// Jobs scheduled for the future.
    delayed: BinaryHeap<DelayedEntry>,
    /// Jobs handed to a worker.
    active: HashSet<JobId>,
    /// Retained terminally failed jobs, oldest first, for retention eviction.
    failed_order: VecDeque<JobId>,
    completed_total: u64,
    failed_total: u64,
    /// Durable mirror of live jobs.
    repo: JobRepository,
}

impl QueueActorState {
    pub fn new(name: impl Into<String>, config: QueueConfig, repo: JobRepository) -> Self {
        Self {
            name: name.into(),
            state: QueueState::Running,
            config,
            jobs: HashMap::new(),
            ready: VecDeque::new(),
            delayed: BinaryHeap::new(),
            active: HashSet::new(),
            failed_order: VecDeque::new(),
            completed_total: 0,
            failed_total: 0,
            repo,
        }
    }

    /// Seed the queue with jobs reloaded from the store.
    ///
    /// Jobs that were active when the previous process died go back to
    /// waiting; execution is at-least-once.
    pub fn with_jobs(mut self, jobs: Vec<QueuedJob>) -> Self {
        for mut job in jobs {
            match &job.state {
                JobState::Waiting => {
                    self.ready.push_back(job.id.clone());
                }
                JobState::Delayed { run_at } => {
                    self.delayed.push(DelayedEntry {
                        run_at: *run_at,
                        job_id: job.id.clone(),
                    });
                }
                JobState::Active { .. } => {
                    tracing::info!("Job {} was active at shutdown, requeueing", job.id);
                    job.state = JobState::Waiting;
                    self.ready.push_back(job.id.clone());
                }
                JobState::Failed { .. } => {
                    self.failed_order.push_back(job.id.clone());
                }
                JobState::Completed { .. } => {}
            }
            self.jobs.insert(job.id.clone(), job);
        }
        self
    }

    fn counts(&self) -> QueueCounts {
        let backlog = self.ready.len() as u64;
        QueueCounts {
            waiting: if self.state.is_running() { backlog } else { 0 },
            paused: if self.state.is_running() { 0 } else { backlog },
            active: self.active.len() as u64,
            delayed: self.delayed.len() as u64,
            completed: self.completed_total,
            failed: self.failed_total,
        }
    }
}

/// Queue actor that manages a single named queue.
pub struct QueueActor;

impl Actor for QueueActor {
    type Msg = QueueMessage;
    type State = QueueActorState;
    type Arguments = QueueActorState;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting queue actor: {}", args.name);

        // Drive delayed-job promotion without an external scheduler.
        let myself_clone = myself.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                if myself_clone.send_message(QueueMessage::Tick).is_err() {
                    break;
                }
            }
        });

        Ok(args)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            QueueMessage::Enqueue { spec, reply } => {
                let spec = *spec;

                // Dedup by job id: adding an id that is already live is a
                // no-op returning the existing job.
                if let Some(existing) = state.jobs.get(&spec.id) {
                    tracing::debug!("Job {} already queued, returning existing", spec.id);
                    let _ = reply.send(Ok(existing.clone()));
                    return Ok(());
                }

                let job = QueuedJob::new(state.name.as_str(), spec);

                if let Err(e) = state.repo.create(&job).await {
                    let _ = reply.send(Err(format!("failed to persist job: {e}")));
                    return Ok(());
                }

                match &job.state {
                    JobState::Delayed { run_at } => state.delayed.push(DelayedEntry {
                        run_at: *run_at,
                        job_id: job.id.clone(),
                    }),
                    _ => state.ready.push_back(job.id.clone()),
                }
                state.jobs.insert(job.id.clone(), job.clone());

                tracing::debug!(
                    "Job {} enqueued on '{}' ({})",
                    job.id,
                    state.name,
                    job.state.as_str()
                );
                let _ = reply.send(Ok(job));
            }

            QueueMessage::RequestJob { worker_id, reply } => {
                if !state.state.is_running()
                    || state.active.len() >= state.config.concurrency as usize
                {
                    let _ = reply.send(None);
                    return Ok(());
                }

                let Some(job_id) = state.ready.pop_front() else {
                    let _ = reply.send(None);
                    return Ok(());
                };

                let Some(job) = state.jobs.get_mut(&job_id) else {
                    let _ = reply.send(None);
                    return Ok(());
                };

                let now = Utc::now();
                let previous_attempts = job.attempts_made;
                job.attempts_made = job.attempts_made.saturating_add(1);
                job.state = JobState::Active {
                    started_at: now,
                    worker_id: worker_id.clone(),
                };
                job.updated_at = now;

                if let Err(e) = state
                    .repo
                    .update_state(&job_id, &job.state, job.attempts_made)
                    .await
                {
                    tracing::warn!("Failed to mark job {} active: {}", job_id, e);
                    job.attempts_made = previous_attempts;
                    job.state = JobState::Waiting;
                    job.updated_at = now;
                    state.ready.push_front(job_id);
                    let _ = reply.send(None);
                    return Ok(());
                }

                let job = job.clone();
                state.active.insert(job_id);
                tracing::debug!("Job {} started by {}", job.id, worker_id);
                let _ = reply.send(Some(job));
            }

            QueueMessage::JobCompleted {
                job_id,
                worker_id: _,
                result,
            } => {
                if !state.active.remove(&job_id) {
                    return Ok(());
                }
                let Some(mut job) = state.jobs.remove(&job_id) else {
                    return Ok(());
                };

                state.completed_total += 1;
                tracing::info!("Job {} completed: {}", job_id, result.summary);

                if job.opts.remove_on_complete {
                    if let Err(e) = state.repo.delete(&job_id).await {
                        tracing::warn!("Failed to delete completed job {}: {}", job_id, e);
                    }
                } else {
                    let now = Utc::now();
                    job.state = JobState::Completed {
                        completed_at: now,
                        result,
                    };
                    job.updated_at = now;
                    if let Err(e) = state
                        .repo
                        .update_state(&job_id, &job.state, job.attempts_made)
                        .await
                    {
                        tracing::warn!("Failed to update job {} state: {}", job_id, e);
                    }
                    state.jobs.insert(job_id, job);
                }
            }

            QueueMessage::JobFailed {
                job_id,
                worker_id: _,
                error,
            } => {
                if !state.active.remove(&job_id) {
                    return Ok(());
                }
                let Some(mut job) = state.jobs.remove(&job_id) else {
                    return Ok(());
                };

                let now = Utc::now();
                let will_retry = job.attempts_made < job.opts.attempts;

                if will_retry {
                    let backoff_ms = job
                        .opts
                        .backoff
                        .map(|b| b.delay_for_attempt(job.attempts_made))
                        .unwrap_or(0);
                    tracing::warn!(
                        "Job {} failed on attempt {}/{}, retrying in {}ms: {}",
                        job_id,
                        job.attempts_made,
                        job.opts.attempts,
                        backoff_ms,
                        error
                    );

                    if backoff_ms > 0 {
                        let run_at = now + chrono::Duration::milliseconds(backoff_ms as i64);
                        job.state = JobState::Delayed { run_at };
                        state.delayed.push(DelayedEntry {
                            run_at,
                            job_id: job_id.clone(),
                        });
                    } else {
                        job.state = JobState::Waiting;
                        state.ready.push_back(job_id.clone());
                    }
                    job.updated_at = now;

                    if let Err(e) = state
                        .repo
                        .update_state(&job_id, &job.state, job.attempts_made)
                        .await
                    {
                        tracing::warn!("Failed to update job {} state: {}", job_id, e);
                    }
                    state.jobs.insert(job_id, job);
                } else {
                    state.failed_total += 1;
                    tracing::error!(
                        "Job {} failed after {} attempts: {}",
                        job_id,
                        job.attempts_made,
                        error
                    );

                    job.state = JobState::Failed {
                        failed_at: now,
                        error,
                    };
                    job.updated_at = now;
                    if let Err(e) = state
                        .repo
                        .update_state(&job_id, &job.state, job.attempts_made)
                        .await
                    {
                        tracing::warn!("Failed to update job {} state: {}", job_id, e);
                    }

                    let cap = job.opts.remove_on_fail;
                    state.jobs.insert(job_id.clone(), job);
                    state.failed_order.push_back(job_id);

                    // Retention: keep at most `cap` failed jobs, oldest out first.
                    if let Some(cap) = cap {
                        while state.failed_order.len() > cap as usize {
                            let Some(evicted) = state.failed_order.pop_front() else {
                                break;
                            };
                            state.jobs.remove(&evicted);
                            if let Err(e) = state.repo.delete(&evicted).await {
                                tracing::warn!("Failed to delete evicted job {}: {}", evicted, e);
                            }
                        }
                    }
                }
            }

            QueueMessage::RemoveJob { job_id, reply } => {
                if state.active.contains(&job_id) {
                    tracing::warn!("Job {} is active and cannot be removed", job_id);
                    let _ = reply.send(false);
                    return Ok(());
                }
                if state.jobs.remove(&job_id).is_none() {
                    let _ = reply.send(false);
                    return Ok(());
                }

                state.ready.retain(|id| id != &job_id);
                state.delayed.retain(|entry| entry.job_id != job_id);
                state.failed_order.retain(|id| id != &job_id);

                if let Err(e) = state.repo.delete(&job_id).await {
                    tracing::warn!("Failed to delete removed job {}: {}", job_id, e);
                }

                tracing::debug!("Job {} removed from '{}'", job_id, state.name);
                let _ = reply.send(true);
            }

            QueueMessage::GetJob { job_id, reply } => {
                let _ = reply.send(state.jobs.get(&job_id).cloned());
            }

            QueueMessage::GetCounts { reply } => {
                let _ = reply.send(state.counts());
            }

            QueueMessage::GetSnapshot { reply } => {
                let _ = reply.send(QueueSnapshot {
                    name: state.name.clone(),
                    state: state.state,
                    counts: state.counts(),
                });
            }

            QueueMessage::Pause => {
                state.state = QueueState::Paused;
                tracing::info!("Queue '{}' paused", state.name);
            }

            QueueMessage::Resume => {
                state.state = QueueState::Running;
                tracing::info!("Queue '{}' resumed", state.name);
            }

            QueueMessage::Tick => {
                let now = Utc::now();
                while let Some(entry) = state.delayed.peek() {
                    if entry.run_at > now {
                        break;
                    }
                    let Some(entry) = state.delayed.pop() else {
                        break;
                    };
                    if let Some(job) = state.jobs.get_mut(&entry.job_id) {
                        job.state = JobState::Waiting;
                        job.updated_at = now;
                        if let Err(e) = state
                            .repo
                            .update_state(&entry.job_id, &job.state, job.attempts_made)
                            .await
                        {
                            tracing::warn!("Failed to promote job {}: {}", entry.job_id, e);
                        }
                        state.ready.push_back(entry.job_id.clone());
                        tracing::debug!("Job {} due, now waiting", entry.job_id);
                    }
                }
            }

            QueueMessage::Shutdown => {
                tracing::info!("Shutting down queue: {}", state.name);
                myself.stop(None);
                return Ok(());
            }
        }

        Ok(())
    }
}
