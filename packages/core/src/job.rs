//! Job types for work dispatched through the background queue.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ticket::TicketId;

/// Identifier for a job, supplied by the caller.
///
/// Ids are deterministic so that enqueueing is idempotent: adding a job whose
/// id is already live in the queue is a no-op returning the existing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the notification job for a ticket's creation.
    pub fn notify(ticket: TicketId) -> Self {
        Self(format!("notify-{ticket}"))
    }

    /// Id of the one-shot SLA check job for a ticket.
    pub fn sla(ticket: TicketId) -> Self {
        Self(format!("sla-{ticket}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Retry backoff policy for failed jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Backoff {
    /// `delay_ms * 2^(attempts_made - 1)` before the next attempt.
    Exponential { delay_ms: u64 },
    /// A constant delay before every retry.
    Fixed { delay_ms: u64 },
}

impl Backoff {
    /// Delay before the retry following the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempts_made: u32) -> u64 {
        match self {
            Backoff::Exponential { delay_ms } => {
                let shift = attempts_made.saturating_sub(1).min(32);
                delay_ms.saturating_mul(1u64 << shift)
            }
            Backoff::Fixed { delay_ms } => *delay_ms,
        }
    }
}

/// Per-job queue options, mirroring the enqueue contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    /// Maximum number of execution attempts before the job fails for good.
    pub attempts: u32,
    /// Backoff applied between attempts.
    pub backoff: Option<Backoff>,
    /// Initial delay before the job becomes runnable.
    pub delay_ms: Option<u64>,
    /// Per-attempt execution timeout.
    pub timeout_secs: u64,
    /// Drop the job record once it completes.
    pub remove_on_complete: bool,
    /// Retain at most this many terminally failed jobs; `None` keeps all.
    pub remove_on_fail: Option<u32>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            attempts: 1,
            backoff: None,
            delay_ms: None,
            timeout_secs: 300,
            remove_on_complete: false,
            remove_on_fail: None,
        }
    }
}

impl JobOptions {
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn remove_on_complete(mut self, remove: bool) -> Self {
        self.remove_on_complete = remove;
        self
    }

    pub fn remove_on_fail(mut self, keep_at_most: u32) -> Self {
        self.remove_on_fail = Some(keep_at_most);
        self
    }
}

/// A job as submitted to the queue: id, routing name, payload and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: JobId,
    /// Job kind, used to route to a handler.
    pub name: String,
    pub payload: serde_json::Value,
    pub opts: JobOptions,
}

impl JobSpec {
    pub fn new(id: JobId, name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id,
            name: name.into(),
            payload,
            opts: JobOptions::default(),
        }
    }

    pub fn with_opts(mut self, opts: JobOptions) -> Self {
        self.opts = opts;
        self
    }
}

/// Current state of a job in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    /// Scheduled for the future; promoted to waiting once due.
    Delayed { run_at: DateTime<Utc> },
    /// Ready to be picked up by a worker.
    #[default]
    Waiting,
    /// Being executed.
    Active {
        started_at: DateTime<Utc>,
        worker_id: String,
    },
    /// Finished successfully (only seen on retained jobs).
    Completed {
        completed_at: DateTime<Utc>,
        result: JobResult,
    },
    /// Out of attempts.
    Failed {
        failed_at: DateTime<Utc>,
        error: String,
    },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }

    /// Get a simple state string for display and storage indexing.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Delayed { .. } => "delayed",
            JobState::Waiting => "waiting",
            JobState::Active { .. } => "active",
            JobState::Completed { .. } => "completed",
            JobState::Failed { .. } => "failed",
        }
    }
}

/// Result of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Human-readable summary of the outcome.
    pub summary: String,
    /// Optional structured output data as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}

impl JobResult {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            output: None,
        }
    }

    pub fn with_output(summary: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            summary: summary.into(),
            output: Some(output),
        }
    }
}

/// A job accepted by a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedJob {
    pub id: JobId,
    /// Name of the queue holding this job.
    pub queue: String,
    pub name: String,
    pub payload: serde_json::Value,
    pub state: JobState,
    /// Number of execution attempts started so far.
    #[serde(default)]
    pub attempts_made: u32,
    pub opts: JobOptions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QueuedJob {
    /// Accept a spec into the given queue, delayed when the options say so.
    pub fn new(queue: impl Into<String>, spec: JobSpec) -> Self {
        let now = Utc::now();
        let state = match spec.opts.delay_ms {
            Some(ms) if ms > 0 => JobState::Delayed {
                run_at: now + Duration::milliseconds(ms as i64),
            },
            _ => JobState::Waiting,
        };
        Self {
            id: spec.id,
            queue: queue.into(),
            name: spec.name,
            payload: spec.payload,
            state,
            attempts_made: 0,
            opts: spec.opts,
            created_at: now,
            updated_at: now,
        }
    }

    /// When a delayed job becomes runnable, if it is delayed.
    pub fn run_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            JobState::Delayed { run_at } => Some(*run_at),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_deterministic_per_ticket() {
        let ticket = TicketId::new();
        assert_eq!(JobId::notify(ticket).as_str(), format!("notify-{ticket}"));
        assert_eq!(JobId::sla(ticket).as_str(), format!("sla-{ticket}"));
        assert_eq!(JobId::sla(ticket), JobId::sla(ticket));
    }

    #[test]
    fn exponential_backoff_doubles_per_attempt() {
        let backoff = Backoff::Exponential { delay_ms: 1000 };
        assert_eq!(backoff.delay_for_attempt(1), 1000);
        assert_eq!(backoff.delay_for_attempt(2), 2000);
        assert_eq!(backoff.delay_for_attempt(3), 4000);

        let fixed = Backoff::Fixed { delay_ms: 250 };
        assert_eq!(fixed.delay_for_attempt(5), 250);
    }

    #[test]
    fn delay_option_schedules_the_job() {
        let spec = JobSpec::new(JobId::new("sla-x"), "sla", serde_json::Value::Null)
            .with_opts(JobOptions::default().with_delay_ms(60_000));
        let job = QueuedJob::new("ticket-sla", spec);
        let run_at = job.run_at().expect("job should be delayed");
        assert!(run_at > Utc::now());

        let immediate = QueuedJob::new(
            "ticket-notify",
            JobSpec::new(JobId::new("notify-x"), "notify", serde_json::Value::Null),
        );
        assert_eq!(immediate.state, JobState::Waiting);
    }
}
