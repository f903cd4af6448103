//! Job repository mirroring the queue's live jobs.
//!
//! The queue actors own job lifecycle in memory; every transition is written
//! through here so open jobs survive a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use ticket_core::{JobId, JobOptions, JobState, QueuedJob};

use crate::{Database, DbError};

/// Repository for job persistence operations.
#[derive(Clone)]
pub struct JobRepository {
    db: Database,
}

/// Internal record type for SurrealDB reads.
#[derive(Debug, Deserialize)]
struct JobRecord {
    id: Option<Thing>,
    queue: String,
    name: String,
    payload: serde_json::Value,
    state: JobState,
    #[serde(default)]
    attempts_made: u32,
    opts: JobOptions,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRecord {
    fn into_job(self) -> QueuedJob {
        let id = self.id.as_ref().map(|t| t.id.to_raw()).unwrap_or_default();
        QueuedJob {
            id: JobId::new(id),
            queue: self.queue,
            name: self.name,
            payload: self.payload,
            state: self.state,
            attempts_made: self.attempts_made,
            opts: self.opts,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Struct for creating jobs - omits datetime fields to use SurrealDB defaults.
#[derive(Debug, Serialize)]
struct JobCreate {
    queue: String,
    name: String,
    payload: serde_json::Value,
    state: JobState,
    attempts_made: u32,
    opts: JobOptions,
}

impl JobRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a newly accepted job.
    pub async fn create(&self, job: &QueuedJob) -> Result<(), DbError> {
        let create_data = JobCreate {
            queue: job.queue.clone(),
            name: job.name.clone(),
            payload: job.payload.clone(),
            state: job.state.clone(),
            attempts_made: job.attempts_made,
            opts: job.opts.clone(),
        };

        let record: Option<JobRecord> = self
            .db
            .create(("job", job.id.to_string()))
            .content(create_data)
            .await?;

        record
            .map(|_| ())
            .ok_or_else(|| DbError::Query(format!("failed to persist job {}", job.id)))
    }

    /// Get a job by ID.
    pub async fn get(&self, id: &JobId) -> Result<Option<QueuedJob>, DbError> {
        let record: Option<JobRecord> = self.db.select(("job", id.to_string())).await?;

        Ok(record.map(|r| r.into_job()))
    }

    /// Record a state transition.
    pub async fn update_state(
        &self,
        id: &JobId,
        state: &JobState,
        attempts_made: u32,
    ) -> Result<(), DbError> {
        self.db
            .query(
                "UPDATE type::thing('job', $id) SET state = $state, \
                 attempts_made = $attempts, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("state", state.clone()))
            .bind(("attempts", attempts_made as i64))
            .await?
            .check()
            .map_err(|e| DbError::Query(format!("failed to update job {id}: {e}")))?;

        Ok(())
    }

    /// Delete a job.
    pub async fn delete(&self, id: &JobId) -> Result<(), DbError> {
        let _: Option<JobRecord> = self.db.delete(("job", id.to_string())).await?;

        Ok(())
    }

    /// Load every non-terminal job of a queue, oldest first.
    ///
    /// Used when a queue actor starts, to pick up where the last process
    /// left off.
    pub async fn list_open(&self, queue: &str) -> Result<Vec<QueuedJob>, DbError> {
        let mut result = self
            .db
            .query(
                r#"
                SELECT * FROM job
                WHERE queue = $queue AND state.state IN ["waiting", "delayed", "active"]
                ORDER BY created_at ASC
                "#,
            )
            .bind(("queue", queue.to_string()))
            .await?;

        let records: Vec<JobRecord> = result.take(0)?;

        Ok(records.into_iter().map(|r| r.into_job()).collect())
    }
}
