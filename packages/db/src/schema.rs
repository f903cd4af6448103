//! Database schema definitions using SurrealQL.

use crate::{Database, DbError};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema(db: &Database) -> Result<(), DbError> {
    tracing::info!("Initializing database schema...");

    db.query(TICKET_SCHEMA).await?;
    db.query(JOB_SCHEMA).await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Ticket table schema.
const TICKET_SCHEMA: &str = r#"
-- Ticket table for tracked work items
DEFINE TABLE IF NOT EXISTS ticket SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS title ON ticket TYPE string;
DEFINE FIELD IF NOT EXISTS description ON ticket TYPE string;
DEFINE FIELD IF NOT EXISTS priority ON ticket TYPE string DEFAULT "LOW";
DEFINE FIELD IF NOT EXISTS status ON ticket TYPE string DEFAULT "OPEN";
DEFINE FIELD IF NOT EXISTS created_at ON ticket TYPE datetime DEFAULT time::now();
DEFINE FIELD IF NOT EXISTS updated_at ON ticket TYPE datetime DEFAULT time::now();

-- Indexes for filtered listings
DEFINE INDEX IF NOT EXISTS ticket_status ON ticket FIELDS status;
DEFINE INDEX IF NOT EXISTS ticket_priority ON ticket FIELDS priority;
DEFINE INDEX IF NOT EXISTS ticket_created ON ticket FIELDS created_at;
"#;

/// Job table schema, mirroring the queue's live jobs.
const JOB_SCHEMA: &str = r#"
-- Job table for jobs the queue currently holds
DEFINE TABLE IF NOT EXISTS job SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS queue ON job TYPE string;
DEFINE FIELD IF NOT EXISTS name ON job TYPE string;
DEFINE FIELD IF NOT EXISTS payload ON job FLEXIBLE TYPE object;
DEFINE FIELD IF NOT EXISTS state ON job FLEXIBLE TYPE object;
DEFINE FIELD IF NOT EXISTS attempts_made ON job TYPE int DEFAULT 0;
DEFINE FIELD IF NOT EXISTS opts ON job FLEXIBLE TYPE object;
DEFINE FIELD IF NOT EXISTS created_at ON job TYPE datetime DEFAULT time::now();
DEFINE FIELD IF NOT EXISTS updated_at ON job TYPE datetime DEFAULT time::now();

-- Indexes for reload-on-startup queries
DEFINE INDEX IF NOT EXISTS job_queue ON job FIELDS queue;
DEFINE INDEX IF NOT EXISTS job_state ON job FIELDS state.state;
"#;
