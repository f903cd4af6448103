//! SurrealDB integration for the ticket tracker.
//!
//! This crate provides database connectivity and repositories for
//! persisting tickets and the job queue's live jobs.
//!
//! # Features
//!
//! - `memory` (default): in-memory storage for development and tests
//! - `rocksdb`: RocksDB for persistent file-based storage
//!
//! Connections are explicit handles: `connect` returns a [`Database`] that
//! callers pass into repositories, so nothing in this crate is ambient state.

mod connection;
mod schema;
pub mod repositories;

pub use connection::{connect, Database, DbConfig, DbError};
pub use schema::init_schema;

/// Connect and initialize the schema in one step.
///
/// This is what application startup and tests call.
pub async fn init(config: &DbConfig) -> Result<Database, DbError> {
    let db = connect(config).await?;
    init_schema(&db).await?;
    Ok(db)
}
