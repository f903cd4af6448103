use db::{Database, DbConfig, DbError};

/// Fresh in-memory database per call, so tests stay isolated.
pub async fn test_db() -> Result<Database, DbError> {
    db::init(&DbConfig::memory()).await
}
