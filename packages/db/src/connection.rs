//! Database connection management.

use surrealdb::engine::any::{connect as connect_any, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use thiserror::Error;

/// Database connection handle, cheap to clone.
pub type Database = Surreal<Any>;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection mode: "mem://", "file://path" or "rocksdb://path"
    pub endpoint: String,
    /// Namespace to use
    pub namespace: String,
    /// Database name to use
    pub database: String,
    /// Optional root credentials for authentication
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "ticketdesk".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }
}

impl DbConfig {
    /// Create a config for in-memory storage.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a config for file-based persistence.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            endpoint: format!("file://{}", path.into()),
            ..Default::default()
        }
    }

    /// Create a config for RocksDB persistence (requires the rocksdb feature).
    pub fn rocksdb(path: impl Into<String>) -> Self {
        Self {
            endpoint: format!("rocksdb://{}", path.into()),
            ..Default::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set root credentials for authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Build a config from environment variables.
    ///
    /// - `TICKETDESK_DB_ENDPOINT` (default `mem://`)
    /// - `TICKETDESK_DB_NAMESPACE`, `TICKETDESK_DB_DATABASE`
    /// - `TICKETDESK_DB_USER` / `TICKETDESK_DB_PASSWORD` (both or neither)
    pub fn from_env() -> Result<Self, DbError> {
        let mut config = Self::default();

        if let Some(endpoint) = env_non_empty("TICKETDESK_DB_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(namespace) = env_non_empty("TICKETDESK_DB_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Some(database) = env_non_empty("TICKETDESK_DB_DATABASE") {
            config.database = database;
        }

        let user = env_non_empty("TICKETDESK_DB_USER");
        let password = env_non_empty("TICKETDESK_DB_PASSWORD");
        config.credentials = match (user, password) {
            (Some(user), Some(password)) => Some((user, password)),
            (None, None) => None,
            _ => {
                return Err(DbError::InvalidConfig(
                    "TICKETDESK_DB_USER and TICKETDESK_DB_PASSWORD must be set together".into(),
                ));
            }
        };

        Ok(config)
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid database config: {0}")]
    InvalidConfig(String),
    #[error("connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("query error: {0}")]
    Query(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Open a connection and select the configured namespace/database.
pub async fn connect(config: &DbConfig) -> Result<Database, DbError> {
    tracing::info!("Connecting to database: {}", config.endpoint);

    let db = connect_any(&config.endpoint).await?;

    // Authenticate if credentials provided
    if let Some((username, password)) = &config.credentials {
        db.signin(Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await?;
    }

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    tracing::info!(
        "Connected to database: {}/{}",
        config.namespace,
        config.database
    );

    Ok(db)
}
