//! Server-side initialization for the ticket system.

use std::sync::Arc;

use db::repositories::TicketRepository;
use db::DbConfig;
use queue::{start_supervisor, JobHandlerRegistry, SupervisorMessage};
use ractor::ActorRef;
use thiserror::Error;
use ticket_core::QueueConfig;
use tickets::{
    ConfigError, NotifyHandler, QueueDispatcher, QueueTuning, SlaHandler, TicketService,
};
use tokio::sync::OnceCell;

/// Everything the server functions need, built once per process.
pub struct ServerState {
    pub service: TicketService,
    pub supervisor: ActorRef<SupervisorMessage>,
    pub tuning: QueueTuning,
}

static STATE: OnceCell<ServerState> = OnceCell::const_new();

/// Initialization errors.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Db(#[from] db::DbError),
    #[error("failed to start job queue supervisor: {0}")]
    Spawn(#[from] ractor::SpawnErr),
    #[error("failed to create queue: {0}")]
    Queue(String),
}

/// Initialize the ticket system once and return the shared state.
///
/// Called at the top of every server function; only the first caller pays
/// the startup cost.
pub async fn ensure_initialized() -> Result<&'static ServerState, InitError> {
    STATE.get_or_try_init(init_state).await
}

async fn init_state() -> Result<ServerState, InitError> {
    tracing::info!("Initializing ticket system...");

    let tuning = QueueTuning::from_env()?;
    let db_config = DbConfig::from_env()?;
    let database = db::init(&db_config).await?;

    let store = TicketRepository::new(database.clone());

    let mut handlers = JobHandlerRegistry::new();
    handlers.register(NotifyHandler);
    handlers.register(SlaHandler::new(store.clone()));

    let (supervisor, _handle) = start_supervisor(database, handlers).await?;

    for name in [&tuning.notify_queue, &tuning.sla_queue] {
        create_queue(&supervisor, name).await?;
    }

    let dispatcher = Arc::new(QueueDispatcher::new(supervisor.clone()));
    let service = TicketService::new(store, dispatcher, tuning.clone());

    tracing::info!("Ticket system ready");

    Ok(ServerState {
        service,
        supervisor,
        tuning,
    })
}

async fn create_queue(
    supervisor: &ActorRef<SupervisorMessage>,
    name: &str,
) -> Result<(), InitError> {
    let (tx, rx) = queue::concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::CreateQueue {
            name: name.to_string(),
            config: QueueConfig::default(),
            reply: tx.into(),
        })
        .map_err(|e| InitError::Queue(e.to_string()))?;

    rx.await
        .map_err(|_| InitError::Queue(format!("no reply creating queue '{name}'")))?
        .map_err(InitError::Queue)
}
