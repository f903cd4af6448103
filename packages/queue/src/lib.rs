//! Actor system implementing the background job queue.
//!
//! This crate provides the Ractor-based queue the ticket service dispatches
//! jobs to: named queues with delayed scheduling, idempotent job ids,
//! bounded retries with backoff, and per-queue worker pools.
//!
//! # Architecture
//!
//! - `Supervisor` - top-level actor that manages queues by name
//! - `QueueActor` - owns a single queue's waiting/delayed/active jobs
//! - `WorkerActor` - pulls jobs from a queue and runs their handler
//!
//! # Usage
//!
//! ```ignore
//! use queue::{start_supervisor, JobHandlerRegistry, SupervisorMessage};
//!
//! let (supervisor, _handle) = start_supervisor(database, handlers).await?;
//! supervisor.send_message(SupervisorMessage::CreateQueue { .. })?;
//! ```

mod handler;
mod messages;
mod queue_actor;
mod supervisor;
mod worker_actor;

pub use handler::{FnHandler, HandlerFuture, HandlerResult, JobHandler, JobHandlerRegistry};
pub use messages::{QueueMessage, SupervisorMessage, WorkerMessage};
pub use queue_actor::QueueActor;
pub use supervisor::{start_supervisor, Supervisor};
pub use worker_actor::WorkerActor;

/// Re-export ractor types for convenience.
pub use ractor::{concurrency, Actor, ActorRef, RpcReplyPort};
