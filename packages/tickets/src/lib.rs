//! Ticket service and background job handlers.
//!
//! This crate owns the ticket lifecycle: the [`TicketService`] orchestrates
//! CRUD against the ticket store and dispatches/cancels background jobs
//! through the [`JobDispatcher`] capability, and the two handlers consume
//! those jobs (creation notification, one-shot SLA check).

mod config;
mod dispatch;
mod error;
mod jobs;
mod service;
mod workers;

pub use config::{ConfigError, QueueTuning};
pub use dispatch::{DispatchError, DispatchFuture, JobDispatcher, QueueDispatcher};
pub use error::TicketError;
pub use jobs::{NotifyPayload, SlaPayload, NOTIFY_JOB, SLA_JOB};
pub use service::TicketService;
pub use workers::{NotifyHandler, SlaHandler};
