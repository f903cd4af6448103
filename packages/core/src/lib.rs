//! Core domain types for the ticket tracker.
//!
//! This crate contains shared types used across all packages:
//! - Ticket and its create/patch/query DTOs
//! - Job types for the background job queue
//! - Queue introspection types for the admin surface

mod error;
mod job;
mod queue;
mod ticket;

pub use error::{FieldError, InvalidValue, ValidationError};
pub use job::{Backoff, JobId, JobOptions, JobResult, JobSpec, JobState, QueuedJob};
pub use queue::{QueueConfig, QueueCounts, QueueSnapshot, QueueState};
pub use ticket::{
    CreateTicket, ListQuery, Priority, SortBy, SortOrder, Ticket, TicketId, TicketPage,
    TicketPatch, TicketStatus, DESCRIPTION_MAX_CHARS, TITLE_MIN_CHARS,
};
