//! Server API functions for the ticket tracker.
//!
//! This crate contains all shared fullstack server functions for:
//! - Ticket CRUD and filtered listing
//! - Admin queue introspection (job counts, pause/resume)

mod admin;
mod tickets_api;

#[cfg(feature = "server")]
mod init;

// Re-export all server functions
pub use admin::*;
pub use tickets_api::*;

#[cfg(feature = "server")]
pub use init::*;

// Re-export core types for convenience
pub use ticket_core::{
    Priority, QueueCounts, QueueSnapshot, QueueState, Ticket, TicketId, TicketPage, TicketStatus,
};
