//! Error taxonomy of the ticket service.

use thiserror::Error;
use ticket_core::{TicketId, ValidationError};

use crate::dispatch::DispatchError;

/// Errors surfaced by [`crate::TicketService`] operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// Malformed input; carries per-field messages.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No ticket with that id.
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The ticket store failed.
    #[error("ticket store error: {0}")]
    Store(#[from] db::DbError),

    /// The job queue failed.
    #[error("job queue error: {0}")]
    Queue(#[from] DispatchError),

    /// A job payload could not be encoded.
    #[error("failed to encode job payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl TicketError {
    /// Whether this is the caller's fault (maps to a 4xx at the boundary).
    pub fn is_client_error(&self) -> bool {
        matches!(self, TicketError::Validation(_) | TicketError::NotFound(_))
    }
}
