//! Payloads of the two background jobs tied to a ticket's life.

use serde::{Deserialize, Serialize};
use ticket_core::{Priority, TicketId};

/// Job name routing creation notifications to the notify handler.
pub const NOTIFY_JOB: &str = "ticket-notify";
/// Job name routing SLA checks to the SLA handler.
pub const SLA_JOB: &str = "ticket-sla";

/// Payload of a creation-notification job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyPayload {
    pub ticket_id: TicketId,
    pub title: String,
    pub priority: Priority,
}

/// Payload of a one-shot SLA check job. Carries only the ticket id; the
/// worker reads current state at check time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaPayload {
    pub ticket_id: TicketId,
}
