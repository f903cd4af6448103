//! Handlers for the two background jobs.

use db::repositories::TicketRepository;
use db::DbError;
use queue::{HandlerFuture, JobHandler};
use ticket_core::{JobResult, QueuedJob};

use crate::jobs::{NotifyPayload, SlaPayload, NOTIFY_JOB, SLA_JOB};

/// Consumes creation-notification jobs.
///
/// The notification channel here is a structured log line; success is
/// reported once it is emitted. A malformed payload fails the job, which
/// hands it to the queue's retry policy.
pub struct NotifyHandler;

impl JobHandler for NotifyHandler {
    fn name(&self) -> &str {
        NOTIFY_JOB
    }

    fn handle(&self, job: &QueuedJob) -> HandlerFuture {
        let payload = job.payload.clone();
        let job_id = job.id.clone();

        Box::pin(async move {
            let data: NotifyPayload = serde_json::from_value(payload)
                .map_err(|e| format!("malformed notify payload: {e}"))?;

            tracing::info!(
                ticket_id = %data.ticket_id,
                title = %data.title,
                priority = %data.priority,
                job_id = %job_id,
                "ticket created notification"
            );

            Ok(JobResult::new(format!(
                "notified for ticket {}",
                data.ticket_id
            )))
        })
    }
}

/// Consumes delayed SLA-check jobs.
///
/// Reads the ticket's status at check time. A missing ticket is a normal
/// skip outcome, not an error; a store failure propagates so the queue
/// retries the check.
pub struct SlaHandler {
    tickets: TicketRepository,
}

impl SlaHandler {
    pub fn new(tickets: TicketRepository) -> Self {
        Self { tickets }
    }
}

impl JobHandler for SlaHandler {
    fn name(&self) -> &str {
        SLA_JOB
    }

    fn handle(&self, job: &QueuedJob) -> HandlerFuture {
        let tickets = self.tickets.clone();
        let payload = job.payload.clone();

        Box::pin(async move {
            let data: SlaPayload = serde_json::from_value(payload)
                .map_err(|e| format!("malformed SLA payload: {e}"))?;

            match tickets.get(data.ticket_id).await {
                Err(DbError::NotFound(_)) => {
                    tracing::info!(ticket_id = %data.ticket_id, "ticket gone before SLA check, skipping");
                    Ok(JobResult::new("not found, skipped"))
                }
                Err(e) => Err(format!("ticket lookup failed: {e}")),
                Ok(ticket) if !ticket.status.is_resolved() => {
                    tracing::warn!(
                        ticket_id = %data.ticket_id,
                        status = %ticket.status,
                        "SLA breached"
                    );
                    Ok(JobResult::new("breached"))
                }
                Ok(_) => {
                    tracing::info!(ticket_id = %data.ticket_id, "resolved within SLA");
                    Ok(JobResult::new("ok"))
                }
            }
        })
    }
}
