//! The ticket service: CRUD orchestration plus job dispatch.

use std::sync::Arc;

use db::repositories::TicketRepository;
use db::DbError;
use ticket_core::{
    Backoff, CreateTicket, JobId, JobOptions, JobSpec, ListQuery, Ticket, TicketId, TicketPage,
    TicketPatch,
};

use crate::config::QueueTuning;
use crate::dispatch::JobDispatcher;
use crate::error::TicketError;
use crate::jobs::{NotifyPayload, SlaPayload, NOTIFY_JOB, SLA_JOB};

/// How many terminally failed jobs each enqueue retains for inspection.
const FAILED_JOB_RETENTION: u32 = 50;

/// Orchestrates ticket CRUD against the store and issues/cancels background
/// jobs on the queue.
///
/// Both collaborators are injected, so the service can be exercised with an
/// in-memory store and a recording dispatcher.
#[derive(Clone)]
pub struct TicketService {
    store: TicketRepository,
    dispatcher: Arc<dyn JobDispatcher>,
    tuning: QueueTuning,
}

impl TicketService {
    pub fn new(
        store: TicketRepository,
        dispatcher: Arc<dyn JobDispatcher>,
        tuning: QueueTuning,
    ) -> Self {
        Self {
            store,
            dispatcher,
            tuning,
        }
    }

    /// Create a ticket (always OPEN) and enqueue its notify and SLA jobs.
    ///
    /// Enqueue failures propagate as-is: if the store write succeeded first,
    /// the ticket exists without its jobs. No compensating delete.
    pub async fn create(&self, input: CreateTicket) -> Result<Ticket, TicketError> {
        input.validate()?;

        let ticket = self.store.create(&input).await?;
        tracing::info!(ticket_id = %ticket.id, priority = %ticket.priority, "ticket created");

        let notify_payload = serde_json::to_value(NotifyPayload {
            ticket_id: ticket.id,
            title: ticket.title.clone(),
            priority: ticket.priority,
        })?;
        let notify_spec = JobSpec::new(JobId::notify(ticket.id), NOTIFY_JOB, notify_payload)
            .with_opts(
                JobOptions::default()
                    .with_attempts(self.tuning.notify_attempts)
                    .with_backoff(Backoff::Exponential {
                        delay_ms: self.tuning.notify_backoff_ms,
                    })
                    .remove_on_complete(true)
                    .remove_on_fail(FAILED_JOB_RETENTION),
            );
        self.dispatcher
            .enqueue(&self.tuning.notify_queue, notify_spec)
            .await?;

        let sla_payload = serde_json::to_value(SlaPayload {
            ticket_id: ticket.id,
        })?;
        let sla_spec = JobSpec::new(JobId::sla(ticket.id), SLA_JOB, sla_payload).with_opts(
            JobOptions::default()
                .with_delay_ms(self.tuning.sla_delay_ms)
                .remove_on_complete(true)
                .remove_on_fail(FAILED_JOB_RETENTION),
        );
        self.dispatcher
            .enqueue(&self.tuning.sla_queue, sla_spec)
            .await?;

        Ok(ticket)
    }

    /// List tickets with filtering, sorting and clamped pagination.
    pub async fn list(&self, query: ListQuery) -> Result<TicketPage, TicketError> {
        let (items, total) = self.store.list(&query).await?;
        Ok(TicketPage::new(
            items,
            query.page(),
            query.page_size(),
            total,
        ))
    }

    /// Fetch a single ticket.
    pub async fn find_one(&self, id: TicketId) -> Result<Ticket, TicketError> {
        self.store.get(id).await.map_err(|e| store_error(id, e))
    }

    /// Merge a patch over a ticket. Reaching RESOLVED cancels the pending
    /// SLA check (a no-op when the job already fired or never existed).
    pub async fn update(&self, id: TicketId, patch: TicketPatch) -> Result<Ticket, TicketError> {
        patch.validate()?;

        let mut ticket = self.store.get(id).await.map_err(|e| store_error(id, e))?;
        ticket.apply_patch(&patch);

        let updated = self
            .store
            .update(&ticket)
            .await
            .map_err(|e| store_error(id, e))?;

        if updated.status.is_resolved() {
            self.cancel_sla(id).await?;
        }

        Ok(updated)
    }

    /// Delete a ticket, cancelling its SLA check first.
    pub async fn remove(&self, id: TicketId) -> Result<(), TicketError> {
        self.store.get(id).await.map_err(|e| store_error(id, e))?;

        self.cancel_sla(id).await?;
        self.store.delete(id).await?;
        tracing::info!(ticket_id = %id, "ticket deleted");

        Ok(())
    }

    async fn cancel_sla(&self, id: TicketId) -> Result<(), TicketError> {
        let removed = self
            .dispatcher
            .cancel(&self.tuning.sla_queue, JobId::sla(id))
            .await?;
        if removed {
            tracing::debug!(ticket_id = %id, "pending SLA check cancelled");
        }
        Ok(())
    }
}

fn store_error(id: TicketId, e: DbError) -> TicketError {
    match e {
        DbError::NotFound(_) => TicketError::NotFound(id),
        other => TicketError::Store(other),
    }
}
