#![allow(clippy::disallowed_methods)]

use std::sync::{Arc, Mutex};

use db::repositories::TicketRepository;
use db::DbConfig;
use serde_json::json;
use ticket_core::{
    Backoff, CreateTicket, JobId, JobSpec, ListQuery, Priority, QueuedJob, TicketId, TicketPatch,
    TicketStatus,
};
use tickets::{
    DispatchFuture, JobDispatcher, QueueTuning, TicketError, TicketService, NOTIFY_JOB, SLA_JOB,
};

/// Records every dispatch instead of talking to a real queue.
#[derive(Default)]
struct RecordingDispatcher {
    enqueued: Mutex<Vec<(String, JobSpec)>>,
    cancelled: Mutex<Vec<(String, JobId)>>,
}

impl JobDispatcher for RecordingDispatcher {
    fn enqueue(&self, queue: &str, spec: JobSpec) -> DispatchFuture<QueuedJob> {
        let job = QueuedJob::new(queue, spec.clone());
        self.enqueued
            .lock()
            .unwrap()
            .push((queue.to_string(), spec));
        Box::pin(async move { Ok(job) })
    }

    fn cancel(&self, queue: &str, job_id: JobId) -> DispatchFuture<bool> {
        self.cancelled
            .lock()
            .unwrap()
            .push((queue.to_string(), job_id));
        // Pretend nothing was pending; cancellation must stay a no-op.
        Box::pin(async move { Ok(false) })
    }
}

async fn service_with_recorder() -> (TicketService, Arc<RecordingDispatcher>) {
    let database = db::init(&DbConfig::memory()).await.expect("db init");
    let store = TicketRepository::new(database);
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = TicketService::new(store, dispatcher.clone(), QueueTuning::default());
    (service, dispatcher)
}

fn bug_report() -> CreateTicket {
    CreateTicket {
        title: "Test Bug Report".to_string(),
        description: "Application crashes when user clicks login button".to_string(),
        priority: Priority::High,
    }
}

#[tokio::test]
async fn create_persists_open_ticket_and_enqueues_both_jobs() {
    let (service, recorder) = service_with_recorder().await;

    let ticket = service.create(bug_report()).await.expect("create");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.title, "Test Bug Report");

    let enqueued = recorder.enqueued.lock().unwrap().clone();
    assert_eq!(enqueued.len(), 2);

    let (notify_queue, notify) = &enqueued[0];
    assert_eq!(notify_queue, "ticket-notify");
    assert_eq!(notify.id, JobId::notify(ticket.id));
    assert_eq!(notify.name, NOTIFY_JOB);
    assert_eq!(
        notify.payload,
        json!({
            "ticketId": ticket.id.to_string(),
            "title": "Test Bug Report",
            "priority": "HIGH",
        })
    );
    assert_eq!(notify.opts.attempts, 3);
    assert_eq!(
        notify.opts.backoff,
        Some(Backoff::Exponential { delay_ms: 1_000 })
    );
    assert!(notify.opts.remove_on_complete);
    assert_eq!(notify.opts.remove_on_fail, Some(50));

    let (sla_queue, sla) = &enqueued[1];
    assert_eq!(sla_queue, "ticket-sla");
    assert_eq!(sla.id, JobId::sla(ticket.id));
    assert_eq!(sla.name, SLA_JOB);
    assert_eq!(sla.payload, json!({ "ticketId": ticket.id.to_string() }));
    assert_eq!(sla.opts.delay_ms, Some(900_000));
    assert!(sla.opts.remove_on_complete);
}

#[tokio::test]
async fn create_rejects_invalid_input_without_dispatching() {
    let (service, recorder) = service_with_recorder().await;

    let err = service
        .create(CreateTicket {
            title: "Bug".to_string(),
            description: String::new(),
            priority: Priority::Low,
        })
        .await
        .expect_err("title is too short");

    match err {
        TicketError::Validation(v) => {
            assert_eq!(v.errors.len(), 1);
            assert_eq!(v.errors[0].field, "title");
        }
        other => panic!("expected validation error, got {other}"),
    }

    assert!(recorder.enqueued.lock().unwrap().is_empty());
    let page = service.list(ListQuery::default()).await.expect("list");
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn list_defaults_and_clamping() {
    let (service, _) = service_with_recorder().await;

    let ticket = service.create(bug_report()).await.expect("create");

    // One stored ticket, default query
    let page = service.list(ListQuery::default()).await.expect("list");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, ticket.id);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);

    // Out-of-range paging is clamped, not rejected
    let page = service
        .list(ListQuery {
            page: Some(-1),
            page_size: Some(200),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 100);

    // totalPages = ceil(total / pageSize)
    for _ in 0..2 {
        service.create(bug_report()).await.expect("create");
    }
    let page = service
        .list(ListQuery {
            page_size: Some(2),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn resolving_a_ticket_cancels_its_sla_job() {
    let (service, recorder) = service_with_recorder().await;

    let ticket = service.create(bug_report()).await.expect("create");

    let updated = service
        .update(
            ticket.id,
            TicketPatch {
                status: Some(TicketStatus::Resolved),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.status, TicketStatus::Resolved);
    // Absent patch fields kept their values
    assert_eq!(updated.title, ticket.title);
    assert_eq!(updated.priority, ticket.priority);

    let cancelled = recorder.cancelled.lock().unwrap().clone();
    assert_eq!(cancelled, vec![("ticket-sla".to_string(), JobId::sla(ticket.id))]);
}

#[tokio::test]
async fn patch_applies_explicit_empty_strings() {
    let (service, _) = service_with_recorder().await;

    let ticket = service.create(bug_report()).await.expect("create");

    let updated = service
        .update(
            ticket.id,
            TicketPatch {
                description: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    // `Some("")` is a real update, not a missing field
    assert_eq!(updated.description, "");
    assert_eq!(updated.title, ticket.title);
    assert_eq!(updated.status, TicketStatus::Open);
}

#[tokio::test]
async fn update_and_remove_report_not_found() {
    let (service, recorder) = service_with_recorder().await;

    let unknown = TicketId::new();
    let err = service
        .update(unknown, TicketPatch::default())
        .await
        .expect_err("unknown ticket");
    assert!(matches!(err, TicketError::NotFound(id) if id == unknown));

    let err = service.remove(unknown).await.expect_err("unknown ticket");
    assert!(matches!(err, TicketError::NotFound(_)));

    // Nothing was cancelled for tickets that never existed
    assert!(recorder.cancelled.lock().unwrap().is_empty());
}

#[tokio::test]
async fn remove_deletes_and_cancels_sla_idempotently() {
    let (service, recorder) = service_with_recorder().await;

    let ticket = service.create(bug_report()).await.expect("create");

    service.remove(ticket.id).await.expect("remove");

    let err = service.find_one(ticket.id).await.expect_err("deleted");
    assert!(matches!(err, TicketError::NotFound(_)));

    // The SLA cancellation happened even though the dispatcher reported
    // nothing pending (the job may already have fired)
    let cancelled = recorder.cancelled.lock().unwrap().clone();
    assert_eq!(cancelled, vec![("ticket-sla".to_string(), JobId::sla(ticket.id))]);

    let err = service.remove(ticket.id).await.expect_err("already gone");
    assert!(matches!(err, TicketError::NotFound(_)));
}
