#![allow(clippy::disallowed_methods)]

use db::repositories::TicketRepository;
use db::DbConfig;
use queue::JobHandler;
use serde_json::json;
use ticket_core::{CreateTicket, JobId, JobSpec, Priority, QueuedJob, TicketId, TicketStatus};
use tickets::{NotifyHandler, SlaHandler, NOTIFY_JOB, SLA_JOB};

fn job(queue: &str, name: &str, payload: serde_json::Value) -> QueuedJob {
    QueuedJob::new(queue, JobSpec::new(JobId::new(format!("{name}-test")), name, payload))
}

async fn repo_with_ticket() -> (TicketRepository, ticket_core::Ticket) {
    let database = db::init(&DbConfig::memory()).await.expect("db init");
    let repo = TicketRepository::new(database);
    let ticket = repo
        .create(&CreateTicket {
            title: "Checkout button dead".to_string(),
            description: "Nothing happens on click".to_string(),
            priority: Priority::High,
        })
        .await
        .expect("create");
    (repo, ticket)
}

#[tokio::test]
async fn notify_handler_succeeds_on_well_formed_payload() {
    let handler = NotifyHandler;
    let ticket_id = TicketId::new();

    let result = handler
        .handle(&job(
            "ticket-notify",
            NOTIFY_JOB,
            json!({
                "ticketId": ticket_id.to_string(),
                "title": "Checkout button dead",
                "priority": "HIGH",
            }),
        ))
        .await
        .expect("notification should succeed");

    assert!(result.summary.contains(&ticket_id.to_string()));
}

#[tokio::test]
async fn notify_handler_fails_malformed_payload() {
    let handler = NotifyHandler;

    // Missing required fields hands the job to the retry policy
    let err = handler
        .handle(&job("ticket-notify", NOTIFY_JOB, json!({})))
        .await
        .expect_err("payload is malformed");
    assert!(err.contains("malformed"));
}

#[tokio::test]
async fn sla_handler_reports_breach_for_unresolved_ticket() {
    let (repo, ticket) = repo_with_ticket().await;
    let handler = SlaHandler::new(repo);

    let result = handler
        .handle(&job(
            "ticket-sla",
            SLA_JOB,
            json!({ "ticketId": ticket.id.to_string() }),
        ))
        .await
        .expect("check should run");

    assert_eq!(result.summary, "breached");
}

#[tokio::test]
async fn sla_handler_reports_ok_for_resolved_ticket() {
    let (repo, ticket) = repo_with_ticket().await;

    let mut resolved = repo.get(ticket.id).await.expect("get");
    resolved.status = TicketStatus::Resolved;
    repo.update(&resolved).await.expect("update");

    let handler = SlaHandler::new(repo);
    let result = handler
        .handle(&job(
            "ticket-sla",
            SLA_JOB,
            json!({ "ticketId": ticket.id.to_string() }),
        ))
        .await
        .expect("check should run");

    assert_eq!(result.summary, "ok");
}

#[tokio::test]
async fn sla_handler_skips_missing_ticket_without_error() {
    let (repo, _) = repo_with_ticket().await;
    let handler = SlaHandler::new(repo);

    let result = handler
        .handle(&job(
            "ticket-sla",
            SLA_JOB,
            json!({ "ticketId": TicketId::new().to_string() }),
        ))
        .await
        .expect("a vanished ticket is a skip, not a failure");

    assert_eq!(result.summary, "not found, skipped");
}

#[tokio::test]
async fn sla_handler_fails_malformed_payload() {
    let (repo, _) = repo_with_ticket().await;
    let handler = SlaHandler::new(repo);

    let err = handler
        .handle(&job("ticket-sla", SLA_JOB, json!({ "id": "not-a-ticket" })))
        .await
        .expect_err("payload is malformed");
    assert!(err.contains("malformed"));
}
