#![allow(clippy::disallowed_methods)]

mod common;

use std::error::Error;

use db::repositories::{JobRepository, TicketRepository};
use db::DbError;
use serde_json::json;
use ticket_core::{
    CreateTicket, JobId, JobOptions, JobSpec, JobState, ListQuery, Priority, QueuedJob, SortBy,
    SortOrder, TicketStatus,
};

fn input(title: &str, description: &str, priority: Priority) -> CreateTicket {
    CreateTicket {
        title: title.to_string(),
        description: description.to_string(),
        priority,
    }
}

#[tokio::test]
async fn ticket_repository_crud() -> Result<(), Box<dyn Error>> {
    let database = common::test_db().await?;
    let repo = TicketRepository::new(database);

    // create: status is forced to OPEN
    let created = repo
        .create(&input("Printer on fire", "Smoke everywhere", Priority::High))
        .await?;
    assert_eq!(created.title, "Printer on fire");
    assert_eq!(created.status, TicketStatus::Open);
    assert_eq!(created.priority, Priority::High);

    // get
    let loaded = repo.get(created.id).await?;
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.description, "Smoke everywhere");

    // update
    let mut changed = loaded.clone();
    changed.title = "Printer was on fire".to_string();
    changed.status = TicketStatus::InProgress;
    let updated = repo.update(&changed).await?;
    assert_eq!(updated.title, "Printer was on fire");
    assert_eq!(updated.status, TicketStatus::InProgress);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    // update of a missing ticket reports NotFound
    repo.delete(created.id).await?;
    let missing = repo.update(&changed).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));

    let missing = repo.get(created.id).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn ticket_repository_filters_and_pagination() -> Result<(), Box<dyn Error>> {
    let database = common::test_db().await?;
    let repo = TicketRepository::new(database);

    let crash = repo
        .create(&input(
            "Payment page crash",
            "Users report an outage banner on checkout",
            Priority::High,
        ))
        .await?;
    let slow = repo
        .create(&input(
            "Slow dashboard",
            "Loading takes thirty seconds",
            Priority::Low,
        ))
        .await?;
    let outage = repo
        .create(&input(
            "Critical outage",
            "Production is down",
            Priority::High,
        ))
        .await?;

    // Move two tickets off OPEN
    let mut slow_changed = repo.get(slow.id).await?;
    slow_changed.status = TicketStatus::InProgress;
    repo.update(&slow_changed).await?;
    let mut outage_changed = repo.get(outage.id).await?;
    outage_changed.status = TicketStatus::Resolved;
    repo.update(&outage_changed).await?;

    // No filter: everything, one consistent total
    let (items, total) = repo.list(&ListQuery::default()).await?;
    assert_eq!(items.len(), 3);
    assert_eq!(total, 3);

    // Status equality
    let (items, total) = repo
        .list(&ListQuery {
            status: Some(TicketStatus::Open),
            ..Default::default()
        })
        .await?;
    assert_eq!(total, 1);
    assert_eq!(items[0].id, crash.id);

    // Priority equality
    let (_, total) = repo
        .list(&ListQuery {
            priority: Some(Priority::High),
            ..Default::default()
        })
        .await?;
    assert_eq!(total, 2);

    // Search matches title OR description
    let (items, total) = repo
        .list(&ListQuery {
            search: Some("outage".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(total, 2);
    assert!(items.iter().any(|t| t.id == crash.id));
    assert!(items.iter().any(|t| t.id == outage.id));

    // Combined filters intersect
    let (items, total) = repo
        .list(&ListQuery {
            priority: Some(Priority::High),
            search: Some("outage".to_string()),
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        })
        .await?;
    assert_eq!(total, 1);
    assert_eq!(items[0].id, outage.id);

    // Pagination against the filtered total
    let page_one = ListQuery {
        page: Some(1),
        page_size: Some(2),
        sort_by: Some(SortBy::Title),
        sort_order: Some(SortOrder::Asc),
        ..Default::default()
    };
    let (items, total) = repo.list(&page_one).await?;
    assert_eq!(total, 3);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Critical outage");
    assert_eq!(items[1].title, "Payment page crash");

    let page_two = ListQuery {
        page: Some(2),
        ..page_one
    };
    let (items, _) = repo.list(&page_two).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Slow dashboard");

    Ok(())
}

#[tokio::test]
async fn job_repository_round_trip() -> Result<(), Box<dyn Error>> {
    let database = common::test_db().await?;
    let repo = JobRepository::new(database);

    let spec = JobSpec::new(
        JobId::new("notify-test-1"),
        "ticket-notify",
        json!({"ticketId": "t-1", "title": "Printer on fire", "priority": "HIGH"}),
    )
    .with_opts(
        JobOptions::default()
            .with_attempts(3)
            .remove_on_complete(true)
            .remove_on_fail(50),
    );
    let job = QueuedJob::new("ticket-notify", spec);
    repo.create(&job).await?;

    let loaded = repo.get(&job.id).await?.expect("job should exist");
    assert_eq!(loaded.id, job.id);
    assert_eq!(loaded.queue, "ticket-notify");
    assert_eq!(loaded.payload["title"], json!("Printer on fire"));
    assert_eq!(loaded.opts.attempts, 3);
    assert!(matches!(loaded.state, JobState::Waiting));

    // A delayed job is also open
    let delayed_spec = JobSpec::new(JobId::new("sla-test-1"), "ticket-sla", json!({"ticketId": "t-1"}))
        .with_opts(JobOptions::default().with_delay_ms(60_000));
    let delayed = QueuedJob::new("ticket-notify", delayed_spec);
    repo.create(&delayed).await?;

    let open = repo.list_open("ticket-notify").await?;
    assert_eq!(open.len(), 2);

    // Terminal states drop out of the open listing
    let failed = JobState::Failed {
        failed_at: chrono::Utc::now(),
        error: "boom".to_string(),
    };
    repo.update_state(&job.id, &failed, 3).await?;

    let open = repo.list_open("ticket-notify").await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, delayed.id);

    let reloaded = repo.get(&job.id).await?.expect("job should exist");
    assert_eq!(reloaded.attempts_made, 3);
    assert!(matches!(reloaded.state, JobState::Failed { .. }));

    repo.delete(&job.id).await?;
    assert!(repo.get(&job.id).await?.is_none());

    Ok(())
}
