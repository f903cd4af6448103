#![allow(clippy::disallowed_methods)]

use std::time::Duration;

use db::DbConfig;
use queue::{
    concurrency, start_supervisor, ActorRef, FnHandler, JobHandlerRegistry, SupervisorMessage,
};
use serde_json::json;
use ticket_core::{
    Backoff, JobId, JobOptions, JobResult, JobSpec, JobState, QueueConfig, QueueCounts, QueuedJob,
};

const WAIT_BUDGET: Duration = Duration::from_secs(5);

fn ok_handlers() -> JobHandlerRegistry {
    let mut handlers = JobHandlerRegistry::new();
    handlers.register(FnHandler::new("ok", |_job: &QueuedJob| {
        Box::pin(async { Ok(JobResult::new("done")) })
    }));
    handlers
}

fn failing_handlers() -> JobHandlerRegistry {
    let mut handlers = JobHandlerRegistry::new();
    handlers.register(FnHandler::new("boom", |_job: &QueuedJob| {
        Box::pin(async { Err("boom".into()) })
    }));
    handlers
}

async fn start_queue(name: &str, handlers: JobHandlerRegistry) -> ActorRef<SupervisorMessage> {
    let database = db::init(&DbConfig::memory()).await.expect("db init");
    let (supervisor, _handle) = start_supervisor(database, handlers)
        .await
        .expect("supervisor");

    let (tx, rx) = concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::CreateQueue {
            name: name.to_string(),
            config: QueueConfig::default().with_concurrency(2),
            reply: tx.into(),
        })
        .expect("send");
    rx.await.expect("reply").expect("create queue");

    supervisor
}

async fn enqueue(
    supervisor: &ActorRef<SupervisorMessage>,
    queue_name: &str,
    spec: JobSpec,
) -> Result<QueuedJob, String> {
    let (tx, rx) = concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::Enqueue {
            queue: queue_name.to_string(),
            spec: Box::new(spec),
            reply: tx.into(),
        })
        .expect("send");
    rx.await.expect("reply")
}

async fn remove(
    supervisor: &ActorRef<SupervisorMessage>,
    queue_name: &str,
    job_id: JobId,
) -> bool {
    let (tx, rx) = concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::RemoveJob {
            queue: queue_name.to_string(),
            job_id,
            reply: tx.into(),
        })
        .expect("send");
    rx.await.expect("reply").expect("queue exists")
}

async fn get_job(
    supervisor: &ActorRef<SupervisorMessage>,
    queue_name: &str,
    job_id: JobId,
) -> Option<QueuedJob> {
    let (tx, rx) = concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::GetJob {
            queue: queue_name.to_string(),
            job_id,
            reply: tx.into(),
        })
        .expect("send");
    rx.await.expect("reply").expect("queue exists")
}

async fn counts(supervisor: &ActorRef<SupervisorMessage>, queue_name: &str) -> QueueCounts {
    let (tx, rx) = concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::GetCounts {
            queue: queue_name.to_string(),
            reply: tx.into(),
        })
        .expect("send");
    rx.await.expect("reply").expect("queue exists")
}

async fn wait_for(
    supervisor: &ActorRef<SupervisorMessage>,
    queue_name: &str,
    predicate: impl Fn(&QueueCounts) -> bool,
) -> QueueCounts {
    let deadline = tokio::time::Instant::now() + WAIT_BUDGET;
    loop {
        let current = counts(supervisor, queue_name).await;
        if predicate(&current) {
            return current;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for queue counts, last seen: {current:?}");
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[tokio::test]
async fn runs_and_removes_an_immediate_job() {
    let supervisor = start_queue("work-complete", ok_handlers()).await;

    let spec = JobSpec::new(JobId::new("job-1"), "ok", json!({}))
        .with_opts(JobOptions::default().remove_on_complete(true));
    enqueue(&supervisor, "work-complete", spec)
        .await
        .expect("enqueue");

    let final_counts = wait_for(&supervisor, "work-complete", |c| c.completed == 1).await;
    assert_eq!(final_counts.waiting, 0);
    assert_eq!(final_counts.active, 0);
    assert_eq!(final_counts.failed, 0);

    // removeOnComplete dropped the record; only the counter remains
    assert!(get_job(&supervisor, "work-complete", JobId::new("job-1"))
        .await
        .is_none());
}

#[tokio::test]
async fn deduplicates_by_job_id() {
    let supervisor = start_queue("work-dedup", ok_handlers()).await;

    // Pause so the job sits in the queue while we poke at it
    let (tx, rx) = concurrency::oneshot();
    supervisor
        .send_message(SupervisorMessage::PauseQueue {
            queue: "work-dedup".to_string(),
            reply: tx.into(),
        })
        .expect("send");
    rx.await.expect("reply").expect("pause");

    let first = enqueue(
        &supervisor,
        "work-dedup",
        JobSpec::new(JobId::new("dup-1"), "ok", json!({"n": 1})),
    )
    .await
    .expect("enqueue");

    // Same id again: the original job comes back, the new payload is ignored
    let second = enqueue(
        &supervisor,
        "work-dedup",
        JobSpec::new(JobId::new("dup-1"), "ok", json!({"n": 2})),
    )
    .await
    .expect("enqueue");
    assert_eq!(second.payload, first.payload);

    let current = counts(&supervisor, "work-dedup").await;
    assert_eq!(current.paused, 1);
    assert_eq!(current.waiting, 0);

    // Removal reports whether anything was there; never an error
    assert!(remove(&supervisor, "work-dedup", JobId::new("dup-1")).await);
    assert!(!remove(&supervisor, "work-dedup", JobId::new("dup-1")).await);
}

#[tokio::test]
async fn delayed_job_waits_until_due() {
    let supervisor = start_queue("work-delay", ok_handlers()).await;

    let spec = JobSpec::new(JobId::new("later-1"), "ok", json!({})).with_opts(
        JobOptions::default()
            .with_delay_ms(600)
            .remove_on_complete(true),
    );
    enqueue(&supervisor, "work-delay", spec)
        .await
        .expect("enqueue");

    let before = counts(&supervisor, "work-delay").await;
    assert_eq!(before.delayed, 1);
    assert_eq!(before.completed, 0);

    let after = wait_for(&supervisor, "work-delay", |c| c.completed == 1).await;
    assert_eq!(after.delayed, 0);
}

#[tokio::test]
async fn retries_with_backoff_then_fails_for_good() {
    let supervisor = start_queue("work-retry", failing_handlers()).await;

    let spec = JobSpec::new(JobId::new("flaky-1"), "boom", json!({})).with_opts(
        JobOptions::default()
            .with_attempts(2)
            .with_backoff(Backoff::Fixed { delay_ms: 50 }),
    );
    enqueue(&supervisor, "work-retry", spec)
        .await
        .expect("enqueue");

    wait_for(&supervisor, "work-retry", |c| c.failed == 1).await;

    // Without a retention cap the terminally failed job stays inspectable
    let job = get_job(&supervisor, "work-retry", JobId::new("flaky-1"))
        .await
        .expect("failed job is retained");
    assert_eq!(job.attempts_made, 2);
    assert!(matches!(job.state, JobState::Failed { .. }));
}

#[tokio::test]
async fn removes_a_delayed_job_before_it_fires() {
    let supervisor = start_queue("work-cancel", ok_handlers()).await;

    let spec = JobSpec::new(JobId::new("sla-cancel-1"), "ok", json!({}))
        .with_opts(JobOptions::default().with_delay_ms(60_000));
    enqueue(&supervisor, "work-cancel", spec)
        .await
        .expect("enqueue");

    assert_eq!(counts(&supervisor, "work-cancel").await.delayed, 1);

    assert!(remove(&supervisor, "work-cancel", JobId::new("sla-cancel-1")).await);

    let current = counts(&supervisor, "work-cancel").await;
    assert_eq!(current.delayed, 0);
    assert!(get_job(&supervisor, "work-cancel", JobId::new("sla-cancel-1"))
        .await
        .is_none());
}

#[tokio::test]
async fn unknown_queue_is_an_error() {
    let supervisor = start_queue("work-known", ok_handlers()).await;

    let err = enqueue(
        &supervisor,
        "missing",
        JobSpec::new(JobId::new("job-x"), "ok", json!({})),
    )
    .await
    .expect_err("queue does not exist");
    assert!(err.contains("queue not found"));
}
